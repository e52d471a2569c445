//! # Fingerprint WASM
//!
//! A browser fingerprint collector compiled to WebAssembly.
//!
//! Reads environment signals (user agent, hardware hints, screen geometry,
//! feature flags, canvas/WebGL/audio rendering artifacts, installed fonts),
//! condenses them into one SHA-256 digest and shows them on the page.
//!
//! ## Architecture
//!
//! ```text
//! FingerprintApp (JS API, page wiring)
//!   ↓
//! FingerprintSession (run generations, cached result)
//!   ↓
//! pipeline: collectors → EnvironmentRecord → canonical JSON → SHA-256
//!   ↓
//! Environment (browser, or the deterministic fake in tests)
//! ```

use std::cell::Cell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{EventTarget, VisibilityState};

// Modules
pub mod actions;
pub mod browser;
pub mod canonical;
pub mod collectors;
pub mod config;
pub mod environment;
mod error;
pub mod hashing;
pub mod pipeline;
pub mod presentation;
pub mod record;
pub mod session;

pub use browser::{BrowserEnvironment, DomSurface};
pub use config::FingerprintConfig;
pub use environment::Environment;
pub use error::{ErrorCode, ErrorInfo, FingerprintError, Result, Unavailable};
pub use pipeline::FingerprintResult;
pub use record::{Category, EnvironmentRecord, Reading};
pub use session::{FingerprintSession, SessionState};

use presentation::{render_collecting, View};

/// Initialize the collector module
///
/// Sets up logging.
#[wasm_bindgen(start)]
pub fn init() {
    // A second init (e.g. the module loaded twice) keeps the first logger.
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Fingerprint module initialized");
}

/// SHA-256 of `input` as 64 lowercase hex characters.
#[wasm_bindgen]
pub fn hash_string(input: &str) -> String {
    hashing::sha256_hex(input)
}

struct Page {
    session: FingerprintSession<BrowserEnvironment>,
    surface: DomSurface,
}

impl Page {
    /// One pass: placeholder summary, collect, then re-render every region.
    async fn refresh(&self) -> Result<Rc<FingerprintResult>> {
        if let Err(e) = render_collecting(&self.surface) {
            log::warn!("{}", e);
        }

        let result = self.session.collect().await?;

        let view = View::from_result(&result, self.session.config())?;
        if let Err(e) = view.render(&self.surface) {
            log::warn!("Rendering incomplete: {}", e);
        }
        Ok(result)
    }

    async fn copy(&self) -> Result<()> {
        let result = self.session.result();
        actions::copy_digest(self.session.env(), result.as_deref(), &self.surface).await
    }

    fn export(&self) -> Result<actions::ExportFile> {
        let result = self.session.result();
        actions::export_record(self.session.env(), result.as_deref(), &self.surface)
    }
}

fn spawn_refresh(page: Rc<Page>) {
    spawn_local(async move {
        match page.refresh().await {
            Ok(_) => {}
            Err(FingerprintError::Superseded { run, latest }) => {
                log::debug!("Run {} superseded by {}", run, latest);
            }
            Err(e) => {
                actions::report(&page.surface, e);
            }
        }
    });
}

/// Attach `handler` to `event` for the lifetime of the page.
fn listen(target: &EventTarget, event: &str, mut handler: impl FnMut() + 'static) -> Result<()> {
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| handler())
        as Box<dyn FnMut(web_sys::Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| FingerprintError::Dom(format!("addEventListener({}): {:?}", event, e)))?;
    closure.forget();
    Ok(())
}

/// Fingerprint page controller
#[wasm_bindgen]
pub struct FingerprintApp {
    page: Rc<Page>,
    mounted: Cell<bool>,
}

#[wasm_bindgen]
impl FingerprintApp {
    /// Create a collector for the current page.
    ///
    /// `options` is an optional object matching `FingerprintConfig`;
    /// missing fields take their defaults, malformed input is ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> std::result::Result<FingerprintApp, JsValue> {
        let config: FingerprintConfig = if options.is_undefined() || options.is_null() {
            FingerprintConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options).unwrap_or_else(|e| {
                log::warn!("{}", FingerprintError::Config(e.to_string()));
                FingerprintConfig::default()
            })
        };

        let env = Rc::new(BrowserEnvironment::new(config.elements.canvas.clone()));
        let surface = DomSurface::new(config.elements.clone(), config.copy_confirmation_ms)?;

        Ok(Self {
            page: Rc::new(Page {
                session: FingerprintSession::new(env, config),
                surface,
            }),
            mounted: Cell::new(false),
        })
    }

    /// Bind the copy/export controls and the visibility listener, then
    /// start the first pass. Once that succeeds, calling it again does
    /// nothing; after a failure (e.g. a missing button) it can be retried.
    #[wasm_bindgen]
    pub fn mount(&self) -> std::result::Result<(), JsValue> {
        if self.mounted.get() {
            return Ok(());
        }
        let config = self.page.session.config();

        let copy_button = self.page.surface.element(&config.elements.copy_button)?;
        let export_button = self.page.surface.element(&config.elements.export_button)?;
        let document = browser::document().map_err(|e| FingerprintError::Dom(e.to_string()))?;

        let page = Rc::clone(&self.page);
        listen(&copy_button, "click", move || {
            let page = Rc::clone(&page);
            spawn_local(async move {
                // Failures were already shown to the user.
                let _ = page.copy().await;
            });
        })?;

        let page = Rc::clone(&self.page);
        listen(&export_button, "click", move || {
            let _ = page.export();
        })?;

        if config.rerun_on_visible {
            let page = Rc::clone(&self.page);
            let doc = document.clone();
            listen(&document, "visibilitychange", move || {
                if doc.visibility_state() == VisibilityState::Visible {
                    spawn_refresh(Rc::clone(&page));
                }
            })?;
        }

        self.mounted.set(true);
        log::info!("Fingerprint page mounted");
        spawn_refresh(Rc::clone(&self.page));
        Ok(())
    }

    /// Run a pass and render it. Resolves to the digest.
    #[wasm_bindgen]
    pub fn collect(&self) -> Promise {
        let page = Rc::clone(&self.page);
        future_to_promise(async move {
            let result = page.refresh().await?;
            Ok(JsValue::from_str(&result.digest))
        })
    }

    /// Copy the digest to the clipboard.
    ///
    /// Resolves to `true` once copied, or `false` when the user was shown
    /// why not (nothing collected yet, clipboard refused).
    #[wasm_bindgen]
    pub fn copy(&self) -> Promise {
        let page = Rc::clone(&self.page);
        future_to_promise(async move {
            let copied = actions::settle(page.copy().await)?;
            Ok(JsValue::from_bool(copied.is_some()))
        })
    }

    /// Download the canonical record. Returns the file name, or `undefined`
    /// when the user was shown why not.
    #[wasm_bindgen]
    pub fn export(&self) -> std::result::Result<Option<String>, JsValue> {
        Ok(actions::settle(self.page.export())?.map(|file| file.filename))
    }

    #[wasm_bindgen]
    pub fn digest(&self) -> Option<String> {
        self.page.session.result().map(|r| r.digest.clone())
    }

    #[wasm_bindgen]
    pub fn canonical(&self) -> Option<String> {
        self.page.session.result().map(|r| r.canonical.clone())
    }

    /// "uninitialized", "collecting" or "ready"
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        self.page.session.state().as_str().to_string()
    }
}
