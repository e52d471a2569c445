//! Browser bindings
//!
//! [`BrowserEnvironment`] implements [`Environment`] over `web-sys` and
//! `js-sys`; [`DomSurface`] renders into the page. Optional or
//! non-standard properties (`deviceMemory`, `doNotTrack`, the clipboard)
//! are read through `Reflect` so their absence is a value, not a panic.

use async_trait::async_trait;
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Storage, Window};

use crate::actions::ExportFile;
use crate::config::AudioGraph;
use crate::environment::{
    Canvas2d, Environment, Feature, GlContext, NavigatorSnapshot, ScreenSnapshot, StorageArea,
    TextProbe, WebGlVersion,
};
use crate::error::Unavailable;

mod audio;
mod canvas;
mod dom;
mod webgl;

pub use dom::DomSurface;

pub(crate) fn window() -> Result<Window, Unavailable> {
    web_sys::window().ok_or_else(|| Unavailable::not_supported("window"))
}

pub(crate) fn document() -> Result<Document, Unavailable> {
    window()?
        .document()
        .ok_or_else(|| Unavailable::not_supported("document"))
}

/// `target[name]`, with `undefined` and `null` folded into `None`.
fn property(target: &JsValue, name: &str) -> Result<Option<JsValue>, Unavailable> {
    let value =
        Reflect::get(target, &JsValue::from_str(name)).map_err(|e| Unavailable::from_js(name, &e))?;
    if value.is_undefined() || value.is_null() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

fn truthy(target: &JsValue, name: &str) -> Result<bool, Unavailable> {
    Ok(property(target, name)?.map_or(false, |v| v.is_truthy()))
}

// Per-field reads: one throwing getter must not hide the others.
fn string_prop(target: &JsValue, name: &str) -> Option<String> {
    property(target, name).ok().flatten().and_then(|v| v.as_string())
}

fn number_prop(target: &JsValue, name: &str) -> Option<f64> {
    property(target, name).ok().flatten().and_then(|v| v.as_f64())
}

fn bool_prop(target: &JsValue, name: &str) -> Option<bool> {
    property(target, name).ok().flatten().and_then(|v| v.as_bool())
}

/// The live page.
pub struct BrowserEnvironment {
    /// Element id of the page canvas that doubles as the preview.
    preview_canvas_id: String,
}

impl BrowserEnvironment {
    pub fn new(preview_canvas_id: impl Into<String>) -> Self {
        Self {
            preview_canvas_id: preview_canvas_id.into(),
        }
    }

    fn storage(area: StorageArea) -> Result<Storage, Unavailable> {
        let window = window()?;
        let storage = match area {
            StorageArea::Local => window.local_storage(),
            StorageArea::Session => window.session_storage(),
        };
        storage
            .map_err(|e| Unavailable::denied(format!("{:?} storage: {:?}", area, e)))?
            .ok_or_else(|| Unavailable::not_supported(format!("{:?} storage", area)))
    }
}

#[async_trait(?Send)]
impl Environment for BrowserEnvironment {
    fn navigator(&self) -> Result<NavigatorSnapshot, Unavailable> {
        let nav: JsValue = window()?.navigator().into();

        let languages = property(&nav, "languages").ok().flatten().map(|list| {
            Array::from(&list)
                .iter()
                .filter_map(|l| l.as_string())
                .collect()
        });

        Ok(NavigatorSnapshot {
            user_agent: string_prop(&nav, "userAgent"),
            platform: string_prop(&nav, "platform"),
            product: string_prop(&nav, "product"),
            vendor: string_prop(&nav, "vendor"),
            language: string_prop(&nav, "language"),
            languages,
            cookie_enabled: bool_prop(&nav, "cookieEnabled"),
            hardware_concurrency: number_prop(&nav, "hardwareConcurrency"),
            device_memory: number_prop(&nav, "deviceMemory"),
            max_touch_points: number_prop(&nav, "maxTouchPoints"),
            on_line: bool_prop(&nav, "onLine"),
            do_not_track: string_prop(&nav, "doNotTrack")
                .filter(|v| !v.is_empty())
                .or_else(|| string_prop(&nav, "msDoNotTrack")),
        })
    }

    fn screen(&self) -> Result<ScreenSnapshot, Unavailable> {
        let window = window()?;
        let screen = window
            .screen()
            .map_err(|e| Unavailable::from_js("screen", &e))?;

        Ok(ScreenSnapshot {
            width: screen.width().ok().map(f64::from),
            height: screen.height().ok().map(f64::from),
            avail_width: screen.avail_width().ok().map(f64::from),
            avail_height: screen.avail_height().ok().map(f64::from),
            color_depth: screen.color_depth().ok().map(f64::from),
            device_pixel_ratio: Some(window.device_pixel_ratio()),
        })
    }

    fn timezone(&self) -> Result<String, Unavailable> {
        let format = js_sys::Intl::DateTimeFormat::new(&Array::new(), &Object::new());
        let resolved: JsValue = format.resolved_options().into();
        property(&resolved, "timeZone")?
            .and_then(|tz| tz.as_string())
            .ok_or_else(|| Unavailable::not_supported("Intl timeZone"))
    }

    fn has_feature(&self, feature: Feature) -> Result<bool, Unavailable> {
        let window: JsValue = window()?.into();
        match feature {
            Feature::WebGl => Ok(self.webgl_context(WebGlVersion::WebGl1)?.is_some()),
            Feature::WebGl2 => Ok(self.webgl_context(WebGlVersion::WebGl2)?.is_some()),
            Feature::Canvas => truthy(&window, "HTMLCanvasElement"),
            Feature::OfflineAudio => Ok(truthy(&window, "OfflineAudioContext")?
                || truthy(&window, "webkitOfflineAudioContext")?),
            Feature::Crypto => truthy(&window, "crypto"),
            Feature::ServiceWorker => {
                let nav = property(&window, "navigator")?
                    .ok_or_else(|| Unavailable::not_supported("navigator"))?;
                Reflect::has(&nav, &JsValue::from_str("serviceWorker"))
                    .map_err(|e| Unavailable::from_js("serviceWorker", &e))
            }
            Feature::IndexedDb => truthy(&window, "indexedDB"),
        }
    }

    fn storage_round_trip(&self, area: StorageArea, key: &str) -> Result<(), Unavailable> {
        let storage = Self::storage(area)?;
        storage
            .set_item(key, key)
            .map_err(|e| Unavailable::denied(format!("setItem: {:?}", e)))?;
        storage
            .remove_item(key)
            .map_err(|e| Unavailable::denied(format!("removeItem: {:?}", e)))
    }

    fn create_canvas(&self, width: u32, height: u32) -> Result<Box<dyn Canvas2d>, Unavailable> {
        let canvas = canvas::DomCanvas::open(&document()?, &self.preview_canvas_id, width, height)?;
        Ok(Box::new(canvas))
    }

    fn webgl_context(
        &self,
        version: WebGlVersion,
    ) -> Result<Option<Box<dyn GlContext>>, Unavailable> {
        Ok(webgl::context(&document()?, version)?.map(|gl| Box::new(gl) as Box<dyn GlContext>))
    }

    async fn render_audio(&self, graph: &AudioGraph) -> Result<Vec<f32>, Unavailable> {
        audio::render(graph).await
    }

    fn text_probe(&self, sample: &str, font_size: &str) -> Result<Box<dyn TextProbe>, Unavailable> {
        let probe = canvas::SpanProbe::attach(&document()?, sample, font_size)?;
        Ok(Box::new(probe))
    }

    fn now_iso8601(&self) -> String {
        js_sys::Date::new_0().to_iso_string().into()
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), Unavailable> {
        dom::write_clipboard(text).await
    }

    fn offer_download(&self, file: &ExportFile) -> Result<(), Unavailable> {
        dom::download(file)
    }
}

/// Cast helper shared by the submodules.
fn cast<T: JsCast>(value: impl Into<JsValue>, what: &str) -> Result<T, Unavailable> {
    let value: JsValue = value.into();
    value
        .dyn_into::<T>()
        .map_err(|_| Unavailable::failed(format!("{} has an unexpected type", what)))
}
