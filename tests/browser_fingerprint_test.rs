//! Browser Fingerprint WASM Integration Tests
//!
//! Run with: wasm-pack test --headless --chrome
//! (or --firefox, --safari)

#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Element};

use fingerprint_wasm::config::FingerprintConfig;
use fingerprint_wasm::environment::TextProbe;
use fingerprint_wasm::hashing::{is_digest, sha256_hex};
use fingerprint_wasm::presentation::{DisplaySurface, ListItem, Region};
use fingerprint_wasm::{
    hash_string, pipeline, BrowserEnvironment, Category, DomSurface, Environment,
    FingerprintApp, FingerprintError, FingerprintSession, SessionState,
};

wasm_bindgen_test_configure!(run_in_browser);

fn browser() -> BrowserEnvironment {
    BrowserEnvironment::new("no-such-canvas")
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Replace `window.alert` with a recorder and clear what it recorded.
fn record_alerts() {
    let window = web_sys::window().unwrap();
    let recorder = Function::new_with_args("msg", "window.__alerts.push(msg)");
    Reflect::set(&window, &"__alerts".into(), &Array::new()).unwrap();
    Reflect::set(&window, &"alert".into(), &recorder).unwrap();
}

fn alerts() -> Vec<String> {
    let window = web_sys::window().unwrap();
    let list = Reflect::get(&window, &"__alerts".into()).unwrap();
    Array::from(&list).iter().filter_map(|m| m.as_string()).collect()
}

/// Page elements for every region, with ids prefixed by `prefix`.
/// Buttons are left out; see [`add_buttons`].
fn page_fixture(prefix: &str) -> Element {
    let document = document();
    let root = document.create_element("div").unwrap();
    for (name, tag) in [
        ("summary", "div"),
        ("digest", "div"),
        ("hardware", "ul"),
        ("screen", "ul"),
        ("features", "ul"),
        ("ua", "pre"),
        ("canvas", "canvas"),
        ("canvasHash", "div"),
        ("webgl", "pre"),
        ("audio", "div"),
        ("fonts", "ul"),
    ] {
        let el = document.create_element(tag).unwrap();
        el.set_id(&format!("{}-{}", prefix, name));
        root.append_child(&el).unwrap();
    }
    document.body().unwrap().append_child(&root).unwrap();
    root
}

fn add_buttons(root: &Element, prefix: &str) {
    for name in ["copy", "export"] {
        let button = document().create_element("button").unwrap();
        button.set_id(&format!("{}-{}", prefix, name));
        root.append_child(&button).unwrap();
    }
}

fn app_for(prefix: &str) -> FingerprintApp {
    let options = serde_json::json!({
        "elements": {
            "summary": format!("{}-summary", prefix),
            "digest": format!("{}-digest", prefix),
            "hardware": format!("{}-hardware", prefix),
            "screen": format!("{}-screen", prefix),
            "features": format!("{}-features", prefix),
            "user_agent": format!("{}-ua", prefix),
            "canvas": format!("{}-canvas", prefix),
            "canvas_digest": format!("{}-canvasHash", prefix),
            "webgl": format!("{}-webgl", prefix),
            "audio": format!("{}-audio", prefix),
            "fonts": format!("{}-fonts", prefix),
            "copy_button": format!("{}-copy", prefix),
            "export_button": format!("{}-export", prefix),
        },
        "rerun_on_visible": false,
    });
    let options = js_sys::JSON::parse(&options.to_string()).unwrap();
    FingerprintApp::new(options).unwrap()
}

async fn wait_until_ready(app: &FingerprintApp) {
    for _ in 0..100 {
        if app.state() == "ready" {
            return;
        }
        TimeoutFuture::new(100).await;
    }
    panic!("still {} after 10s", app.state());
}

// ===== Hashing =====

#[wasm_bindgen_test]
fn hash_string_matches_known_vector() {
    assert_eq!(
        hash_string("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

// ===== Environment =====

#[wasm_bindgen_test]
fn navigator_has_user_agent() {
    let nav = browser().navigator().unwrap();
    assert!(nav.user_agent.map_or(false, |ua| !ua.is_empty()));
}

#[wasm_bindgen_test]
fn timestamp_is_iso8601() {
    let now = browser().now_iso8601();
    assert_eq!(now.len(), 24);
    assert!(now.ends_with('Z'));
    assert_eq!(&now[10..11], "T");
}

#[wasm_bindgen_test]
fn font_probe_is_removed() {
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();
    let before = body.child_element_count();
    {
        let mut probe = browser().text_probe("mmmmmmmmmmlli", "72px").unwrap();
        assert!(probe.width_with_family("monospace").unwrap() > 0.0);
        assert_eq!(body.child_element_count(), before + 1);
    }
    assert_eq!(body.child_element_count(), before);
}

// ===== Pipeline =====

#[wasm_bindgen_test]
async fn pipeline_completes_in_browser() {
    let env = browser();
    let result = pipeline::run(&env, &FingerprintConfig::default(), 1)
        .await
        .unwrap();

    assert!(is_digest(&result.digest));
    assert_eq!(result.digest, sha256_hex(&result.canonical));
    assert_eq!(result.record.len(), 9);

    let canvas = result.record.get(Category::CanvasHash).unwrap();
    assert!(is_digest(canvas.as_str().unwrap()));
}

#[wasm_bindgen_test]
async fn session_reaches_ready() {
    let session = FingerprintSession::new(std::rc::Rc::new(browser()), FingerprintConfig::default());
    assert_eq!(session.state(), SessionState::Uninitialized);
    session.collect().await.unwrap();
    assert_eq!(session.state(), SessionState::Ready);
}

// ===== DOM surface =====

#[wasm_bindgen_test]
fn surface_renders_lists() {
    let document = web_sys::window().unwrap().document().unwrap();
    let list = document.create_element("ul").unwrap();
    list.set_id("hardwareList");
    document.body().unwrap().append_child(&list).unwrap();

    let surface = DomSurface::new(FingerprintConfig::default().elements, 1500).unwrap();
    surface
        .set_list(Region::Hardware, &[ListItem::labeled("cores", "8"), ListItem::plain("x")])
        .unwrap();

    assert_eq!(list.child_element_count(), 2);
    assert_eq!(list.inner_html(), "<li><strong>cores:</strong> 8</li><li>x</li>");
    list.remove();
}

#[wasm_bindgen_test]
fn surface_reports_missing_element() {
    let surface = DomSurface::new(FingerprintConfig::default().elements, 1500).unwrap();
    assert!(surface.set_text(Region::Summary, "Gathering data...").is_err());
}

// ===== JS API =====

#[wasm_bindgen_test]
fn app_starts_uninitialized() {
    let app = FingerprintApp::new(JsValue::UNDEFINED).unwrap();
    assert_eq!(app.state(), "uninitialized");
    assert_eq!(app.digest(), None);
    assert_eq!(app.canonical(), None);
}

#[wasm_bindgen_test]
async fn actions_before_first_pass_show_notices() {
    record_alerts();
    let app = FingerprintApp::new(JsValue::UNDEFINED).unwrap();

    assert_eq!(app.export().unwrap(), None);
    let copied = JsFuture::from(app.copy()).await.unwrap();
    assert_eq!(copied, JsValue::FALSE);

    assert_eq!(
        alerts(),
        vec![
            "Not ready yet.".to_string(),
            "Not ready yet — wait a moment.".to_string()
        ]
    );
}

#[wasm_bindgen_test]
fn errors_reach_js_as_error_info() {
    let value = JsValue::from(FingerprintError::NotReady);
    let field = |name: &str| Reflect::get(&value, &name.into()).unwrap();

    assert_eq!(field("code").as_f64(), Some(100.0));
    assert_eq!(
        field("user_message").as_string().as_deref(),
        Some("Not ready yet — wait a moment.")
    );
    assert_eq!(field("is_user_facing").as_bool(), Some(true));
}

#[wasm_bindgen_test]
async fn mount_renders_first_pass() {
    let root = page_fixture("mounted");
    add_buttons(&root, "mounted");
    let app = app_for("mounted");

    app.mount().unwrap();
    wait_until_ready(&app).await;

    let digest = app.digest().unwrap();
    assert!(is_digest(&digest));
    let shown = document().get_element_by_id("mounted-digest").unwrap();
    assert_eq!(shown.text_content(), Some(digest));
    let fonts = document().get_element_by_id("mounted-fonts").unwrap();
    assert!(fonts.child_element_count() > 0);

    // Already mounted: no second set of listeners, no error.
    app.mount().unwrap();
    root.remove();
}

#[wasm_bindgen_test]
async fn mount_without_buttons_can_be_retried() {
    let root = page_fixture("retry");
    let app = app_for("retry");

    assert!(app.mount().is_err());
    TimeoutFuture::new(50).await;
    assert_eq!(app.state(), "uninitialized");

    add_buttons(&root, "retry");
    app.mount().unwrap();
    wait_until_ready(&app).await;
    assert!(app.digest().is_some());
    root.remove();
}

#[wasm_bindgen_test]
async fn collect_resolves_to_digest() {
    let root = page_fixture("collect");
    let app = app_for("collect");

    let digest = JsFuture::from(app.collect()).await.unwrap();
    assert_eq!(digest.as_string(), app.digest());
    assert_eq!(app.state(), "ready");
    root.remove();
}
