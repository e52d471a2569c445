//! Deterministic in-memory environment and display surface.
//!
//! Every value is fixed, so two passes over the same `FakeEnvironment`
//! produce the same record. Fields are public: adjust them before sharing
//! the environment to simulate missing or failing capabilities.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use super::{
    Canvas2d, Environment, Feature, GlContext, NavigatorSnapshot, ScreenSnapshot, StorageArea,
    TextProbe, WebGlVersion,
};
use crate::actions::ExportFile;
use crate::collectors::canvas::DrawOp;
use crate::collectors::webgl::{RENDERER, UNMASKED_RENDERER_WEBGL, UNMASKED_VENDOR_WEBGL, VENDOR, VERSION};
use crate::config::{AudioGraph, FONT_BASELINE};
use crate::error::{FingerprintError, Result, Unavailable};
use crate::presentation::{DisplaySurface, ListItem, Notice, Region};

pub const FAKE_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) FakeBrowser/1.0";
pub const FAKE_CANVAS_DATA_URL: &str = "data:image/png;base64,AAAA";
pub const FAKE_TIMESTAMP: &str = "2026-01-02T03:04:05.678Z";

/// Scripted WebGL context.
#[derive(Debug, Clone, Default)]
pub struct FakeGl {
    pub debug_renderer_info: bool,
    pub parameters: HashMap<u32, String>,
    /// Make every `getParameter` call throw.
    pub fail_parameters: bool,
}

impl FakeGl {
    pub fn standard() -> Self {
        let parameters = [
            (UNMASKED_VENDOR_WEBGL, "Fake GPU Vendor"),
            (UNMASKED_RENDERER_WEBGL, "Fake GPU Renderer 9000"),
            (VENDOR, "WebKit"),
            (RENDERER, "WebKit WebGL"),
            (VERSION, "WebGL 1.0 (OpenGL ES 2.0)"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
        Self {
            debug_renderer_info: true,
            parameters,
            fail_parameters: false,
        }
    }
}

impl GlContext for FakeGl {
    fn has_extension(&self, name: &str) -> std::result::Result<bool, Unavailable> {
        Ok(name == "WEBGL_debug_renderer_info" && self.debug_renderer_info)
    }

    fn parameter(&self, pname: u32) -> std::result::Result<Option<String>, Unavailable> {
        if self.fail_parameters {
            return Err(Unavailable::failed(format!("getParameter(0x{:04X})", pname)));
        }
        Ok(self.parameters.get(&pname).cloned())
    }
}

struct FakeCanvas {
    ops: Rc<RefCell<Vec<DrawOp>>>,
    export: std::result::Result<String, Unavailable>,
}

impl Canvas2d for FakeCanvas {
    fn draw(&mut self, op: &DrawOp) -> std::result::Result<(), Unavailable> {
        self.ops.borrow_mut().push(op.clone());
        Ok(())
    }

    fn to_data_url(&self) -> std::result::Result<String, Unavailable> {
        self.export.clone()
    }
}

struct FakeTextProbe {
    widths: HashMap<String, f64>,
    baseline: f64,
}

impl TextProbe for FakeTextProbe {
    fn width_with_family(&mut self, family: &str) -> std::result::Result<f64, Unavailable> {
        // "<candidate>, monospace" → candidate
        let primary = family.split(',').next().unwrap_or(family).trim();
        if primary == FONT_BASELINE {
            return Ok(self.baseline);
        }
        Ok(self.widths.get(primary).copied().unwrap_or(self.baseline))
    }
}

/// Deterministic [`Environment`].
pub struct FakeEnvironment {
    pub navigator: std::result::Result<NavigatorSnapshot, Unavailable>,
    pub screen: std::result::Result<ScreenSnapshot, Unavailable>,
    pub timezone: std::result::Result<String, Unavailable>,
    pub features: HashMap<Feature, std::result::Result<bool, Unavailable>>,
    pub storage: HashMap<StorageArea, std::result::Result<(), Unavailable>>,
    pub canvas: std::result::Result<(), Unavailable>,
    pub canvas_export: std::result::Result<String, Unavailable>,
    pub webgl1: std::result::Result<Option<FakeGl>, Unavailable>,
    pub webgl2: std::result::Result<Option<FakeGl>, Unavailable>,
    pub audio: std::result::Result<Vec<f32>, Unavailable>,
    pub font_probe: std::result::Result<(), Unavailable>,
    /// Rendered width per candidate; unlisted candidates match the baseline.
    pub font_widths: HashMap<String, f64>,
    pub baseline_width: f64,
    pub clock: String,
    pub clipboard: std::result::Result<(), Unavailable>,
    pub download: std::result::Result<(), Unavailable>,
    audio_gate: RefCell<Option<oneshot::Receiver<()>>>,
    drawn: Rc<RefCell<Vec<DrawOp>>>,
    clipboard_writes: RefCell<Vec<String>>,
    downloads: RefCell<Vec<ExportFile>>,
    audio_renders: Cell<usize>,
}

impl FakeEnvironment {
    pub fn new() -> Self {
        let navigator = NavigatorSnapshot {
            user_agent: Some(FAKE_USER_AGENT.into()),
            platform: Some("Linux x86_64".into()),
            product: Some("Gecko".into()),
            vendor: Some("Fake Vendor Inc.".into()),
            language: Some("en-US".into()),
            languages: Some(vec!["en-US".into(), "en".into()]),
            cookie_enabled: Some(true),
            hardware_concurrency: Some(8.0),
            device_memory: Some(8.0),
            max_touch_points: Some(0.0),
            on_line: Some(true),
            do_not_track: None,
        };
        let screen = ScreenSnapshot {
            width: Some(1920.0),
            height: Some(1080.0),
            avail_width: Some(1920.0),
            avail_height: Some(1040.0),
            color_depth: Some(24.0),
            device_pixel_ratio: Some(1.0),
        };
        let features = [
            Feature::WebGl,
            Feature::WebGl2,
            Feature::Canvas,
            Feature::OfflineAudio,
            Feature::Crypto,
            Feature::ServiceWorker,
            Feature::IndexedDb,
        ]
        .into_iter()
        .map(|f| (f, Ok(true)))
        .collect();
        let storage = [StorageArea::Local, StorageArea::Session]
            .into_iter()
            .map(|a| (a, Ok(())))
            .collect();
        let audio = (0..AudioGraph::STANDARD.length)
            .map(|i| ((i as f32) * 0.37).sin() * 0.25)
            .collect();
        let font_widths = [("Arial", 612.0), ("Verdana", 640.0), ("Helvetica", 598.0)]
            .into_iter()
            .map(|(f, w)| (f.to_string(), w))
            .collect();

        Self {
            navigator: Ok(navigator),
            screen: Ok(screen),
            timezone: Ok("Europe/Berlin".into()),
            features,
            storage,
            canvas: Ok(()),
            canvas_export: Ok(FAKE_CANVAS_DATA_URL.into()),
            webgl1: Ok(Some(FakeGl::standard())),
            webgl2: Ok(Some(FakeGl::standard())),
            audio: Ok(audio),
            font_probe: Ok(()),
            font_widths,
            baseline_width: 562.0,
            clock: FAKE_TIMESTAMP.into(),
            clipboard: Ok(()),
            download: Ok(()),
            audio_gate: RefCell::new(None),
            drawn: Rc::new(RefCell::new(Vec::new())),
            clipboard_writes: RefCell::new(Vec::new()),
            downloads: RefCell::new(Vec::new()),
            audio_renders: Cell::new(0),
        }
    }

    /// Hold the next audio render until `gate` fires (or its sender drops).
    pub fn with_audio_gate(self, gate: oneshot::Receiver<()>) -> Self {
        *self.audio_gate.borrow_mut() = Some(gate);
        self
    }

    pub fn drawn_ops(&self) -> Vec<DrawOp> {
        self.drawn.borrow().clone()
    }

    pub fn clipboard_writes(&self) -> Vec<String> {
        self.clipboard_writes.borrow().clone()
    }

    pub fn downloads(&self) -> Vec<ExportFile> {
        self.downloads.borrow().clone()
    }

    pub fn audio_renders(&self) -> usize {
        self.audio_renders.get()
    }
}

impl Default for FakeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Environment for FakeEnvironment {
    fn navigator(&self) -> std::result::Result<NavigatorSnapshot, Unavailable> {
        self.navigator.clone()
    }

    fn screen(&self) -> std::result::Result<ScreenSnapshot, Unavailable> {
        self.screen.clone()
    }

    fn timezone(&self) -> std::result::Result<String, Unavailable> {
        self.timezone.clone()
    }

    fn has_feature(&self, feature: Feature) -> std::result::Result<bool, Unavailable> {
        self.features.get(&feature).cloned().unwrap_or(Ok(false))
    }

    fn storage_round_trip(
        &self,
        area: StorageArea,
        _key: &str,
    ) -> std::result::Result<(), Unavailable> {
        self.storage
            .get(&area)
            .cloned()
            .unwrap_or_else(|| Err(Unavailable::not_supported("storage")))
    }

    fn create_canvas(
        &self,
        _width: u32,
        _height: u32,
    ) -> std::result::Result<Box<dyn Canvas2d>, Unavailable> {
        self.canvas.clone()?;
        self.drawn.borrow_mut().clear();
        Ok(Box::new(FakeCanvas {
            ops: Rc::clone(&self.drawn),
            export: self.canvas_export.clone(),
        }))
    }

    fn webgl_context(
        &self,
        version: WebGlVersion,
    ) -> std::result::Result<Option<Box<dyn GlContext>>, Unavailable> {
        let scripted = match version {
            WebGlVersion::WebGl1 => &self.webgl1,
            WebGlVersion::WebGl2 => &self.webgl2,
        };
        Ok(scripted
            .clone()?
            .map(|gl| Box::new(gl) as Box<dyn GlContext>))
    }

    async fn render_audio(&self, _graph: &AudioGraph) -> std::result::Result<Vec<f32>, Unavailable> {
        self.audio_renders.set(self.audio_renders.get() + 1);
        let gate = self.audio_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.audio.clone()
    }

    fn text_probe(
        &self,
        _sample: &str,
        _font_size: &str,
    ) -> std::result::Result<Box<dyn TextProbe>, Unavailable> {
        self.font_probe.clone()?;
        Ok(Box::new(FakeTextProbe {
            widths: self.font_widths.clone(),
            baseline: self.baseline_width,
        }))
    }

    fn now_iso8601(&self) -> String {
        self.clock.clone()
    }

    async fn write_clipboard(&self, text: &str) -> std::result::Result<(), Unavailable> {
        self.clipboard.clone()?;
        self.clipboard_writes.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn offer_download(&self, file: &ExportFile) -> std::result::Result<(), Unavailable> {
        self.download.clone()?;
        self.downloads.borrow_mut().push(file.clone());
        Ok(())
    }
}

/// [`DisplaySurface`] that records what was rendered.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    texts: RefCell<HashMap<Region, String>>,
    lists: RefCell<HashMap<Region, Vec<ListItem>>>,
    notices: RefCell<Vec<Notice>>,
    confirmations: Cell<usize>,
    missing: HashSet<Region>,
}

impl RecordingSurface {
    /// A page without the element for `region`; writes to it fail.
    pub fn without(mut self, region: Region) -> Self {
        self.missing.insert(region);
        self
    }

    fn present(&self, region: Region) -> Result<()> {
        if self.missing.contains(&region) {
            return Err(FingerprintError::MissingElement(format!("{:?}", region)));
        }
        Ok(())
    }

    pub fn text(&self, region: Region) -> Option<String> {
        self.texts.borrow().get(&region).cloned()
    }

    pub fn list(&self, region: Region) -> Option<Vec<ListItem>> {
        self.lists.borrow().get(&region).cloned()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn confirmations(&self) -> usize {
        self.confirmations.get()
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_text(&self, region: Region, text: &str) -> Result<()> {
        self.present(region)?;
        self.texts.borrow_mut().insert(region, text.to_string());
        Ok(())
    }

    fn set_list(&self, region: Region, items: &[ListItem]) -> Result<()> {
        self.present(region)?;
        self.lists.borrow_mut().insert(region, items.to_vec());
        Ok(())
    }

    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }

    fn confirm_copy(&self) {
        self.confirmations.set(self.confirmations.get() + 1);
    }
}
