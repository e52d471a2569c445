//! Environment provider
//!
//! Every platform capability the collectors and actions touch goes through
//! [`Environment`]. The browser implementation lives in
//! [`crate::browser`]; [`fake`] holds a deterministic in-memory one.
//!
//! Methods return raw platform values. Interpretation (falsy values,
//! defaults, sentinels) belongs to the collectors.

use async_trait::async_trait;

use crate::actions::ExportFile;
use crate::collectors::canvas::DrawOp;
use crate::config::AudioGraph;
use crate::error::Unavailable;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

/// Raw navigator properties. `None` means absent, `undefined` or `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigatorSnapshot {
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub product: Option<String>,
    pub vendor: Option<String>,
    pub language: Option<String>,
    pub languages: Option<Vec<String>>,
    pub cookie_enabled: Option<bool>,
    pub hardware_concurrency: Option<f64>,
    pub device_memory: Option<f64>,
    pub max_touch_points: Option<f64>,
    pub on_line: Option<bool>,
    pub do_not_track: Option<String>,
}

/// Raw screen geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenSnapshot {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub avail_width: Option<f64>,
    pub avail_height: Option<f64>,
    pub color_depth: Option<f64>,
    pub device_pixel_ratio: Option<f64>,
}

/// Capabilities probed by the feature-flag collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    WebGl,
    WebGl2,
    Canvas,
    OfflineAudio,
    Crypto,
    ServiceWorker,
    IndexedDb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    Local,
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebGlVersion {
    WebGl1,
    WebGl2,
}

/// An off-document 2D drawing surface.
pub trait Canvas2d {
    fn draw(&mut self, op: &DrawOp) -> Result<(), Unavailable>;

    /// Export the bitmap as a data URL.
    fn to_data_url(&self) -> Result<String, Unavailable>;
}

/// A live WebGL rendering context.
pub trait GlContext {
    /// Whether `getExtension(name)` returns an extension object.
    fn has_extension(&self, name: &str) -> Result<bool, Unavailable>;

    /// `getParameter(pname)` as a string; `None` when the parameter is null.
    fn parameter(&self, pname: u32) -> Result<Option<String>, Unavailable>;
}

/// Hidden text element used to measure rendered widths.
///
/// Implementations remove the element when dropped.
pub trait TextProbe {
    /// Rendered width of the probe's sample text set in `family`.
    fn width_with_family(&mut self, family: &str) -> Result<f64, Unavailable>;
}

/// Platform capabilities.
#[async_trait(?Send)]
pub trait Environment {
    fn navigator(&self) -> Result<NavigatorSnapshot, Unavailable>;

    fn screen(&self) -> Result<ScreenSnapshot, Unavailable>;

    /// Resolved IANA timezone name.
    fn timezone(&self) -> Result<String, Unavailable>;

    fn has_feature(&self, feature: Feature) -> Result<bool, Unavailable>;

    /// Write `key` into the storage area and remove it again.
    fn storage_round_trip(&self, area: StorageArea, key: &str) -> Result<(), Unavailable>;

    fn create_canvas(&self, width: u32, height: u32) -> Result<Box<dyn Canvas2d>, Unavailable>;

    /// `Ok(None)` when the context type is simply not offered.
    fn webgl_context(&self, version: WebGlVersion)
        -> Result<Option<Box<dyn GlContext>>, Unavailable>;

    /// Render `graph` offline and return channel 0.
    async fn render_audio(&self, graph: &AudioGraph) -> Result<Vec<f32>, Unavailable>;

    fn text_probe(&self, sample: &str, font_size: &str)
        -> Result<Box<dyn TextProbe>, Unavailable>;

    /// Current time as the platform's ISO-8601 string.
    fn now_iso8601(&self) -> String;

    async fn write_clipboard(&self, text: &str) -> Result<(), Unavailable>;

    fn offer_download(&self, file: &ExportFile) -> Result<(), Unavailable>;
}
