//! Display model and surface abstraction.
//!
//! [`View`] is computed from a [`FingerprintResult`] without touching the
//! page; [`DisplaySurface`] writes it out. Every pass re-renders every
//! region.

use serde_json::Value;

use crate::config::FingerprintConfig;
use crate::error::{ErrorCode, FingerprintError, Result};
use crate::pipeline::FingerprintResult;
use crate::record::Category;

pub const SUMMARY_COLLECTING: &str = "Gathering data...";
pub const NO_FONTS_DETECTED: &str = "None detected (common)";
pub const COPY_LABEL: &str = "Copy fingerprint";
pub const COPIED_LABEL: &str = "Copied!";

/// Display regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Summary,
    Digest,
    Hardware,
    Screen,
    Features,
    UserAgent,
    CanvasDigest,
    Webgl,
    Audio,
    Fonts,
}

/// One list entry: `label: value`, or a bare value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub label: Option<String>,
    pub value: String,
}

impl ListItem {
    pub fn labeled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            value: value.into(),
        }
    }

    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            label: None,
            value: value.into(),
        }
    }
}

/// Non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub code: Option<ErrorCode>,
}

impl From<&FingerprintError> for Notice {
    fn from(err: &FingerprintError) -> Self {
        Notice {
            message: err.user_message(),
            code: Some(err.code()),
        }
    }
}

/// Where rendered values end up.
pub trait DisplaySurface {
    fn set_text(&self, region: Region, text: &str) -> Result<()>;

    fn set_list(&self, region: Region, items: &[ListItem]) -> Result<()>;

    fn notify(&self, notice: &Notice);

    /// Transient confirmation after a successful copy.
    fn confirm_copy(&self);
}

/// Everything shown for one fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub summary: String,
    pub digest: String,
    pub hardware: Vec<ListItem>,
    pub screen: Vec<ListItem>,
    pub features: Vec<ListItem>,
    pub user_agent_json: String,
    pub canvas_digest: String,
    pub webgl_json: String,
    pub audio: String,
    pub fonts: Vec<ListItem>,
}

impl View {
    pub fn from_result(result: &FingerprintResult, config: &FingerprintConfig) -> Result<Self> {
        let record = &result.record;

        let audio = record
            .get(Category::AudioSignal)
            .map(display_value)
            .unwrap_or_default();

        let mut fonts: Vec<ListItem> = match record.get(Category::FontList) {
            Some(Value::Array(names)) => names
                .iter()
                .take(config.max_fonts_shown)
                .map(|name| ListItem::plain(display_value(name)))
                .collect(),
            _ => Vec::new(),
        };
        if fonts.is_empty() {
            fonts.push(ListItem::plain(NO_FONTS_DETECTED));
        }

        Ok(Self {
            summary: format!("Fingerprint assembled — {} sections", record.len()),
            digest: result.digest.clone(),
            hardware: entries(record.get(Category::HardwareInfo)),
            screen: entries(record.get(Category::ScreenInfo)),
            features: entries(record.get(Category::FeatureFlags)),
            user_agent_json: pretty(record.get(Category::UserAgentInfo))?,
            canvas_digest: result.canvas_digest.clone(),
            webgl_json: pretty(record.get(Category::WebglInfo))?,
            audio: audio.chars().take(config.audio_preview_chars).collect(),
            fonts,
        })
    }

    /// Write every region. A region that fails is logged and skipped so
    /// the rest of the page still updates; the first failure is returned.
    pub fn render(&self, surface: &dyn DisplaySurface) -> Result<()> {
        let writes = [
            surface.set_text(Region::Digest, &self.digest),
            surface.set_text(Region::Summary, &self.summary),
            surface.set_text(Region::UserAgent, &self.user_agent_json),
            surface.set_list(Region::Hardware, &self.hardware),
            surface.set_list(Region::Screen, &self.screen),
            surface.set_list(Region::Features, &self.features),
            surface.set_text(Region::CanvasDigest, &self.canvas_digest),
            surface.set_text(Region::Webgl, &self.webgl_json),
            surface.set_text(Region::Audio, &self.audio),
            surface.set_list(Region::Fonts, &self.fonts),
        ];

        let mut first = None;
        for err in writes.into_iter().filter_map(|w| w.err()) {
            log::warn!("Render skipped a region: {}", err);
            first.get_or_insert(err);
        }
        first.map_or(Ok(()), Err)
    }
}

/// Shown while a pass is running.
pub fn render_collecting(surface: &dyn DisplaySurface) -> Result<()> {
    surface.set_text(Region::Summary, SUMMARY_COLLECTING)
}

/// Strings render bare, everything else as JSON text.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn entries(section: Option<&Value>) -> Vec<ListItem> {
    match section {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| ListItem::labeled(k.clone(), display_value(v)))
            .collect(),
        _ => Vec::new(),
    }
}

fn pretty(section: Option<&Value>) -> Result<String> {
    Ok(serde_json::to_string_pretty(section.unwrap_or(&Value::Null))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::fake::{FakeEnvironment, RecordingSurface};
    use crate::pipeline;
    use futures::executor::block_on;

    fn result_for(env: &FakeEnvironment) -> FingerprintResult {
        block_on(pipeline::run(env, &FingerprintConfig::default(), 1)).unwrap()
    }

    #[test]
    fn test_view_lists() {
        let env = FakeEnvironment::new();
        let view = View::from_result(&result_for(&env), &FingerprintConfig::default()).unwrap();

        assert_eq!(view.summary, "Fingerprint assembled — 9 sections");
        assert_eq!(view.hardware[0], ListItem::labeled("cores", "8"));
        assert_eq!(view.features[0], ListItem::labeled("webGL", "true"));
        assert_eq!(view.screen.len(), 6);
        assert!(view.user_agent_json.starts_with("{\n  \"userAgent\""));
    }

    #[test]
    fn test_fonts_truncated_to_limit() {
        let mut env = FakeEnvironment::new();
        for (i, font) in FingerprintConfig::default().font_candidates.iter().enumerate() {
            env.font_widths.insert(font.clone(), 500.0 + i as f64);
        }
        let config = FingerprintConfig::default();
        let view = View::from_result(&result_for(&env), &config).unwrap();

        assert_eq!(view.fonts.len(), 12);
        assert_eq!(view.fonts[0], ListItem::plain("Arial"));
    }

    #[test]
    fn test_no_fonts_placeholder() {
        let mut env = FakeEnvironment::new();
        env.font_widths.clear();
        let view = View::from_result(&result_for(&env), &FingerprintConfig::default()).unwrap();
        assert_eq!(view.fonts, vec![ListItem::plain(NO_FONTS_DETECTED)]);
    }

    #[test]
    fn test_audio_preview_truncated() {
        let mut env = FakeEnvironment::new();
        env.audio = Ok(vec![0.123_456_79; 44_100]);
        let view = View::from_result(&result_for(&env), &FingerprintConfig::default()).unwrap();
        assert!(view.audio.chars().count() <= 36);
    }

    #[test]
    fn test_render_fills_every_region() {
        let env = FakeEnvironment::new();
        let surface = RecordingSurface::default();
        View::from_result(&result_for(&env), &FingerprintConfig::default())
            .unwrap()
            .render(&surface)
            .unwrap();

        for region in [
            Region::Summary,
            Region::Digest,
            Region::UserAgent,
            Region::CanvasDigest,
            Region::Webgl,
            Region::Audio,
        ] {
            assert!(surface.text(region).is_some(), "{:?} not rendered", region);
        }
        for region in [Region::Hardware, Region::Screen, Region::Features, Region::Fonts] {
            assert!(surface.list(region).is_some(), "{:?} not rendered", region);
        }
    }

    #[test]
    fn test_render_continues_past_missing_region() {
        let env = FakeEnvironment::new();
        let surface = RecordingSurface::default().without(Region::Digest);
        let view = View::from_result(&result_for(&env), &FingerprintConfig::default()).unwrap();

        let err = view.render(&surface).unwrap_err();
        assert!(matches!(err, FingerprintError::MissingElement(ref id) if id == "Digest"));

        assert_eq!(surface.text(Region::Digest), None);
        assert_eq!(surface.text(Region::Summary), Some(view.summary.clone()));
        assert_eq!(surface.text(Region::Audio), Some(view.audio.clone()));
        assert_eq!(surface.list(Region::Fonts), Some(view.fonts.clone()));
    }

    #[test]
    fn test_render_reports_first_failure() {
        let env = FakeEnvironment::new();
        let surface = RecordingSurface::default()
            .without(Region::Fonts)
            .without(Region::Summary);
        let view = View::from_result(&result_for(&env), &FingerprintConfig::default()).unwrap();

        let err = view.render(&surface).unwrap_err();
        assert!(matches!(err, FingerprintError::MissingElement(ref id) if id == "Summary"));
        assert!(surface.list(Region::Hardware).is_some());
    }
}
