//! Collector configuration and fixed signal constants.
//!
//! Everything that shapes the fingerprint lives here: change a constant
//! and every digest changes with it.

use serde::{Deserialize, Serialize};

/// Rendered in place of any value the environment could not provide.
pub const PLACEHOLDER: &str = "—";

/// Canvas artifact when the bitmap cannot be exported.
pub const CANVAS_EXPORT_BLOCKED: &str = "unable-to-export";

/// Audio signal when no offline rendering context exists.
pub const AUDIO_UNSUPPORTED: &str = "no-offline-audio";

/// Audio signal when rendering started but failed.
pub const AUDIO_FAILED: &str = "audio-failed";

/// Key written and removed when probing web storage.
pub const STORAGE_PROBE_KEY: &str = "__fp_test__";

/// Baseline family the font probe compares against.
pub const FONT_BASELINE: &str = "monospace";

/// Offline audio graph: triangle oscillator into a dynamics compressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioGraph {
    pub channels: u32,
    pub length: u32,
    pub sample_rate: f32,
    pub frequency: f32,
    pub threshold: f32,
    pub knee: f32,
    pub ratio: f32,
    pub attack: f32,
    pub release: f32,
    /// Only every `stride`-th sample of channel 0 enters the sum.
    pub stride: usize,
}

impl AudioGraph {
    pub const STANDARD: AudioGraph = AudioGraph {
        channels: 1,
        length: 44_100,
        sample_rate: 44_100.0,
        frequency: 10_000.0,
        threshold: -50.0,
        knee: 40.0,
        ratio: 12.0,
        attack: 0.0,
        release: 0.25,
        stride: 1000,
    };
}

impl Default for AudioGraph {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Element ids of the page regions and controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub summary: String,
    pub digest: String,
    pub hardware: String,
    pub screen: String,
    pub features: String,
    pub user_agent: String,
    pub canvas: String,
    pub canvas_digest: String,
    pub webgl: String,
    pub audio: String,
    pub fonts: String,
    pub copy_button: String,
    pub export_button: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            summary: "summaryText".into(),
            digest: "fingerprintHash".into(),
            hardware: "hardwareList".into(),
            screen: "screenList".into(),
            features: "featureList".into(),
            user_agent: "uaBlock".into(),
            canvas: "canvas".into(),
            canvas_digest: "canvasHash".into(),
            webgl: "webglInfo".into(),
            audio: "audioHash".into(),
            fonts: "fontList".into(),
            copy_button: "copyBtn".into(),
            export_button: "exportBtn".into(),
        }
    }
}

/// Configuration for a collector session.
/// Deserialized from the options object handed to `FingerprintApp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    pub elements: ElementIds,
    /// Fonts probed, in reporting order.
    pub font_candidates: Vec<String>,
    pub font_sample: String,
    pub font_size: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub audio: AudioGraph,
    /// Fonts shown in the list region (the record keeps all of them).
    pub max_fonts_shown: usize,
    /// Characters of the audio signal shown in the audio region.
    pub audio_preview_chars: usize,
    pub copy_confirmation_ms: u32,
    /// Collect again whenever the page becomes visible.
    pub rerun_on_visible: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            font_candidates: [
                "Arial",
                "Courier New",
                "Times New Roman",
                "Georgia",
                "Trebuchet MS",
                "Verdana",
                "Roboto",
                "Open Sans",
                "Lato",
                "Montserrat",
                "Noto Sans",
                "Segoe UI",
                "Helvetica",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            font_sample: "mmmmmmmmmmlli".into(),
            font_size: "72px".into(),
            canvas_width: 300,
            canvas_height: 150,
            audio: AudioGraph::STANDARD,
            max_fonts_shown: 12,
            audio_preview_chars: 36,
            copy_confirmation_ms: 1500,
            rerun_on_visible: true,
        }
    }
}
