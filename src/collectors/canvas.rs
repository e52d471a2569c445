//! Canvas rendering artifact
//!
//! Replays a fixed drawing sequence onto an off-document canvas and
//! exports the bitmap. Text rendering, anti-aliasing and compositing
//! differences between GPUs, drivers and font stacks show up in the
//! exported bytes.

use crate::config::{FingerprintConfig, CANVAS_EXPORT_BLOCKED};
use crate::environment::Environment;
use crate::error::Unavailable;

/// One 2D context instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillStyle(String),
    StrokeStyle(String),
    Font(String),
    TextBaseline(String),
    FillRect { x: f64, y: f64, w: f64, h: f64 },
    FillText { text: String, x: f64, y: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    BezierCurveTo { cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    Stroke,
    Fill,
}

/// The exported bitmap, or why there is none.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasArtifact {
    DataUrl(String),
    Unavailable(Unavailable),
}

impl CanvasArtifact {
    /// The string that gets hashed.
    pub fn as_str(&self) -> &str {
        match self {
            CanvasArtifact::DataUrl(url) => url,
            CanvasArtifact::Unavailable(_) => CANVAS_EXPORT_BLOCKED,
        }
    }
}

/// The drawing sequence. The arc is not preceded by `BeginPath`, so the
/// final fill covers the bezier path as well.
pub fn drawing_ops(user_agent: &str, width: u32, height: u32) -> Vec<DrawOp> {
    vec![
        DrawOp::FillStyle("#0b1220".into()),
        DrawOp::FillRect { x: 0.0, y: 0.0, w: width as f64, h: height as f64 },
        DrawOp::TextBaseline("top".into()),
        DrawOp::Font("16px \"Arial Black\", Gadget, sans-serif".into()),
        DrawOp::FillStyle("#ffffff".into()),
        DrawOp::FillText { text: format!("Fingerprint ✨ — {}", user_agent), x: 8.0, y: 8.0 },
        DrawOp::StrokeStyle("rgba(255,255,255,0.2)".into()),
        DrawOp::BeginPath,
        DrawOp::MoveTo { x: 10.0, y: 60.0 },
        DrawOp::BezierCurveTo { cp1x: 100.0, cp1y: 10.0, cp2x: 200.0, cp2y: 120.0, x: 290.0, y: 60.0 },
        DrawOp::Stroke,
        DrawOp::FillStyle("rgba(255, 255, 255, 0.03)".into()),
        DrawOp::FillRect { x: 20.0, y: 80.0, w: 30.0, h: 20.0 },
        DrawOp::Arc { x: 200.0, y: 30.0, radius: 12.0, start: 0.0, end: std::f64::consts::PI * 2.0 },
        DrawOp::Fill,
    ]
}

pub fn render<E: Environment + ?Sized>(
    env: &E,
    config: &FingerprintConfig,
    user_agent: &str,
) -> CanvasArtifact {
    match try_render(env, config, user_agent) {
        Ok(url) => CanvasArtifact::DataUrl(url),
        Err(reason) => {
            log::debug!("canvas artifact unavailable: {}", reason);
            CanvasArtifact::Unavailable(reason)
        }
    }
}

fn try_render<E: Environment + ?Sized>(
    env: &E,
    config: &FingerprintConfig,
    user_agent: &str,
) -> Result<String, Unavailable> {
    let mut canvas = env.create_canvas(config.canvas_width, config.canvas_height)?;
    for op in drawing_ops(user_agent, config.canvas_width, config.canvas_height) {
        canvas.draw(&op)?;
    }
    canvas.to_data_url()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::fake::{FakeEnvironment, FAKE_CANVAS_DATA_URL};
    use crate::hashing::sha256_hex;

    #[test]
    fn test_replays_drawing_sequence() {
        let env = FakeEnvironment::new();
        let config = FingerprintConfig::default();
        let artifact = render(&env, &config, "UA/1.0");

        assert_eq!(artifact, CanvasArtifact::DataUrl(FAKE_CANVAS_DATA_URL.into()));
        let ops = env.drawn_ops();
        assert_eq!(ops, drawing_ops("UA/1.0", 300, 150));
        assert!(ops.contains(&DrawOp::FillText {
            text: "Fingerprint ✨ — UA/1.0".into(),
            x: 8.0,
            y: 8.0
        }));
    }

    #[test]
    fn test_export_blocked_sentinel() {
        let mut env = FakeEnvironment::new();
        env.canvas_export = Err(Unavailable::denied("SecurityError"));
        let artifact = render(&env, &FingerprintConfig::default(), "UA");

        assert_eq!(artifact.as_str(), "unable-to-export");
        assert!(matches!(artifact, CanvasArtifact::Unavailable(Unavailable::Denied(_))));
    }

    #[test]
    fn test_artifact_digest() {
        let env = FakeEnvironment::new();
        let artifact = render(&env, &FingerprintConfig::default(), "UA");
        assert_eq!(
            sha256_hex(artifact.as_str()),
            sha256_hex("data:image/png;base64,AAAA")
        );
    }
}
