//! Offline audio rendering signal
//!
//! A triangle oscillator through a dynamics compressor, rendered without
//! playback. Floating-point differences in the platform's DSP show up in
//! the summed samples. This is the only collector that waits on the
//! platform, and it is not bounded by a timeout.

use serde::{Serialize, Serializer};

use crate::config::{AudioGraph, AUDIO_FAILED, AUDIO_UNSUPPORTED};
use crate::environment::Environment;
use crate::error::Unavailable;

#[derive(Debug, Clone, PartialEq)]
pub enum AudioSignal {
    Sum(f64),
    /// No offline rendering context.
    Unsupported(Unavailable),
    /// Rendering started but did not produce samples.
    Failed(Unavailable),
}

impl AudioSignal {
    /// Text form stored in the record.
    pub fn render(&self) -> String {
        match self {
            AudioSignal::Sum(sum) => sum.to_string(),
            AudioSignal::Unsupported(_) => AUDIO_UNSUPPORTED.to_string(),
            AudioSignal::Failed(_) => AUDIO_FAILED.to_string(),
        }
    }
}

impl Serialize for AudioSignal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

/// Sum of `|sample|` over every `stride`-th sample, in order.
pub fn summarize(samples: &[f32], stride: usize) -> f64 {
    samples
        .iter()
        .step_by(stride.max(1))
        .map(|s| f64::from(*s).abs())
        .sum()
}

pub async fn collect<E: Environment + ?Sized>(env: &E, graph: &AudioGraph) -> AudioSignal {
    match env.render_audio(graph).await {
        Ok(samples) => AudioSignal::Sum(summarize(&samples, graph.stride)),
        Err(reason @ Unavailable::NotSupported(_)) => {
            log::debug!("offline audio unsupported: {}", reason);
            AudioSignal::Unsupported(reason)
        }
        Err(reason) => {
            log::debug!("offline audio render failed: {}", reason);
            AudioSignal::Failed(reason)
        }
    }
}
