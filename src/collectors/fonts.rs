//! Installed-font detection by text metrics
//!
//! Each candidate is set as `"<candidate>, monospace"`; if the rendered
//! width differs from plain `monospace`, the candidate font is present.
//! A font with exactly the fallback's width is missed.

use crate::config::{FingerprintConfig, FONT_BASELINE};
use crate::environment::Environment;

/// Detected candidates, in candidate-list order.
pub fn detect<E: Environment + ?Sized>(env: &E, config: &FingerprintConfig) -> Vec<String> {
    let mut probe = match env.text_probe(&config.font_sample, &config.font_size) {
        Ok(probe) => probe,
        Err(reason) => {
            log::debug!("font probe unavailable: {}", reason);
            return Vec::new();
        }
    };

    let baseline = match probe.width_with_family(FONT_BASELINE) {
        Ok(width) => width,
        Err(reason) => {
            log::debug!("baseline measurement failed: {}", reason);
            return Vec::new();
        }
    };

    config
        .font_candidates
        .iter()
        .filter(|candidate| {
            match probe.width_with_family(&format!("{}, {}", candidate, FONT_BASELINE)) {
                Ok(width) => width != baseline,
                Err(reason) => {
                    log::debug!("measuring {} failed: {}", candidate, reason);
                    false
                }
            }
        })
        .cloned()
        .collect()
}
