//! One collection pass.
//!
//! Runs every collector against an [`Environment`], assembles the
//! [`EnvironmentRecord`], canonicalizes it and hashes the canonical form.
//! Collector faults never abort the pass; they surface as placeholders or
//! sentinels inside the record.

use crate::canonical::canonicalize;
use crate::collectors::{audio, canvas, features, fonts, navigator, screen, webgl};
use crate::config::FingerprintConfig;
use crate::environment::Environment;
use crate::error::Result;
use crate::hashing::sha256_hex;
use crate::record::{Category, EnvironmentRecord};

/// Output of a completed pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintResult {
    /// Canonical JSON text; this is what gets exported.
    pub canonical: String,
    /// SHA-256 of `canonical`.
    pub digest: String,
    pub record: EnvironmentRecord,
    pub canvas_digest: String,
    /// Generation of the run that produced this result.
    pub generation: u64,
}

pub async fn run<E: Environment + ?Sized>(
    env: &E,
    config: &FingerprintConfig,
    generation: u64,
) -> Result<FingerprintResult> {
    log::info!("Collecting fingerprint (run {})", generation);

    let user_agent = navigator::collect_user_agent(env);
    let hardware = navigator::collect_hardware(env);
    let screen = screen::collect(env);
    let features = features::collect(env);

    let ua_text = user_agent.user_agent.value().cloned().unwrap_or_default();
    let artifact = canvas::render(env, config, &ua_text);
    let canvas_digest = sha256_hex(artifact.as_str());

    let webgl = webgl::collect(env);
    let audio = audio::collect(env, &config.audio).await;
    let fonts = fonts::detect(env, config);

    let mut record = EnvironmentRecord::new();
    record.insert(Category::UserAgentInfo, &user_agent)?;
    record.insert(Category::HardwareInfo, &hardware)?;
    record.insert(Category::ScreenInfo, &screen)?;
    record.insert(Category::FeatureFlags, &features)?;
    record.insert(Category::WebglInfo, &webgl)?;
    record.insert(Category::CanvasHash, &canvas_digest)?;
    record.insert(Category::AudioSignal, &audio)?;
    record.insert(Category::FontList, &fonts)?;
    record.insert(Category::Timestamp, &env.now_iso8601())?;

    let canonical = canonicalize(&record)?;
    let digest = sha256_hex(&canonical);

    log::info!(
        "Fingerprint assembled: {} sections, digest {}",
        record.len(),
        &digest[..12]
    );

    Ok(FingerprintResult {
        canonical,
        digest,
        record,
        canvas_digest,
        generation,
    })
}
