//! Copy and export actions.
//!
//! Both refuse to act until a result has been committed. User-facing
//! failures are shown through the [`DisplaySurface`]; every failure is
//! also returned.

use crate::environment::Environment;
use crate::error::{FingerprintError, Result};
use crate::pipeline::FingerprintResult;
use crate::presentation::{DisplaySurface, Notice};

pub const EXPORT_MIME_TYPE: &str = "application/json";

/// A file handed to the platform for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: String,
    pub contents: String,
}

/// `fingerprint-<first 19 chars of the ISO timestamp>.json`
pub fn export_filename(iso_timestamp: &str) -> String {
    let stamp: String = iso_timestamp.chars().take(19).collect();
    format!("fingerprint-{}.json", stamp)
}

/// Write the digest to the clipboard.
pub async fn copy_digest<E: Environment + ?Sized>(
    env: &E,
    result: Option<&FingerprintResult>,
    surface: &dyn DisplaySurface,
) -> Result<()> {
    let result = result.ok_or_else(|| report(surface, FingerprintError::NotReady))?;

    env.write_clipboard(&result.digest)
        .await
        .map_err(|reason| report(surface, FingerprintError::ClipboardDenied(reason)))?;

    log::info!("Copied digest to clipboard");
    surface.confirm_copy();
    Ok(())
}

/// Offer the canonical record as a JSON download.
pub fn export_record<E: Environment + ?Sized>(
    env: &E,
    result: Option<&FingerprintResult>,
    surface: &dyn DisplaySurface,
) -> Result<ExportFile> {
    let result = result.ok_or_else(|| report(surface, FingerprintError::NothingToExport))?;

    let file = ExportFile {
        filename: export_filename(&env.now_iso8601()),
        mime_type: EXPORT_MIME_TYPE.to_string(),
        contents: result.canonical.clone(),
    };

    env.offer_download(&file)
        .map_err(|reason| report(surface, FingerprintError::DownloadFailed(reason)))?;

    log::info!("Exported {}", file.filename);
    Ok(file)
}

/// Log `err` and show it on `surface` if the user should see it.
pub fn report(surface: &dyn DisplaySurface, err: FingerprintError) -> FingerprintError {
    log::warn!("{}", err);
    if err.is_user_facing() {
        surface.notify(&Notice::from(&err));
    }
    err
}

/// Fold errors the user has already been shown into `Ok(None)`.
pub fn settle<T>(outcome: Result<T>) -> Result<Option<T>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_user_facing() => Ok(None),
        Err(err) => Err(err),
    }
}
