//! Error types for the fingerprint collector
//!
//! Two layers:
//! - [`Unavailable`]: why a single signal could not be read. Collectors
//!   never propagate it; it ends up as a placeholder or sentinel in the
//!   record while staying inspectable on the typed reading.
//! - [`FingerprintError`]: failures of the session, actions and page
//!   wiring, with codes and user-facing messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Reason a platform capability produced no value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// The API is entirely absent from this environment.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// The API exists but refused the operation (privacy settings, permissions).
    #[error("denied: {0}")]
    Denied(String),

    /// The API threw or returned something unusable.
    #[error("failed: {0}")]
    Failed(String),
}

impl Unavailable {
    pub fn not_supported(what: impl Into<String>) -> Self {
        Unavailable::NotSupported(what.into())
    }

    pub fn denied(what: impl Into<String>) -> Self {
        Unavailable::Denied(what.into())
    }

    pub fn failed(what: impl Into<String>) -> Self {
        Unavailable::Failed(what.into())
    }

    /// Wrap a thrown JS value.
    pub fn from_js(context: &str, err: &JsValue) -> Self {
        Unavailable::Failed(format!("{}: {:?}", context, err))
    }
}

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Session errors (1xx)
    NotReady = 100,
    Superseded = 101,

    // Action errors (2xx)
    ClipboardDenied = 200,
    DownloadFailed = 201,

    // Page errors (3xx)
    DomError = 300,
    MissingElement = 301,

    // Configuration errors (4xx)
    ConfigError = 400,

    // Internal errors (9xx)
    SerializationError = 900,
    InternalError = 901,
}

/// Main error type for the collector
#[derive(Error, Debug, Clone)]
pub enum FingerprintError {
    // ===== Session Errors =====
    #[error("No fingerprint collected yet")]
    NotReady,

    #[error("No fingerprint to export yet")]
    NothingToExport,

    #[error("Collection run {run} superseded by run {latest}")]
    Superseded { run: u64, latest: u64 },

    // ===== Action Errors =====
    #[error("Clipboard write failed: {0}")]
    ClipboardDenied(Unavailable),

    #[error("Download failed: {0}")]
    DownloadFailed(Unavailable),

    // ===== Page Errors =====
    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Missing element: #{0}")]
    MissingElement(String),

    // ===== Configuration Errors =====
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ===== Internal Errors =====
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FingerprintError {
    /// Get the error code for programmatic handling
    pub fn code(&self) -> ErrorCode {
        match self {
            FingerprintError::NotReady | FingerprintError::NothingToExport => ErrorCode::NotReady,
            FingerprintError::Superseded { .. } => ErrorCode::Superseded,
            FingerprintError::ClipboardDenied(_) => ErrorCode::ClipboardDenied,
            FingerprintError::DownloadFailed(_) => ErrorCode::DownloadFailed,
            FingerprintError::Dom(_) => ErrorCode::DomError,
            FingerprintError::MissingElement(_) => ErrorCode::MissingElement,
            FingerprintError::Config(_) => ErrorCode::ConfigError,
            FingerprintError::Serialization(_) => ErrorCode::SerializationError,
            FingerprintError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether the page should tell the user about this error.
    ///
    /// A superseded run is routine (a newer run owns the result), so it is
    /// only logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            FingerprintError::NotReady
                | FingerprintError::NothingToExport
                | FingerprintError::ClipboardDenied(_)
                | FingerprintError::DownloadFailed(_)
        )
    }

    /// Get a user-friendly message for display
    pub fn user_message(&self) -> String {
        match self {
            FingerprintError::NotReady => "Not ready yet — wait a moment.".into(),
            FingerprintError::NothingToExport => "Not ready yet.".into(),
            FingerprintError::Superseded { .. } => {
                "A newer collection pass replaced this one.".into()
            }
            FingerprintError::ClipboardDenied(_) => {
                "Clipboard failed. You can copy manually from the UI.".into()
            }
            FingerprintError::DownloadFailed(_) => {
                "Download failed. You can copy the data manually from the UI.".into()
            }
            FingerprintError::Dom(_) | FingerprintError::MissingElement(_) => {
                "The page layout is incomplete. Some results may not be shown.".into()
            }
            FingerprintError::Config(_) => {
                "Invalid options were passed. Defaults are used instead.".into()
            }
            FingerprintError::Serialization(_) | FingerprintError::Internal(_) => {
                "An internal error occurred. Please reload the page.".into()
            }
        }
    }
}

impl From<serde_json::Error> for FingerprintError {
    fn from(err: serde_json::Error) -> Self {
        FingerprintError::Serialization(err.to_string())
    }
}

/// Thrown to JavaScript as an [`ErrorInfo`] object.
impl From<FingerprintError> for JsValue {
    fn from(err: FingerprintError) -> Self {
        serde_wasm_bindgen::to_value(&ErrorInfo::from(&err))
            .unwrap_or_else(|_| JsValue::from_str(&err.to_string()))
    }
}

/// Error information for JavaScript consumption
#[derive(Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u32,
    pub message: String,
    pub user_message: String,
    pub is_user_facing: bool,
}

impl From<&FingerprintError> for ErrorInfo {
    fn from(err: &FingerprintError) -> Self {
        ErrorInfo {
            code: err.code() as u32,
            message: err.to_string(),
            user_message: err.user_message(),
            is_user_facing: err.is_user_facing(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_errors() {
        assert!(FingerprintError::NotReady.is_user_facing());
        assert!(FingerprintError::NothingToExport.is_user_facing());
        assert!(FingerprintError::ClipboardDenied(Unavailable::denied("test")).is_user_facing());

        assert!(!FingerprintError::Superseded { run: 1, latest: 2 }.is_user_facing());
        assert!(!FingerprintError::Internal("test".into()).is_user_facing());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FingerprintError::NotReady.code(), ErrorCode::NotReady);
        assert_eq!(
            FingerprintError::DownloadFailed(Unavailable::failed("x")).code(),
            ErrorCode::DownloadFailed
        );
        assert_eq!(ErrorCode::ClipboardDenied as u32, 200);
    }

    #[test]
    fn test_not_ready_messages() {
        assert_eq!(FingerprintError::NothingToExport.code(), ErrorCode::NotReady);
        assert_eq!(
            FingerprintError::NotReady.user_message(),
            "Not ready yet — wait a moment."
        );
        assert_eq!(FingerprintError::NothingToExport.user_message(), "Not ready yet.");
    }

    #[test]
    fn test_error_info() {
        let err = FingerprintError::ClipboardDenied(Unavailable::denied("NotAllowedError"));
        let info = ErrorInfo::from(&err);
        assert_eq!(info.code, 200);
        assert!(info.message.contains("NotAllowedError"));
        assert_eq!(
            info.user_message,
            "Clipboard failed. You can copy manually from the UI."
        );
    }

    #[test]
    fn test_unavailable_display() {
        assert_eq!(
            Unavailable::not_supported("OfflineAudioContext").to_string(),
            "not supported: OfflineAudioContext"
        );
    }
}
