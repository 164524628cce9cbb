//! Error types for blackout.
//!
//! This module defines all error types used throughout the blackout crate,
//! providing detailed context for debugging and user-friendly error messages.

use thiserror::Error;

/// The main error type for blackout operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Request Validation Errors ===
    /// An unknown detection category was requested.
    ///
    /// Rejected before any document I/O happens.
    #[error("unknown detection category '{name}' (supported: email, phone, linkedin, portfolio, all_urls)")]
    InvalidCategory {
        /// The category name as supplied by the caller.
        name: String,
    },

    /// No detection categories were requested.
    #[error("no detection categories requested")]
    NoCategories,

    /// The requested output shape is not in the supported set.
    #[error("unsupported output shape: {shape}")]
    UnsupportedOutputShape {
        /// Description of the rejected shape.
        shape: String,
    },

    /// The input exceeds the configured size limit.
    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge {
        /// Size of the rejected input.
        size: usize,
        /// The configured limit.
        limit: usize,
    },

    // === Document Errors ===
    /// The source bytes could not be opened or parsed as a document.
    ///
    /// Fatal for the request (and for the single document in a batch).
    #[error("malformed document: {detail}")]
    MalformedDocument {
        /// Description of what went wrong.
        detail: String,
    },

    /// A shape conversion step failed.
    #[error("format conversion failed: {detail}")]
    ConversionFailure {
        /// Description of what went wrong.
        detail: String,
    },

    /// The supplied logo bytes are not a decodable raster image.
    ///
    /// Non-fatal during decoration (the logo is skipped); surfaced only by
    /// up-front validation paths.
    #[error("invalid decoration asset: {detail}")]
    DecorationAssetInvalid {
        /// Description of what went wrong.
        detail: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for blackout operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a malformed-document error.
    #[must_use]
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedDocument {
            detail: detail.into(),
        }
    }

    /// Create a conversion-failure error.
    #[must_use]
    pub fn conversion(detail: impl Into<String>) -> Self {
        Self::ConversionFailure {
            detail: detail.into(),
        }
    }

    /// Create a decoration-asset error.
    #[must_use]
    pub fn decoration(detail: impl Into<String>) -> Self {
        Self::DecorationAssetInvalid {
            detail: detail.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a request-validation failure (detected before
    /// any document was opened).
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCategory { .. }
                | Self::NoCategories
                | Self::UnsupportedOutputShape { .. }
                | Self::InputTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoCategories;
        assert_eq!(err.to_string(), "no detection categories requested");

        let err = Error::malformed("truncated xref table");
        assert_eq!(err.to_string(), "malformed document: truncated xref table");
    }

    #[test]
    fn test_invalid_category_display() {
        let err = Error::InvalidCategory {
            name: "ssn".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ssn"));
        assert!(msg.contains("all_urls"));
    }

    #[test]
    fn test_input_too_large_display() {
        let err = Error::InputTooLarge {
            size: 20,
            limit: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("20"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn test_is_validation_error() {
        assert!(Error::NoCategories.is_validation_error());
        assert!(Error::InvalidCategory {
            name: "x".to_string()
        }
        .is_validation_error());
        assert!(!Error::malformed("bad").is_validation_error());
        assert!(!Error::internal("bug").is_validation_error());
    }

    #[test]
    fn test_conversion_error_display() {
        let err = Error::conversion("no pages in source");
        assert!(err.to_string().contains("no pages in source"));
    }

    #[test]
    fn test_decoration_error_display() {
        let err = Error::decoration("not a PNG or JPEG");
        assert!(err.to_string().contains("not a PNG or JPEG"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "invalid alignment".to_string(),
        };
        assert!(err.to_string().contains("invalid alignment"));
    }
}
