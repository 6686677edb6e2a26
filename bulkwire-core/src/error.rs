//! Error types for bulk request rendering and configuration.

use thiserror::Error;

/// Error raised while rendering a bulk request into wire lines.
///
/// Rendering only fails when the document body cannot be turned into
/// wire text. Missing fields, zero versions and empty strings are treated
/// as "not set" and never produce an error.
#[derive(Error, Debug)]
pub enum BulkError {
    /// A structured document could not be encoded as JSON.
    #[error("Document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Raw document bytes are not valid UTF-8.
    #[error("Document encoding failed: raw body is not valid UTF-8 ({0})")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

impl BulkError {
    /// Check whether this error came from encoding the document body.
    ///
    /// Every [`BulkError`] is an encoding failure today; the method exists so
    /// callers can match on intent rather than on variants.
    pub fn is_encoding_failure(&self) -> bool {
        matches!(self, BulkError::Encoding(_) | BulkError::InvalidUtf8(_))
    }
}

/// Error raised while loading [`RequestDefaults`](crate::RequestDefaults).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML content.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment variable held a value of the wrong shape.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv {
        /// Full environment variable name.
        key: String,
        /// The offending value.
        value: String,
    },
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, BulkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_display() {
        let err: BulkError = serde_json::from_str::<serde_json::Value>("{")
            .map_err(BulkError::from)
            .unwrap_err();
        assert!(err.to_string().starts_with("Document encoding failed"));
        assert!(err.is_encoding_failure());
    }

    #[test]
    fn test_invalid_utf8_is_encoding_failure() {
        let bytes = vec![0xff, 0xfe];
        let err: BulkError = std::str::from_utf8(&bytes).unwrap_err().into();
        assert!(err.is_encoding_failure());
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidEnv {
            key: "BULKWIRE_REFRESH".to_string(),
            value: "maybe".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("BULKWIRE_REFRESH"));
        assert!(display.contains("maybe"));
    }
}
