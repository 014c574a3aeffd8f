//! Domain error types
//!
//! This module defines the error taxonomy for Scribe. All errors are
//! domain-specific and don't expose third-party types; each carries a
//! distinguishing kind plus a human-readable message so transport layers can
//! map them without string matching.

use thiserror::Error;

/// Main Scribe error type
///
/// This is the primary error type used throughout the service. The first
/// seven variants are the lifecycle taxonomy surfaced to callers; the
/// remaining variants belong to the surrounding stack (configuration files,
/// serialization, I/O).
#[derive(Debug, Error)]
pub enum ScribeError {
    /// Missing or malformed required input. Always client-caused; never
    /// retried automatically.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced note, draft, or parent is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// State transition attempted from an incompatible state (e.g. signing
    /// an already-locked note)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Business rule not yet satisfied (e.g. supervisor approval pending)
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Administratively disabled feature
    #[error("Policy error: {0}")]
    Policy(String),

    /// Malformed stored configuration value in the clinical settings table
    #[error("Invalid stored setting: {0}")]
    Config(String),

    /// Underlying store failure. Reported upward for the transport layer to
    /// decide retry policy; the core never retries.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Service configuration file errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ScribeError {
    /// Stable kind discriminant for transport-layer mapping
    pub fn kind(&self) -> &'static str {
        match self {
            ScribeError::Validation(_) => "validation",
            ScribeError::NotFound(_) => "not_found",
            ScribeError::Conflict(_) => "conflict",
            ScribeError::Precondition(_) => "precondition",
            ScribeError::Policy(_) => "policy",
            ScribeError::Config(_) => "config",
            ScribeError::Storage(_) => "storage",
            ScribeError::Configuration(_) => "configuration",
            ScribeError::Serialization(_) => "serialization",
            ScribeError::Io(_) => "io",
        }
    }

    /// True for errors caused by the caller's input or the note's current
    /// state, as opposed to service-side failures
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScribeError::Validation(_)
                | ScribeError::NotFound(_)
                | ScribeError::Conflict(_)
                | ScribeError::Precondition(_)
                | ScribeError::Policy(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScribeError {
    fn from(err: std::io::Error) -> Self {
        ScribeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScribeError {
    fn from(err: serde_json::Error) -> Self {
        ScribeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScribeError {
    fn from(err: toml::de::Error) -> Self {
        ScribeError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScribeError::Conflict("note is already signed and locked".to_string());
        assert_eq!(
            err.to_string(),
            "Conflict: note is already signed and locked"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(ScribeError::Validation(String::new()).kind(), "validation");
        assert_eq!(ScribeError::NotFound(String::new()).kind(), "not_found");
        assert_eq!(ScribeError::Conflict(String::new()).kind(), "conflict");
        assert_eq!(
            ScribeError::Precondition(String::new()).kind(),
            "precondition"
        );
        assert_eq!(ScribeError::Policy(String::new()).kind(), "policy");
        assert_eq!(ScribeError::Config(String::new()).kind(), "config");
        assert_eq!(ScribeError::Storage(String::new()).kind(), "storage");
    }

    #[test]
    fn test_client_error_partition() {
        assert!(ScribeError::Validation("missing patientId".into()).is_client_error());
        assert!(ScribeError::Policy("addenda disabled".into()).is_client_error());
        assert!(!ScribeError::Storage("connection reset".into()).is_client_error());
        assert!(!ScribeError::Config("bad json".into()).is_client_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ScribeError = io_err.into();
        assert!(matches!(err, ScribeError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ScribeError = json_err.into();
        assert!(matches!(err, ScribeError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("a = b = c").unwrap_err();
        let err: ScribeError = toml_err.into();
        assert!(matches!(err, ScribeError::Configuration(_)));
    }

    #[test]
    fn test_implements_std_error() {
        let err = ScribeError::Precondition("supervisor approval pending".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
