//! Result type alias for Scribe operations

use super::errors::ScribeError;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ScribeError>;
