//! Error types for the payroll engine.
//!
//! Recoverable data problems never show up here; they are reported through
//! [`crate::diagnostics`]. This module covers the conditions that abort the
//! operation they occur in.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rates.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rates.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but describes an unusable rate table or policy.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// A caller handed the engine a value outside its domain.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending field or parameter.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// An external record source could not be opened or read.
    #[error("Source unavailable '{location}': {reason}")]
    SourceUnavailable {
        /// Identifies the source (usually a file path).
        location: String,
        /// Why the source could not be used.
        reason: String,
    },
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
