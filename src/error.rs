//! Error types for the coverage audit engine.
//!
//! Per-row problems never surface here: unparsable rows are dropped and
//! unparsable amounts resolve to zero. These errors cover the operations that
//! can fail as a whole, such as loading configuration or constructing an
//! interval by hand.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the coverage audit engine.
///
/// # Example
///
/// ```
/// use coverage_audit::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/funds.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/funds.yaml");
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

    /// An interval was constructed with an end date before its start date.
    #[error("Invalid interval {start} to {end}: {message}")]
    InvalidInterval {
        /// The declared start date.
        start: NaiveDate,
        /// The declared end date.
        end: NaiveDate,
        /// A description of what made the interval invalid.
        message: String,
    },

    /// A configuration entry referenced a fund category that does not exist.
    #[error("Unknown fund category: {name}")]
    UnknownCategory {
        /// The category name as written in the configuration.
        name: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
