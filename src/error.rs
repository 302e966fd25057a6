//! Error types for the wage ledger.
//!
//! The calculation core never fails: a missing rate falls back to the
//! configured default. Everything in this module belongs to the boundary
//! layers (configuration, storage and request validation).

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the wage ledger.
///
/// # Example
///
/// ```
/// use wage_ledger::error::LedgerError;
///
/// let error = LedgerError::ConfigNotFound {
///     path: "/missing/settings.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/settings.yaml");
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
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

    /// A wall-clock time was not in `HH:MM` form.
    #[error("Invalid time '{value}': {message}")]
    InvalidTime {
        /// The rejected input.
        value: String,
        /// What was wrong with it.
        message: String,
    },

    /// A month number outside 1..=12, or a year/month pair chrono cannot represent.
    #[error("Invalid month {year}-{month}")]
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
    },

    /// A field failed boundary validation.
    #[error("Invalid value for '{field}': {message}")]
    InvalidField {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No work session exists with the given id.
    #[error("Work session not found: {id}")]
    SessionNotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// No monthly aggregate exists with the given id.
    #[error("Monthly aggregate not found: {id}")]
    AggregateNotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// No hourly rate entry exists with the given id.
    #[error("Hourly rate not found: {id}")]
    RateNotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// Reading or writing the ledger snapshot failed.
    #[error("Storage error at '{path}': {message}")]
    Storage {
        /// The snapshot path.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

impl LedgerError {
    /// Shorthand for an [`LedgerError::InvalidField`].
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        LedgerError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
