//! Core error types for the Patrimoine application.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from the CSV layer, the filesystem, etc.) are converted to these types
//! by the storage crate.

use chrono::{NaiveDate, ParseError as ChronoParseError};
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for persistence operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert backend-specific errors (CSV, filesystem, etc.) into this
/// format.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open or create a store file.
    #[error("Failed to open store: {0}")]
    OpenFailed(String),

    /// Failed to read records from a store file.
    #[error("Failed to read store: {0}")]
    ReadFailed(String),

    /// Failed to write records to a store file.
    #[error("Failed to write store: {0}")]
    WriteFailed(String),

    /// The store file exists but does not have the expected columns.
    #[error("Store has unexpected columns: {0}")]
    HeaderMismatch(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Validation errors for user input and data loaded from collaborators.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Negative {field} for asset {asset_id}: {value}")]
    NegativeValue {
        field: &'static str,
        asset_id: String,
        value: String,
    },

    #[error("Duplicate observation for asset {asset_id} on {date}")]
    DuplicateObservation { asset_id: String, date: NaiveDate },

    #[error("Duplicate quote for ticker {ticker} on {date}")]
    DuplicateQuote { ticker: String, date: NaiveDate },

    #[error("Non-positive closing price for ticker {ticker} on {date}")]
    NonPositiveClose { ticker: String, date: NaiveDate },

    #[error("Invalid ticker '{0}'")]
    InvalidTicker(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
