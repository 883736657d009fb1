//! Error handling for the dashboard data layer

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::postgrest::PostgrestApiErrorDetails;

/// Unified error type for gateway, mapping and store operations
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// CSV reading or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PostgREST rejected the request with a structured error body
    #[error("API error: {details} (Status: {status})")]
    Api {
        details: PostgrestApiErrorDetails,
        status: reqwest::StatusCode,
    },

    /// PostgREST rejected the request and the body was not a PostgREST error
    #[error("API error (unparsed): {message} (Status: {status})")]
    UnparsedApi {
        message: String,
        status: reqwest::StatusCode,
    },

    /// A stored row could not be translated into an entity
    #[error("Mapping error: {0}")]
    Mapping(#[from] MapError),

    /// A single-row operation touched the wrong number of rows
    #[error("Expected {expected} row(s), got {actual}")]
    RowCount { expected: usize, actual: usize },

    /// No row with the given id
    #[error("{table}: no row with id {id}")]
    NotFound { table: String, id: String },

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any remote call was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A failure shared by every caller of one deduplicated read
    #[error(transparent)]
    Shared(Arc<Error>),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new invalid input error
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Create a new not found error
    pub fn not_found(table: &str, id: &str) -> Self {
        Error::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }

    /// The underlying error, looking through [`Error::Shared`]
    pub fn root(&self) -> &Error {
        match self {
            Error::Shared(inner) => inner.root(),
            other => other,
        }
    }
}

/// Failures while translating a storage row into an entity
#[derive(Error, Debug)]
pub enum MapError {
    #[error("invalid coordinates {raw:?}: {source}")]
    Coordinates {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
