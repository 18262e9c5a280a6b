//! Error types for flightinfo.
//!
//! This module defines the crate-wide error type. Failures of a single data
//! source are described by [`SourceFailure`]; the aggregator swallows those and
//! only their aggregate effect ([`Error::NoDataFound`]) reaches callers.

use thiserror::Error;

use crate::sources::SourceFailure;

/// The main error type for flightinfo operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Caller Input Errors ===
    /// The caller supplied an unusable query.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of what is wrong with the input.
        message: String,
    },

    // === Derived Metric Errors ===
    /// A latitude/longitude pair is missing, non-finite, or out of range.
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate {
        /// The offending latitude.
        lat: f64,
        /// The offending longitude.
        lon: f64,
    },

    /// A clock time is not in `HH:MM` form.
    #[error("invalid time format: '{value}' (expected HH:MM)")]
    InvalidTimeFormat {
        /// The rejected input.
        value: String,
    },

    // === Source Errors ===
    /// A single data source failed.
    #[error(transparent)]
    Source(#[from] SourceFailure),

    /// No data source produced usable data for the query.
    #[error("no data found for {query}")]
    NoDataFound {
        /// The query that came back empty.
        query: String,
    },

    /// The requested operation has no source able to answer it.
    #[error("unsupported: {operation}")]
    Unsupported {
        /// The operation that cannot be served.
        operation: String,
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

    // === Transport Errors ===
    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

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

/// A specialized Result type for flightinfo operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a no-data error for the given query.
    #[must_use]
    pub fn no_data_found(query: impl Into<String>) -> Self {
        Self::NoDataFound {
            query: query.into(),
        }
    }

    /// Create an unsupported-operation error.
    #[must_use]
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means nothing was found (as opposed to a failure).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoDataFound { .. })
    }

    /// Check if this error was caused by bad caller input.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
