//! Flight and airport data sources.
//!
//! Each adapter turns one provider's response shape into a fragment. Adapters
//! keep "not found" and "failed" apart:
//!
//! - `Ok(None)`: the source answered but knows nothing about the key.
//! - `Err(SourceFailure)`: network error, non-2xx status, unparseable payload
//!   or timeout.
//!
//! The aggregator tolerates absence and logs failures; neither reaches the
//! caller directly.

mod airports;
mod http;
mod live;
mod schedule;
mod timetable;

#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{AirportFragment, FlightFragment};
use crate::navmath::parse_clock;

pub use airports::AirportMetadataSource;
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use live::{LiveSource, LiveSourceOptions};
pub use schedule::{ScheduleRecord, ScheduleSource};
pub use timetable::TimetableSource;

/// Why a source failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The source answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The payload did not have the expected shape.
    #[error("unparseable payload: {0}")]
    Parse(String),

    /// The source did not answer in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// A hard failure of one source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("source '{source_name}' failed: {cause}")]
pub struct SourceFailure {
    /// Name of the failing source.
    pub source_name: &'static str,
    /// What went wrong.
    pub cause: FailureCause,
}

impl SourceFailure {
    /// Create a failure for the named source.
    #[must_use]
    pub fn new(source_name: &'static str, cause: FailureCause) -> Self {
        Self { source_name, cause }
    }

    /// Check if this failure was a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, FailureCause::Timeout(_))
    }
}

/// Result type for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceFailure>;

/// A source of per-flight data, keyed by flight number.
#[async_trait]
pub trait FlightSource: Send + Sync {
    /// Name of this source (for logging and failure reports).
    fn name(&self) -> &'static str;

    /// Fetch what this source knows about a flight.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceFailure`] if the source could not be queried.
    async fn fetch_flight(&self, flight_number: &str) -> SourceResult<Option<FlightFragment>>;
}

/// A source of airport metadata, keyed by IATA code or free-text name.
#[async_trait]
pub trait AirportSource: Send + Sync {
    /// Name of this source.
    fn name(&self) -> &'static str;

    /// Resolve an airport by code or name.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceFailure`] if the source could not be queried.
    async fn fetch_airport(&self, query: &str) -> SourceResult<Option<AirportFragment>>;
}

/// A source that can list flights between two airports.
#[async_trait]
pub trait RouteSource: Send + Sync {
    /// Name of this source.
    fn name(&self) -> &'static str;

    /// List candidate flights from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceFailure`] if the source could not be queried.
    async fn fetch_route(&self, from: &str, to: &str) -> SourceResult<Vec<FlightFragment>>;
}

/// Trimmed, non-empty string or nothing.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Upper-cased airport code, or nothing.
pub(crate) fn airport_code(value: Option<String>) -> Option<String> {
    non_blank(value).map(|v| v.to_uppercase())
}

/// Clock time normalized to `HH:MM`; malformed values are dropped.
pub(crate) fn clock_time(value: Option<String>) -> Option<String> {
    let value = non_blank(value)?;
    parse_clock(&value)
        .ok()
        .map(|time| time.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = SourceFailure::new("live", FailureCause::Status(503));
        let msg = failure.to_string();
        assert!(msg.contains("live"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn test_failure_is_timeout() {
        let failure = SourceFailure::new("live", FailureCause::Timeout(Duration::from_secs(5)));
        assert!(failure.is_timeout());
        assert!(!SourceFailure::new("live", FailureCause::Status(500)).is_timeout());
    }

    #[test]
    fn test_cause_display() {
        assert!(FailureCause::Network("refused".to_string())
            .to_string()
            .contains("network"));
        assert!(FailureCause::Parse("eof".to_string())
            .to_string()
            .contains("unparseable"));
        assert!(FailureCause::Timeout(Duration::from_millis(250))
            .to_string()
            .contains("250ms"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  B7 ".to_string())), Some("B7".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_airport_code_uppercases() {
        assert_eq!(airport_code(Some("krk".to_string())), Some("KRK".to_string()));
    }

    #[test]
    fn test_clock_time_normalizes() {
        assert_eq!(clock_time(Some("6:15".to_string())), Some("06:15".to_string()));
        assert_eq!(clock_time(Some("23:05".to_string())), Some("23:05".to_string()));
        assert_eq!(clock_time(Some("soon".to_string())), None);
        assert_eq!(clock_time(None), None);
    }
}
