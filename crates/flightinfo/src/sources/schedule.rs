//! Structured flight lookup.
//!
//! The lookup service answers `GET {base}/flight-details?flight_number=X`
//! with one flat JSON object:
//!
//! ```json
//! {
//!   "flightNumber": "FR8123", "airline": "Ryanair", "from": "KRK", "to": "STN",
//!   "departureTime": "09:40", "arrivalTime": "11:20", "gate": "B7",
//!   "terminal": "2", "status": "Delayed", "delayMinutes": 25
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::HttpClient;
use super::{airport_code, clock_time, non_blank, FailureCause, FlightSource, SourceFailure, SourceResult};
use crate::model::{normalize_flight_number, Airline, FlightFragment, FlightStatus};

const NAME: &str = "schedule";

/// One flat record as served by the structured-lookup source.
///
/// Unknown fields are ignored; every known field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    /// Flight number.
    pub flight_number: Option<String>,
    /// Airline name.
    pub airline: Option<String>,
    /// Departure airport code.
    pub from: Option<String>,
    /// Arrival airport code.
    pub to: Option<String>,
    /// Local departure time.
    pub departure_time: Option<String>,
    /// Local arrival time.
    pub arrival_time: Option<String>,
    /// Departure gate.
    pub gate: Option<String>,
    /// Departure terminal.
    pub terminal: Option<String>,
    /// Status label ("On Time", "Delayed", "Boarding", "Cancelled").
    pub status: Option<String>,
    /// Delay in minutes; `null` means no delay.
    pub delay_minutes: Option<i64>,
}

impl ScheduleRecord {
    /// Map the record field-for-field onto a fragment.
    ///
    /// Values that do not parse (unknown status, malformed time, negative
    /// delay) are omitted.
    #[must_use]
    pub fn into_fragment(self) -> FlightFragment {
        FlightFragment {
            flight_number: non_blank(self.flight_number).map(|n| normalize_flight_number(&n)),
            airline: non_blank(self.airline).map(Airline::named),
            from: airport_code(self.from),
            to: airport_code(self.to),
            departure_time: clock_time(self.departure_time),
            arrival_time: clock_time(self.arrival_time),
            status: self.status.as_deref().and_then(FlightStatus::from_label),
            delay_minutes: self.delay_minutes.and_then(|m| u32::try_from(m).ok()),
            gate: non_blank(self.gate),
            terminal: non_blank(self.terminal),
            ..FlightFragment::default()
        }
    }

    /// Whether this record describes the given (normalized) flight number.
    #[must_use]
    pub fn matches_flight(&self, flight_number: &str) -> bool {
        self.flight_number
            .as_deref()
            .is_some_and(|n| normalize_flight_number(n) == flight_number)
    }
}

/// Adapter for the structured-lookup HTTP service.
#[derive(Debug, Clone)]
pub struct ScheduleSource<C: HttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: HttpClient> ScheduleSource<C> {
    /// Creates a new adapter talking to `base_url`.
    pub fn new(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/flight-details", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl<C: HttpClient> FlightSource for ScheduleSource<C> {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_flight(&self, flight_number: &str) -> SourceResult<Option<FlightFragment>> {
        let response = self
            .http_client
            .get(&self.endpoint(), &[("flight_number", flight_number)], &[])
            .await
            .map_err(|cause| SourceFailure::new(NAME, cause))?;

        if response.status == 404 || response.status == 204 {
            debug!(flight = flight_number, "Flight not known to schedule source");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(SourceFailure::new(
                NAME,
                FailureCause::Status(response.status),
            ));
        }

        let record: Option<ScheduleRecord> = response
            .json()
            .map_err(|cause| SourceFailure::new(NAME, cause))?;

        Ok(record
            .map(ScheduleRecord::into_fragment)
            .filter(|fragment| !fragment.is_empty()))
    }
}
