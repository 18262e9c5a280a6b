//! Live flight position source (AeroDataBox-style API).
//!
//! `GET {base}/flights/number/{number}` returns a list of flight legs. The
//! first leg is used. Relevant shape:
//!
//! ```json
//! [{
//!   "number": "FR 8123",
//!   "status": "EnRoute",
//!   "airline": { "name": "Ryanair" },
//!   "aircraft": { "model": "Boeing 737-800", "reg": "EI-DCL" },
//!   "location": {
//!     "lat": 50.9, "lon": 12.1,
//!     "altitude": { "feet": 36000 },
//!     "groundSpeed": { "kmPerHour": 820 }
//!   },
//!   "departure": {
//!     "airport": { "iata": "KRK", "name": "Kraków", "location": { "lat": 50.08, "lon": 19.78 } },
//!     "scheduledTime": { "local": "2025-03-01 09:40+01:00" },
//!     "revisedTime": { "local": "2025-03-01 10:05+01:00" },
//!     "terminal": "1", "gate": "12"
//!   },
//!   "arrival": { ... }
//! }]
//! ```

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::debug;

use super::http::HttpClient;
use super::{airport_code, non_blank, FailureCause, FlightSource, SourceFailure, SourceResult};
use crate::model::{
    normalize_flight_number, Aircraft, Airline, AirportFragment, FlightFragment, FlightStatus,
    Position,
};
use crate::navmath::Coordinate;

const NAME: &str = "live";

/// Format of `scheduledTime.local` / `revisedTime.local`.
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M%:z";

/// Connection settings for [`LiveSource`].
#[derive(Debug, Clone)]
pub struct LiveSourceOptions {
    /// API base URL.
    pub base_url: String,
    /// Value for the `x-rapidapi-host` header.
    pub host: String,
    /// Value for the `x-rapidapi-key` header.
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveFlight {
    number: Option<String>,
    status: Option<String>,
    airline: Option<LiveAirline>,
    aircraft: Option<LiveAircraft>,
    location: Option<LiveLocation>,
    departure: Option<LiveMovement>,
    arrival: Option<LiveMovement>,
}

#[derive(Debug, Deserialize)]
struct LiveAirline {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LiveAircraft {
    model: Option<String>,
    reg: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveLocation {
    lat: Option<f64>,
    lon: Option<f64>,
    altitude: Option<LiveAltitude>,
    ground_speed: Option<LiveSpeed>,
}

#[derive(Debug, Deserialize)]
struct LiveAltitude {
    feet: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveSpeed {
    km_per_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveMovement {
    airport: Option<LiveAirport>,
    scheduled_time: Option<LiveTime>,
    revised_time: Option<LiveTime>,
    terminal: Option<String>,
    gate: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveAirport {
    iata: Option<String>,
    name: Option<String>,
    location: Option<LiveLatLon>,
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LiveLatLon {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LiveTime {
    local: Option<String>,
}

fn coordinate(lat: Option<f64>, lon: Option<f64>) -> Option<Coordinate> {
    Coordinate::checked(lat?, lon?)
}

fn local_time(time: Option<&LiveTime>) -> Option<DateTime<FixedOffset>> {
    let local = time?.local.as_deref()?;
    DateTime::parse_from_str(local.trim(), LOCAL_TIME_FORMAT).ok()
}

impl LiveMovement {
    fn scheduled(&self) -> Option<DateTime<FixedOffset>> {
        local_time(self.scheduled_time.as_ref())
    }

    fn clock_time(&self) -> Option<String> {
        self.scheduled().map(|t| t.format("%H:%M").to_string())
    }

    /// Positive difference between revised and scheduled time, in minutes.
    fn delay_minutes(&self) -> Option<u32> {
        let scheduled = self.scheduled()?;
        let revised = local_time(self.revised_time.as_ref())?;
        let minutes = (revised - scheduled).num_minutes();
        u32::try_from(minutes).ok().filter(|m| *m > 0)
    }

    fn airport_fragment(&self) -> Option<AirportFragment> {
        let airport = self.airport.as_ref()?;
        let fragment = AirportFragment {
            iata: airport_code(airport.iata.clone()),
            name: non_blank(airport.name.clone()),
            location: airport
                .location
                .as_ref()
                .and_then(|l| coordinate(l.lat, l.lon)),
            country: non_blank(airport.country_code.clone()),
            ..AirportFragment::default()
        };
        (!fragment.is_empty()).then_some(fragment)
    }
}

impl LiveFlight {
    fn into_fragment(self) -> FlightFragment {
        let location = self.location.and_then(|l| {
            coordinate(l.lat, l.lon).map(|coordinate| Position {
                coordinate,
                altitude_ft: l.altitude.and_then(|a| a.feet),
                ground_speed_kmh: l.ground_speed.and_then(|s| s.km_per_hour),
            })
        });

        let delay_minutes = self
            .departure
            .as_ref()
            .and_then(LiveMovement::delay_minutes)
            .or_else(|| self.arrival.as_ref().and_then(LiveMovement::delay_minutes));

        let mut status = self.status.as_deref().and_then(FlightStatus::from_label);
        if delay_minutes.is_some() && matches!(status, None | Some(FlightStatus::OnTime)) {
            status = Some(FlightStatus::Delayed);
        }

        let aircraft = self
            .aircraft
            .map(|a| Aircraft {
                model: non_blank(a.model),
                registration: non_blank(a.reg),
            })
            .filter(|a| a.model.is_some() || a.registration.is_some());

        let departure_airport = self.departure.as_ref().and_then(LiveMovement::airport_fragment);
        let arrival_airport = self.arrival.as_ref().and_then(LiveMovement::airport_fragment);

        FlightFragment {
            flight_number: non_blank(self.number).map(|n| normalize_flight_number(&n)),
            airline: self
                .airline
                .and_then(|a| non_blank(a.name))
                .map(Airline::named),
            from: departure_airport.as_ref().and_then(|a| a.iata.clone()),
            to: arrival_airport.as_ref().and_then(|a| a.iata.clone()),
            departure_time: self.departure.as_ref().and_then(LiveMovement::clock_time),
            arrival_time: self.arrival.as_ref().and_then(LiveMovement::clock_time),
            status,
            delay_minutes,
            location,
            gate: self.departure.as_ref().and_then(|d| non_blank(d.gate.clone())),
            terminal: self
                .departure
                .as_ref()
                .and_then(|d| non_blank(d.terminal.clone())),
            aircraft,
            departure_airport,
            arrival_airport,
        }
    }
}

/// Adapter for the live flight position API.
#[derive(Debug, Clone)]
pub struct LiveSource<C: HttpClient> {
    http_client: C,
    options: LiveSourceOptions,
}

impl<C: HttpClient> LiveSource<C> {
    /// Creates a new adapter.
    pub fn new(http_client: C, options: LiveSourceOptions) -> Self {
        Self {
            http_client,
            options,
        }
    }

    fn endpoint(&self, flight_number: &str) -> String {
        format!(
            "{}/flights/number/{}",
            self.options.base_url.trim_end_matches('/'),
            flight_number
        )
    }
}

#[async_trait]
impl<C: HttpClient> FlightSource for LiveSource<C> {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_flight(&self, flight_number: &str) -> SourceResult<Option<FlightFragment>> {
        let query = [
            ("withAircraftImage", "false"),
            ("withLocation", "true"),
            ("withFlightPlan", "false"),
        ];
        let headers = [
            ("x-rapidapi-key", self.options.api_key.as_str()),
            ("x-rapidapi-host", self.options.host.as_str()),
        ];

        let response = self
            .http_client
            .get(&self.endpoint(flight_number), &query, &headers)
            .await
            .map_err(|cause| SourceFailure::new(NAME, cause))?;

        if response.status == 404 || response.status == 204 {
            debug!(flight = flight_number, status = response.status, "No live data");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(SourceFailure::new(
                NAME,
                FailureCause::Status(response.status),
            ));
        }
        if response.is_blank() {
            debug!(flight = flight_number, status = response.status, "No live data");
            return Ok(None);
        }

        let legs: Vec<LiveFlight> = response
            .json()
            .map_err(|cause| SourceFailure::new(NAME, cause))?;

        Ok(legs
            .into_iter()
            .next()
            .map(LiveFlight::into_fragment)
            .filter(|fragment| !fragment.is_empty()))
    }
}
