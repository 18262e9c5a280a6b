//! Core flight and airport types.
//!
//! Sources produce *fragments* ([`FlightFragment`], [`AirportFragment`]) in
//! which every field is optional. The aggregator merges fragments and turns
//! the result into a canonical [`Flight`] once the required identifiers are
//! known.

use serde::{Deserialize, Serialize};

use crate::navmath::Coordinate;

/// Canonical form of a flight number: upper-case, no whitespace.
///
/// "fr 4897" and "FR4897" name the same flight.
#[must_use]
pub fn normalize_flight_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Operational status of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    /// Operating to schedule.
    #[serde(rename = "On Time")]
    OnTime,
    /// Running late; see [`Flight::effective_delay_minutes`].
    Delayed,
    /// Boarding at the gate.
    Boarding,
    /// Will not operate.
    Cancelled,
}

impl FlightStatus {
    /// The display label used by the structured-lookup source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTime => "On Time",
            Self::Delayed => "Delayed",
            Self::Boarding => "Boarding",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Map a provider status label onto the canonical set.
    ///
    /// Matching ignores case, spaces, hyphens and underscores. Labels that
    /// describe normal progress ("Expected", "EnRoute", "Arrived", ...) map to
    /// [`FlightStatus::OnTime`]. Unrecognised labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "ontime" | "scheduled" | "expected" | "checkin" | "enroute" | "departed"
            | "approaching" | "arrived" => Some(Self::OnTime),
            "delayed" => Some(Self::Delayed),
            "boarding" | "gateclosed" => Some(Self::Boarding),
            "cancelled" | "canceled" | "canceleduncertain" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live position of an airborne aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Where the aircraft is.
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// Altitude in feet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude_ft: Option<f64>,
    /// Ground speed in km/h.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_speed_kmh: Option<f64>,
}

impl Position {
    /// A position with no altitude or speed information.
    #[must_use]
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            altitude_ft: None,
            ground_speed_kmh: None,
        }
    }
}

/// Aircraft operating a flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Aircraft model, e.g. "Boeing 737-800".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Tail registration, e.g. "SP-LWA".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
}

/// Operating airline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    /// Airline name.
    pub name: String,
}

impl Airline {
    /// Create an airline from its name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A resolved airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// IATA code (unique key).
    pub iata: String,
    /// Airport name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Airport reference point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    /// Size class ("small", "medium", "large").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Continent code, e.g. "EU".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    /// ISO country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// The canonical flight record returned to callers.
///
/// Always carries `flight_number`, `from` and `to`. Derived fields
/// (`duration_minutes`, `progress` and the distances) are computed per query
/// and never copied from a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    /// Flight number, e.g. "FR8123".
    pub flight_number: String,
    /// Departure airport code.
    pub from: String,
    /// Arrival airport code.
    pub to: String,
    /// Operating airline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<Airline>,
    /// Local departure time, `HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    /// Local arrival time, `HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    /// Block time in minutes (derived).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Operational status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FlightStatus>,
    /// Delay in minutes. Absent means no delay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_minutes: Option<u32>,
    /// Live position, only while airborne.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Position>,
    /// Percent of the route flown (derived).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Departure to arrival airport distance in km (derived).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_distance_km: Option<f64>,
    /// Live position to arrival airport distance in km (derived).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_to_arrival_km: Option<f64>,
    /// Departure gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,
    /// Departure terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// Operating aircraft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<Aircraft>,
    /// Departure airport details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_airport: Option<Airport>,
    /// Arrival airport details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_airport: Option<Airport>,
}

impl Flight {
    /// Delay in minutes, or 0 unless the flight is [`FlightStatus::Delayed`].
    #[must_use]
    pub fn effective_delay_minutes(&self) -> u32 {
        match self.status {
            Some(FlightStatus::Delayed) => self.delay_minutes.unwrap_or(0),
            _ => 0,
        }
    }

    /// Whether a live position is known.
    #[must_use]
    pub fn is_airborne(&self) -> bool {
        self.location.is_some()
    }

    /// Best point to show the flight at.
    ///
    /// The live position when known, otherwise the arrival airport.
    #[must_use]
    pub fn display_position(&self) -> Option<Coordinate> {
        self.location.as_ref().map(|p| p.coordinate).or_else(|| {
            self.arrival_airport
                .as_ref()
                .and_then(|airport| airport.location)
        })
    }
}

/// Field-level merge used to combine fragments.
pub trait Merge {
    /// Fill every field of `self` that is unset with the value from `other`.
    ///
    /// Fields already set in `self` are never overwritten.
    fn fill_from(&mut self, other: Self);
}

fn fill<T>(slot: &mut Option<T>, other: Option<T>) {
    if slot.is_none() {
        *slot = other;
    }
}

fn fill_nested<T: Merge>(slot: &mut Option<T>, other: Option<T>) {
    if let Some(other) = other {
        match slot {
            Some(current) => current.fill_from(other),
            None => *slot = Some(other),
        }
    }
}

impl Merge for Aircraft {
    fn fill_from(&mut self, other: Self) {
        fill(&mut self.model, other.model);
        fill(&mut self.registration, other.registration);
    }
}

impl Merge for Position {
    fn fill_from(&mut self, other: Self) {
        fill(&mut self.altitude_ft, other.altitude_ft);
        fill(&mut self.ground_speed_kmh, other.ground_speed_kmh);
    }
}

/// Partial airport data from one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportFragment {
    /// IATA code.
    pub iata: Option<String>,
    /// Airport name.
    pub name: Option<String>,
    /// Reference point.
    pub location: Option<Coordinate>,
    /// Size class.
    pub size: Option<String>,
    /// Continent code.
    pub continent: Option<String>,
    /// ISO country code.
    pub country: Option<String>,
}

impl AirportFragment {
    /// A fragment that only knows the airport code.
    #[must_use]
    pub fn with_code(iata: impl Into<String>) -> Self {
        Self {
            iata: Some(iata.into()),
            ..Self::default()
        }
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Convert into an [`Airport`]; requires the IATA code.
    #[must_use]
    pub fn into_airport(self) -> Option<Airport> {
        Some(Airport {
            iata: self.iata?,
            name: self.name,
            location: self.location,
            size: self.size,
            continent: self.continent,
            country: self.country,
        })
    }
}

impl Merge for AirportFragment {
    fn fill_from(&mut self, other: Self) {
        fill(&mut self.iata, other.iata);
        fill(&mut self.name, other.name);
        fill(&mut self.location, other.location);
        fill(&mut self.size, other.size);
        fill(&mut self.continent, other.continent);
        fill(&mut self.country, other.country);
    }
}

impl From<Airport> for AirportFragment {
    fn from(airport: Airport) -> Self {
        Self {
            iata: Some(airport.iata),
            name: airport.name,
            location: airport.location,
            size: airport.size,
            continent: airport.continent,
            country: airport.country,
        }
    }
}

/// Partial flight data from one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightFragment {
    /// Flight number.
    pub flight_number: Option<String>,
    /// Operating airline.
    pub airline: Option<Airline>,
    /// Departure airport code.
    pub from: Option<String>,
    /// Arrival airport code.
    pub to: Option<String>,
    /// Local departure time, `HH:MM`.
    pub departure_time: Option<String>,
    /// Local arrival time, `HH:MM`.
    pub arrival_time: Option<String>,
    /// Operational status.
    pub status: Option<FlightStatus>,
    /// Delay in minutes.
    pub delay_minutes: Option<u32>,
    /// Live position.
    pub location: Option<Position>,
    /// Departure gate.
    pub gate: Option<String>,
    /// Departure terminal.
    pub terminal: Option<String>,
    /// Operating aircraft.
    pub aircraft: Option<Aircraft>,
    /// Departure airport details.
    pub departure_airport: Option<AirportFragment>,
    /// Arrival airport details.
    pub arrival_airport: Option<AirportFragment>,
}

impl FlightFragment {
    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Merge for FlightFragment {
    fn fill_from(&mut self, other: Self) {
        fill(&mut self.flight_number, other.flight_number);
        fill(&mut self.airline, other.airline);
        fill(&mut self.from, other.from);
        fill(&mut self.to, other.to);
        fill(&mut self.departure_time, other.departure_time);
        fill(&mut self.arrival_time, other.arrival_time);
        fill(&mut self.status, other.status);
        fill(&mut self.delay_minutes, other.delay_minutes);
        fill_nested(&mut self.location, other.location);
        fill(&mut self.gate, other.gate);
        fill(&mut self.terminal, other.terminal);
        fill_nested(&mut self.aircraft, other.aircraft);
        fill_nested(&mut self.departure_airport, other.departure_airport);
        fill_nested(&mut self.arrival_airport, other.arrival_airport);
    }
}
