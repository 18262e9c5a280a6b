//! Plain text output for lookup results.
//!
//! Only fields that are known are printed; nothing is shown as a placeholder.

use std::fmt::Write;

use crate::model::{Aircraft, Airport, Flight, FlightStatus};
use crate::navmath::format_duration;

fn line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{label:<11} {value}");
}

fn clock_with_airport(time: Option<&str>, airport: Option<&Airport>) -> Option<String> {
    let name = airport.and_then(|a| a.name.as_deref());
    match (time, name) {
        (Some(time), Some(name)) => Some(format!("{time}  ({name})")),
        (Some(time), None) => Some(time.to_string()),
        (None, Some(name)) => Some(format!("({name})")),
        (None, None) => None,
    }
}

fn status_text(flight: &Flight) -> Option<String> {
    let status = flight.status?;
    let delay = flight.effective_delay_minutes();
    Some(if status == FlightStatus::Delayed && delay > 0 {
        format!("{status} (+{delay} min)")
    } else {
        status.to_string()
    })
}

fn aircraft_text(aircraft: &Aircraft) -> Option<String> {
    match (&aircraft.model, &aircraft.registration) {
        (Some(model), Some(reg)) => Some(format!("{model} ({reg})")),
        (Some(model), None) => Some(model.clone()),
        (None, Some(reg)) => Some(reg.clone()),
        (None, None) => None,
    }
}

/// Render a flight as a short block of labelled lines.
#[must_use]
pub fn render_flight(flight: &Flight) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {} -> {}", flight.flight_number, flight.from, flight.to);

    if let Some(airline) = &flight.airline {
        line(&mut out, "Airline:", &airline.name);
    }
    if let Some(departure) = clock_with_airport(
        flight.departure_time.as_deref(),
        flight.departure_airport.as_ref(),
    ) {
        line(&mut out, "Departure:", departure);
    }
    if let Some(arrival) =
        clock_with_airport(flight.arrival_time.as_deref(), flight.arrival_airport.as_ref())
    {
        line(&mut out, "Arrival:", arrival);
    }
    if let Some(minutes) = flight.duration_minutes {
        line(&mut out, "Duration:", format_duration(minutes));
    }
    if let Some(status) = status_text(flight) {
        line(&mut out, "Status:", status);
    }

    let gate_terminal: Vec<String> = [
        flight.gate.as_ref().map(|g| format!("gate {g}")),
        flight.terminal.as_ref().map(|t| format!("terminal {t}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !gate_terminal.is_empty() {
        line(&mut out, "Boarding:", gate_terminal.join(", "));
    }

    if let Some(aircraft) = flight.aircraft.as_ref().and_then(aircraft_text) {
        line(&mut out, "Aircraft:", aircraft);
    }

    if let Some(position) = &flight.location {
        let mut text = format!(
            "{:.4}, {:.4}",
            position.coordinate.lat, position.coordinate.lon
        );
        if let Some(feet) = position.altitude_ft {
            let _ = write!(text, "  {feet:.0} ft");
        }
        if let Some(speed) = position.ground_speed_kmh {
            let _ = write!(text, "  {speed:.0} km/h");
        }
        line(&mut out, "Position:", text);
    } else if let Some(point) = flight.display_position() {
        line(
            &mut out,
            "Position:",
            format!("{:.4}, {:.4} (arrival airport)", point.lat, point.lon),
        );
    }

    if let Some(progress) = flight.progress {
        line(&mut out, "Progress:", format!("{progress:.0}%"));
    }
    match (flight.route_distance_km, flight.distance_to_arrival_km) {
        (Some(route), Some(remaining)) => line(
            &mut out,
            "Distance:",
            format!("{route:.0} km, {remaining:.0} km to go"),
        ),
        (Some(route), None) => line(&mut out, "Distance:", format!("{route:.0} km")),
        (None, Some(remaining)) => {
            line(&mut out, "Distance:", format!("{remaining:.0} km to go"));
        }
        (None, None) => {}
    }

    out
}

/// Render an airport as a short block of labelled lines.
#[must_use]
pub fn render_airport(airport: &Airport) -> String {
    let mut out = String::new();
    match &airport.name {
        Some(name) => {
            let _ = writeln!(out, "{}  {name}", airport.iata);
        }
        None => {
            let _ = writeln!(out, "{}", airport.iata);
        }
    }

    let region: Vec<&str> = [airport.country.as_deref(), airport.continent.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !region.is_empty() {
        line(&mut out, "Region:", region.join(", "));
    }
    if let Some(size) = &airport.size {
        line(&mut out, "Size:", size);
    }
    if let Some(location) = &airport.location {
        line(
            &mut out,
            "Location:",
            format!("{:.4}, {:.4}", location.lat, location.lon),
        );
    }
    out
}

/// Render a route listing, one flight per line.
#[must_use]
pub fn render_route(from: &str, to: &str, flights: &[Flight]) -> String {
    if flights.is_empty() {
        return format!("No flights found from {from} to {to}\n");
    }

    let mut out = String::new();
    for flight in flights {
        let _ = write!(out, "{:<8}", flight.flight_number);
        if let (Some(dep), Some(arr)) = (&flight.departure_time, &flight.arrival_time) {
            let _ = write!(out, " {dep}-{arr}");
        }
        if let Some(airline) = &flight.airline {
            let _ = write!(out, "  {}", airline.name);
        }
        if let Some(status) = status_text(flight) {
            let _ = write!(out, "  {status}");
        }
        out.push('\n');
    }
    out
}
