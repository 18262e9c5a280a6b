//! Time-of-day arithmetic.
//!
//! Source data carries local clock times as `HH:MM` strings without a date,
//! so durations are computed modulo one day unless an explicit day offset is
//! known.

use chrono::{NaiveTime, Timelike};

use crate::error::{Error, Result};

/// Minutes in one day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse an `HH:MM` clock time.
///
/// # Errors
///
/// Returns [`Error::InvalidTimeFormat`] if the input is not a valid time.
pub fn parse_clock(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| Error::InvalidTimeFormat {
        value: value.to_string(),
    })
}

/// Convert an `HH:MM` clock time to minutes since midnight.
///
/// An absent (or blank) time yields `0`. Note that this makes "unknown" and
/// "00:00" indistinguishable; callers that care should check for presence
/// before calling.
///
/// # Errors
///
/// Returns [`Error::InvalidTimeFormat`] on malformed input.
pub fn to_minutes(clock_time: Option<&str>) -> Result<u32> {
    match clock_time.map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => {
            let time = parse_clock(value)?;
            Ok(time.hour() * 60 + time.minute())
        }
    }
}

/// Compute a flight duration in minutes from local departure/arrival times.
///
/// The result is `explicit_day_offset * 1440 + (arrival - departure)`. With no
/// explicit day offset, an arrival earlier than the departure is taken as a
/// single midnight crossing and one day is added. Multi-day flights need an
/// explicit offset.
///
/// # Errors
///
/// Returns [`Error::InvalidTimeFormat`] if either time is malformed.
pub fn flight_duration_minutes(
    departure: Option<&str>,
    arrival: Option<&str>,
    explicit_day_offset: u32,
) -> Result<u32> {
    let departure = i64::from(to_minutes(departure)?);
    let arrival = i64::from(to_minutes(arrival)?);

    let mut duration = i64::from(explicit_day_offset) * MINUTES_PER_DAY + (arrival - departure);
    if explicit_day_offset == 0 && duration < 0 {
        duration += MINUTES_PER_DAY;
    }

    u32::try_from(duration)
        .map_err(|_| Error::internal(format!("flight duration out of range: {duration}")))
}

/// Format a minute count as `H:MM`.
#[must_use]
pub fn format_duration(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
