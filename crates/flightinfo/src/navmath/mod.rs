//! Navigation and clock arithmetic for derived flight metrics.
//!
//! Everything here is pure: no I/O, no shared state.

mod clock;
mod geo;

pub use clock::{
    flight_duration_minutes, format_duration, parse_clock, to_minutes, MINUTES_PER_DAY,
};
pub use geo::{haversine_distance, progress_percent, Coordinate, EARTH_RADIUS_KM};
