//! Great-circle geometry.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Distance: kilometres, mean Earth radius

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated latitude/longitude pair in degrees.
///
/// Deserialization goes through [`Coordinate::new`], so a decoded value is
/// always in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude in degrees north.
    pub lat: f64,
    /// Longitude in degrees east.
    pub lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = Error;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Self::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if either component is invalid.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        check(lat, lon)?;
        Ok(Self { lat, lon })
    }

    /// Like [`Coordinate::new`], but drops invalid input instead of failing.
    #[must_use]
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        Self::new(lat, lon).ok()
    }

    /// Whether both components are finite and in range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        check(self.lat, self.lon).is_ok()
    }

    /// Great-circle distance to `other` in kilometres.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if either point is invalid.
    pub fn distance_km(&self, other: &Coordinate) -> Result<f64> {
        haversine_distance(self.lat, self.lon, other.lat, other.lon)
    }
}

fn check(lat: f64, lon: f64) -> Result<()> {
    let valid = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidCoordinate { lat, lon })
    }
}

/// Calculate the great-circle distance between two points.
///
/// Uses the haversine formula with the mean Earth radius.
///
/// # Errors
///
/// Returns [`Error::InvalidCoordinate`] if any input is NaN, infinite, or out
/// of range. Callers should treat this as "distance unavailable", never as 0.
///
/// # Example
///
/// ```
/// use flightinfo::navmath::haversine_distance;
///
/// // One degree of longitude along the equator
/// let d = haversine_distance(0.0, 0.0, 0.0, 1.0).unwrap();
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64> {
    check(lat1, lon1)?;
    check(lat2, lon2)?;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().asin();

    Ok(EARTH_RADIUS_KM * c)
}

/// Percentage of the route flown, clamped to `[0, 100]`.
///
/// Computed as the distance from `departure` to `current` over the distance
/// from `departure` to `arrival`. Returns `None` when any point is missing or
/// invalid, or when the route has zero length.
#[must_use]
pub fn progress_percent(
    current: Option<Coordinate>,
    departure: Option<Coordinate>,
    arrival: Option<Coordinate>,
) -> Option<f64> {
    let (current, departure, arrival) = (current?, departure?, arrival?);

    let total = departure.distance_km(&arrival).ok()?;
    if total <= 0.0 {
        return None;
    }
    let travelled = departure.distance_km(&current).ok()?;

    Some((travelled / total * 100.0).clamp(0.0, 100.0))
}
