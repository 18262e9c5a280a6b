//! Local timetable file.
//!
//! A JSON array of [`ScheduleRecord`]s. Serves per-flight lookups and is the
//! only source that can list flights between two airports.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use super::schedule::ScheduleRecord;
use super::{FlightSource, RouteSource, SourceResult};
use crate::error::Result;
use crate::model::{normalize_flight_number, FlightFragment};

const NAME: &str = "timetable";

/// In-memory timetable.
#[derive(Debug, Clone, Default)]
pub struct TimetableSource {
    records: Vec<ScheduleRecord>,
}

impl TimetableSource {
    /// Create a timetable from records.
    #[must_use]
    pub fn new(records: Vec<ScheduleRecord>) -> Self {
        Self { records }
    }

    /// Parse a timetable from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<ScheduleRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    /// Load a timetable file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let timetable = Self::from_json(&json)?;
        info!(path = %path.display(), flights = timetable.len(), "Loaded timetable");
        Ok(timetable)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the timetable has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn same_code(value: Option<&str>, code: &str) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case(code.trim()))
}

#[async_trait]
impl FlightSource for TimetableSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_flight(&self, flight_number: &str) -> SourceResult<Option<FlightFragment>> {
        let key = normalize_flight_number(flight_number);
        Ok(self
            .records
            .iter()
            .find(|record| record.matches_flight(&key))
            .cloned()
            .map(ScheduleRecord::into_fragment))
    }
}

#[async_trait]
impl RouteSource for TimetableSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_route(&self, from: &str, to: &str) -> SourceResult<Vec<FlightFragment>> {
        Ok(self
            .records
            .iter()
            .filter(|r| same_code(r.from.as_deref(), from) && same_code(r.to.as_deref(), to))
            .cloned()
            .map(ScheduleRecord::into_fragment)
            .collect())
    }
}
