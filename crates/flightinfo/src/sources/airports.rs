//! Airport metadata lookup.
//!
//! `GET {base}/airports?airport_name=X` answers with candidate airports.
//! Coordinates arrive as strings or numbers depending on the backend:
//!
//! ```json
//! {"airports": [{"iata": "LAD", "name": "Luanda", "lat": "-8.85", "lon": "13.23",
//!                "iso": "AO", "continent": "AF", "size": "large"}]}
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::http::HttpClient;
use super::{airport_code, non_blank, AirportSource, FailureCause, SourceFailure, SourceResult};
use crate::model::AirportFragment;
use crate::navmath::Coordinate;

const NAME: &str = "airports";

/// A number that may be encoded as a JSON string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AirportRecord {
    iata: Option<String>,
    name: Option<String>,
    lat: Option<LooseNumber>,
    lon: Option<LooseNumber>,
    iso: Option<String>,
    continent: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AirportPayload {
    Wrapped { airports: Vec<AirportRecord> },
    Bare(Vec<AirportRecord>),
}

impl AirportPayload {
    fn into_records(self) -> Vec<AirportRecord> {
        match self {
            Self::Wrapped { airports } | Self::Bare(airports) => airports,
        }
    }
}

impl AirportRecord {
    fn has_code(&self, code: &str) -> bool {
        self.iata
            .as_deref()
            .is_some_and(|iata| iata.trim().eq_ignore_ascii_case(code))
    }

    fn into_fragment(self) -> AirportFragment {
        let location = match (
            self.lat.as_ref().and_then(LooseNumber::value),
            self.lon.as_ref().and_then(LooseNumber::value),
        ) {
            (Some(lat), Some(lon)) => Coordinate::checked(lat, lon),
            _ => None,
        };

        AirportFragment {
            iata: airport_code(self.iata),
            name: non_blank(self.name),
            location,
            size: non_blank(self.size),
            continent: non_blank(self.continent),
            country: non_blank(self.iso),
        }
    }
}

/// Pick the candidate whose code equals the query, else the first one.
fn select(records: Vec<AirportRecord>, query: &str) -> Option<AirportRecord> {
    let query = query.trim();
    let exact = records.iter().position(|r| r.has_code(query));
    let index = exact.unwrap_or(0);
    records.into_iter().nth(index)
}

/// Adapter for the airport metadata service.
#[derive(Debug, Clone)]
pub struct AirportMetadataSource<C: HttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: HttpClient> AirportMetadataSource<C> {
    /// Creates a new adapter talking to `base_url`.
    pub fn new(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/airports", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl<C: HttpClient> AirportSource for AirportMetadataSource<C> {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_airport(&self, query: &str) -> SourceResult<Option<AirportFragment>> {
        let response = self
            .http_client
            .get(&self.endpoint(), &[("airport_name", query)], &[])
            .await
            .map_err(|cause| SourceFailure::new(NAME, cause))?;

        if response.status == 404 || response.status == 204 {
            debug!(query = query, "Airport not known");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(SourceFailure::new(
                NAME,
                FailureCause::Status(response.status),
            ));
        }
        if response.is_blank() {
            debug!(query = query, "Airport not known");
            return Ok(None);
        }

        let payload: AirportPayload = response
            .json()
            .map_err(|cause| SourceFailure::new(NAME, cause))?;

        Ok(select(payload.into_records(), query)
            .map(AirportRecord::into_fragment)
            .filter(|fragment| !fragment.is_empty()))
    }
}
