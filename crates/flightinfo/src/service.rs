//! Query façade.
//!
//! [`FlightService`] validates caller input, delegates to the
//! [`Aggregator`] and, for tracked queries, publishes results through a
//! caller-owned [`QueryBoard`].

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::aggregator::Aggregator;
use crate::config::{Config, FlightSourceKind};
use crate::error::{Error, Result};
use crate::guard::QueryBoard;
use crate::model::{normalize_flight_number, Airport, Flight};
use crate::sources::{
    AirportMetadataSource, FlightSource, LiveSource, LiveSourceOptions, ReqwestClient,
    ScheduleSource, TimetableSource,
};

/// Flights between two airports.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    /// Candidate flights, possibly none.
    Flights(Vec<Flight>),
    /// No configured source can list flights by route.
    Unsupported,
}

/// Outcome of a query published through a [`QueryBoard`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    /// The result was the newest for its key and has been published.
    Published(T),
    /// A newer query for the same key superseded this one.
    Discarded,
}

impl<T> QueryOutcome<T> {
    /// The published value, if any.
    #[must_use]
    pub fn published(self) -> Option<T> {
        match self {
            Self::Published(value) => Some(value),
            Self::Discarded => None,
        }
    }
}

fn flight_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9]{3,8}$").expect("valid flight number regex"))
}

fn airport_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z]{3}$").expect("valid airport code regex"))
}

/// Normalize and validate a flight number.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the input is empty or not 3 to 8
/// letters and digits after normalization.
pub fn validate_flight_number(raw: &str) -> Result<String> {
    let normalized = normalize_flight_number(raw);
    if normalized.is_empty() {
        return Err(Error::invalid_argument("flight number is required"));
    }
    if !flight_number_pattern().is_match(&normalized) {
        return Err(Error::invalid_argument(format!(
            "'{}' is not a valid flight number",
            raw.trim()
        )));
    }
    Ok(normalized)
}

/// Normalize an airport query.
///
/// Three-letter codes are upper-cased; anything else is passed through
/// (trimmed) as a free-text name.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the query is blank.
pub fn normalize_airport_query(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_argument("airport is required"));
    }
    if airport_code_pattern().is_match(trimmed) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Entry point for flight, route and airport lookups.
#[derive(Debug)]
pub struct FlightService {
    aggregator: Aggregator,
}

impl FlightService {
    /// Create a service over a configured aggregator.
    #[must_use]
    pub fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }

    /// Build the sources described by `config`.
    ///
    /// Flight sources are registered in `query.precedence` order. The live
    /// source is skipped without an API key. A configured timetable replaces
    /// the HTTP structured lookup and also serves route queries.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the timetable
    /// cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = ReqwestClient::new(config.source_timeout())?;
        let mut aggregator = Aggregator::new(config.source_timeout());

        for kind in &config.query.precedence {
            match kind {
                FlightSourceKind::Live => {
                    if !config.live.enabled {
                        debug!("Live source disabled");
                        continue;
                    }
                    let Some(api_key) = config.live_api_key() else {
                        info!("No live API key configured, skipping live source");
                        continue;
                    };
                    let source = LiveSource::new(
                        http_client.clone(),
                        LiveSourceOptions {
                            base_url: config.live.base_url.clone(),
                            host: config.live.host.clone(),
                            api_key: api_key.to_string(),
                        },
                    );
                    aggregator = aggregator.with_flight_source(Arc::new(source));
                }
                FlightSourceKind::Schedule => {
                    if !config.schedule.enabled {
                        debug!("Schedule source disabled");
                        continue;
                    }
                    if let Some(path) = &config.schedule.timetable_path {
                        let timetable = Arc::new(TimetableSource::load(path)?);
                        aggregator = aggregator
                            .with_flight_source(timetable.clone())
                            .with_route_source(timetable);
                    } else {
                        let source =
                            ScheduleSource::new(http_client.clone(), &config.schedule.base_url);
                        aggregator = aggregator.with_flight_source(Arc::new(source));
                    }
                }
            }
        }

        if config.airports.enabled {
            let source = AirportMetadataSource::new(http_client, &config.airports.base_url);
            aggregator = aggregator.with_airport_source(Arc::new(source));
        }

        info!(
            sources = ?aggregator.flight_source_names(),
            airports = aggregator.has_airport_source(),
            routes = aggregator.has_route_source(),
            "Flight service ready"
        );
        Ok(Self::new(aggregator))
    }

    /// Create a service with a single flight source and nothing else.
    #[must_use]
    pub fn with_flight_source(source: Arc<dyn FlightSource>, config: &Config) -> Self {
        Self::new(Aggregator::new(config.source_timeout()).with_flight_source(source))
    }

    /// The underlying aggregator.
    #[must_use]
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Look up a flight by number.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the flight number is malformed
    /// - [`Error::NoDataFound`] if no source knows the flight
    #[instrument(skip(self))]
    pub async fn resolve_flight(&self, flight_number: &str) -> Result<Flight> {
        let key = validate_flight_number(flight_number)?;
        self.aggregator.aggregate_flight(&key).await
    }

    /// List flights between two airports.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if either airport is blank
    /// - [`Error::Source`] if the route source fails
    #[instrument(skip(self))]
    pub async fn resolve_route(&self, from: &str, to: &str) -> Result<RouteResult> {
        let from = normalize_airport_query(from)?;
        let to = normalize_airport_query(to)?;

        Ok(match self.aggregator.aggregate_route(&from, &to).await? {
            Some(flights) => RouteResult::Flights(flights),
            None => RouteResult::Unsupported,
        })
    }

    /// Look up an airport by code or name.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the query is blank
    /// - [`Error::Unsupported`] if no airport source is configured
    /// - [`Error::Source`] if the airport source fails
    /// - [`Error::NoDataFound`] if the airport is unknown
    #[instrument(skip(self))]
    pub async fn resolve_airport(&self, query: &str) -> Result<Airport> {
        let query = normalize_airport_query(query)?;
        self.aggregator.aggregate_airport(&query).await
    }

    /// Look up a flight and publish the result on `board`.
    ///
    /// If the same flight is queried again before this query settles, this
    /// result is discarded.
    ///
    /// # Errors
    ///
    /// Same as [`FlightService::resolve_flight`]; errors of superseded
    /// queries are reported as [`QueryOutcome::Discarded`].
    pub async fn track_flight(
        &self,
        board: &QueryBoard<Flight>,
        flight_number: &str,
    ) -> Result<QueryOutcome<Flight>> {
        let key = validate_flight_number(flight_number)?;
        let ticket = board.begin(&key);

        let result = self.aggregator.aggregate_flight(&key).await;
        if !board.is_current(&ticket) {
            return Ok(QueryOutcome::Discarded);
        }

        let flight = result?;
        if board.publish(ticket, flight.clone()) {
            Ok(QueryOutcome::Published(flight))
        } else {
            Ok(QueryOutcome::Discarded)
        }
    }
}
