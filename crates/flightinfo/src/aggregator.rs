//! Fan-out, merge and derived metrics.
//!
//! The [`Aggregator`] queries every configured flight source concurrently,
//! waits for all of them to settle, and merges the fragments in precedence
//! order. Missing airport coordinates are then resolved as a dependent step,
//! and the derived fields are computed from the merged data.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Airport, AirportFragment, Flight, FlightFragment, FlightStatus, Merge};
use crate::navmath::{flight_duration_minutes, progress_percent, Coordinate};
use crate::sources::{
    AirportSource, FailureCause, FlightSource, RouteSource, SourceFailure, SourceResult,
};

/// Bound a source call by `limit`, turning expiry into a timeout failure.
async fn bounded<T>(
    source_name: &'static str,
    limit: Duration,
    call: impl Future<Output = SourceResult<T>>,
) -> SourceResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(outcome) => outcome,
        Err(_) => Err(SourceFailure::new(source_name, FailureCause::Timeout(limit))),
    }
}

/// Merge fragments given in precedence order.
///
/// Earlier fragments win on every field they set; later fragments only fill
/// what is still unset. Nested records merge field by field.
#[must_use]
pub fn merge_fragments(fragments: impl IntoIterator<Item = FlightFragment>) -> FlightFragment {
    let mut merged = FlightFragment::default();
    for fragment in fragments {
        merged.fill_from(fragment);
    }
    merged
}

fn airport_location(airport: Option<&AirportFragment>) -> Option<Coordinate> {
    airport.and_then(|a| a.location)
}

fn into_airport(fragment: Option<AirportFragment>, code: &str) -> Option<Airport> {
    let mut fragment = fragment?;
    if fragment.iata.is_none() {
        fragment.iata = Some(code.to_string());
    }
    fragment.into_airport()
}

/// Turn a merged fragment into a canonical [`Flight`].
///
/// `query_key` stands in for the flight number when no source supplied one.
/// Derived fields are computed here and nowhere else.
///
/// # Errors
///
/// Returns [`Error::NoDataFound`] if the departure or arrival airport code is
/// unknown.
pub fn build_flight(fragment: FlightFragment, query_key: &str) -> Result<Flight> {
    let FlightFragment {
        flight_number,
        airline,
        from,
        to,
        departure_time,
        arrival_time,
        status,
        delay_minutes,
        location,
        gate,
        terminal,
        aircraft,
        departure_airport,
        arrival_airport,
    } = fragment;

    let delay_minutes = delay_minutes.filter(|_| status == Some(FlightStatus::Delayed));

    let (Some(from), Some(to)) = (from, to) else {
        debug!(flight = query_key, "Merged data lacks departure or arrival airport");
        return Err(Error::no_data_found(query_key));
    };

    let duration_minutes = match (departure_time.as_deref(), arrival_time.as_deref()) {
        (Some(departure), Some(arrival)) => {
            match flight_duration_minutes(Some(departure), Some(arrival), 0) {
                Ok(minutes) => Some(minutes),
                Err(e) => {
                    debug!(flight = query_key, error = %e, "Duration unavailable");
                    None
                }
            }
        }
        _ => None,
    };

    let departure_point = airport_location(departure_airport.as_ref());
    let arrival_point = airport_location(arrival_airport.as_ref());
    let current_point = location.as_ref().map(|p| p.coordinate);

    let route_distance_km = match (departure_point, arrival_point) {
        (Some(dep), Some(arr)) => dep.distance_km(&arr).ok(),
        _ => None,
    };
    let distance_to_arrival_km = match (current_point, arrival_point) {
        (Some(cur), Some(arr)) => cur.distance_km(&arr).ok(),
        _ => None,
    };
    let progress = progress_percent(current_point, departure_point, arrival_point);

    Ok(Flight {
        flight_number: flight_number.unwrap_or_else(|| query_key.to_string()),
        departure_airport: into_airport(departure_airport, &from),
        arrival_airport: into_airport(arrival_airport, &to),
        from,
        to,
        airline,
        departure_time,
        arrival_time,
        duration_minutes,
        status,
        delay_minutes,
        location,
        progress,
        route_distance_km,
        distance_to_arrival_km,
        gate,
        terminal,
        aircraft,
    })
}

/// Queries sources and assembles canonical records.
pub struct Aggregator {
    flight_sources: Vec<Arc<dyn FlightSource>>,
    airport_source: Option<Arc<dyn AirportSource>>,
    route_source: Option<Arc<dyn RouteSource>>,
    source_timeout: Duration,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("flight_sources", &self.flight_source_names())
            .field("airport_source", &self.airport_source.as_ref().map(|s| s.name()))
            .field("route_source", &self.route_source.as_ref().map(|s| s.name()))
            .field("source_timeout", &self.source_timeout)
            .finish()
    }
}

impl Aggregator {
    /// Create an aggregator with no sources.
    #[must_use]
    pub fn new(source_timeout: Duration) -> Self {
        Self {
            flight_sources: Vec::new(),
            airport_source: None,
            route_source: None,
            source_timeout,
        }
    }

    /// Append a flight source. Sources added earlier take precedence.
    #[must_use]
    pub fn with_flight_source(mut self, source: Arc<dyn FlightSource>) -> Self {
        self.flight_sources.push(source);
        self
    }

    /// Set the airport metadata source.
    #[must_use]
    pub fn with_airport_source(mut self, source: Arc<dyn AirportSource>) -> Self {
        self.airport_source = Some(source);
        self
    }

    /// Set the source used to list flights between airports.
    #[must_use]
    pub fn with_route_source(mut self, source: Arc<dyn RouteSource>) -> Self {
        self.route_source = Some(source);
        self
    }

    /// Names of the flight sources in precedence order.
    #[must_use]
    pub fn flight_source_names(&self) -> Vec<&'static str> {
        self.flight_sources.iter().map(|s| s.name()).collect()
    }

    /// Whether an airport source is configured.
    #[must_use]
    pub fn has_airport_source(&self) -> bool {
        self.airport_source.is_some()
    }

    /// Whether a route-capable source is configured.
    #[must_use]
    pub fn has_route_source(&self) -> bool {
        self.route_source.is_some()
    }

    /// Upper bound for a single source call.
    #[must_use]
    pub fn source_timeout(&self) -> Duration {
        self.source_timeout
    }

    /// Query all flight sources and return their fragments in precedence order.
    ///
    /// Empty answers and failures are dropped; failures are logged.
    async fn gather(&self, flight_number: &str) -> Vec<FlightFragment> {
        let calls = self.flight_sources.iter().map(|source| async move {
            let name = source.name();
            let outcome = bounded(
                name,
                self.source_timeout,
                source.fetch_flight(flight_number),
            )
            .await;
            (name, outcome)
        });

        let mut fragments = Vec::new();
        for (name, outcome) in join_all(calls).await {
            match outcome {
                Ok(Some(fragment)) if !fragment.is_empty() => {
                    debug!(source = name, flight = flight_number, "Source answered");
                    fragments.push(fragment);
                }
                Ok(_) => debug!(source = name, flight = flight_number, "Source has no data"),
                Err(failure) => warn!(
                    source = name,
                    flight = flight_number,
                    error = %failure,
                    "Source failed, excluding it from the merge"
                ),
            }
        }
        fragments
    }

    /// Resolve one airport code, logging and swallowing failures.
    ///
    /// Only an exact code match is accepted.
    async fn lookup_airport(&self, code: Option<&str>) -> Option<AirportFragment> {
        let code = code?;
        let source = self.airport_source.as_ref()?;

        match bounded(source.name(), self.source_timeout, source.fetch_airport(code)).await {
            Ok(Some(found)) => {
                let matches = found
                    .iata
                    .as_deref()
                    .map_or(true, |iata| iata.eq_ignore_ascii_case(code));
                if matches {
                    Some(found)
                } else {
                    debug!(code = code, found = ?found.iata, "Airport lookup returned a different airport");
                    None
                }
            }
            Ok(None) => {
                debug!(code = code, "Airport not found");
                None
            }
            Err(failure) => {
                warn!(code = code, error = %failure, "Airport lookup failed");
                None
            }
        }
    }

    /// Fill in airport coordinates the flight sources did not provide.
    ///
    /// Both airports are resolved concurrently. Existing fields are kept.
    async fn complete_airports(&self, fragment: &mut FlightFragment) {
        if self.airport_source.is_none() {
            return;
        }

        let departure_code = fragment
            .from
            .clone()
            .filter(|_| airport_location(fragment.departure_airport.as_ref()).is_none());
        let arrival_code = fragment
            .to
            .clone()
            .filter(|_| airport_location(fragment.arrival_airport.as_ref()).is_none());

        if departure_code.is_none() && arrival_code.is_none() {
            return;
        }

        let (departure, arrival) = tokio::join!(
            self.lookup_airport(departure_code.as_deref()),
            self.lookup_airport(arrival_code.as_deref())
        );

        for (slot, found) in [
            (&mut fragment.departure_airport, departure),
            (&mut fragment.arrival_airport, arrival),
        ] {
            if let Some(found) = found {
                match slot {
                    Some(current) => current.fill_from(found),
                    None => *slot = Some(found),
                }
            }
        }
    }

    /// Resolve one flight into a canonical record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDataFound`] if every source failed or came back
    /// empty, or if the merged data lacks the airport codes.
    pub async fn aggregate_flight(&self, flight_number: &str) -> Result<Flight> {
        let fragments = self.gather(flight_number).await;
        if fragments.is_empty() {
            debug!(flight = flight_number, "No source produced data");
            return Err(Error::no_data_found(flight_number));
        }

        debug!(
            flight = flight_number,
            fragments = fragments.len(),
            "Merging source fragments"
        );
        let mut merged = merge_fragments(fragments);
        self.complete_airports(&mut merged).await;
        build_flight(merged, flight_number)
    }

    /// List flights between two airports.
    ///
    /// Returns `Ok(None)` when no route-capable source is configured. Entries
    /// without a flight number are skipped. Both airports are resolved once
    /// and shared by every entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] if the route source fails.
    pub async fn aggregate_route(&self, from: &str, to: &str) -> Result<Option<Vec<Flight>>> {
        let Some(source) = &self.route_source else {
            return Ok(None);
        };

        let fragments = bounded(
            source.name(),
            self.source_timeout,
            source.fetch_route(from, to),
        )
        .await?;

        let (departure, arrival) = if fragments.is_empty() {
            (None, None)
        } else {
            tokio::join!(self.lookup_airport(Some(from)), self.lookup_airport(Some(to)))
        };

        let flights = fragments
            .into_iter()
            .filter_map(|mut fragment| {
                let key = fragment.flight_number.clone()?;
                fragment.fill_from(FlightFragment {
                    departure_airport: departure.clone(),
                    arrival_airport: arrival.clone(),
                    ..FlightFragment::default()
                });
                build_flight(fragment, &key).ok()
            })
            .collect();

        Ok(Some(flights))
    }

    /// Look up a single airport.
    ///
    /// # Errors
    ///
    /// - [`Error::Unsupported`] if no airport source is configured
    /// - [`Error::Source`] if the source fails
    /// - [`Error::NoDataFound`] if the airport is unknown
    pub async fn aggregate_airport(&self, query: &str) -> Result<Airport> {
        let Some(source) = &self.airport_source else {
            return Err(Error::unsupported("airport lookup"));
        };

        bounded(source.name(), self.source_timeout, source.fetch_airport(query))
            .await?
            .and_then(AirportFragment::into_airport)
            .ok_or_else(|| Error::no_data_found(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Aircraft, Airline, Position};
    use crate::sources::testing::{
        StaticAirportSource, StaticFlightSource, StaticRouteSource,
    };

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn krk() -> AirportFragment {
        AirportFragment {
            iata: Some("KRK".to_string()),
            name: Some("Kraków".to_string()),
            location: Some(coord(50.0777, 19.7848)),
            ..AirportFragment::default()
        }
    }

    fn stn() -> AirportFragment {
        AirportFragment {
            iata: Some("STN".to_string()),
            location: Some(coord(51.885, 0.235)),
            ..AirportFragment::default()
        }
    }

    fn schedule_fragment() -> FlightFragment {
        FlightFragment {
            flight_number: Some("FR8123".to_string()),
            airline: Some(Airline::named("Ryanair")),
            from: Some("KRK".to_string()),
            to: Some("STN".to_string()),
            departure_time: Some("09:40".to_string()),
            arrival_time: Some("11:20".to_string()),
            status: Some(FlightStatus::OnTime),
            gate: Some("B7".to_string()),
            ..FlightFragment::default()
        }
    }

    fn live_fragment() -> FlightFragment {
        FlightFragment {
            status: Some(FlightStatus::Delayed),
            delay_minutes: Some(25),
            location: Some(Position::at(coord(51.0, 10.0))),
            aircraft: Some(Aircraft {
                model: Some("Boeing 737-800".to_string()),
                registration: None,
            }),
            ..FlightFragment::default()
        }
    }

    fn aggregator(sources: Vec<StaticFlightSource>) -> Aggregator {
        sources
            .into_iter()
            .fold(Aggregator::new(TIMEOUT), |agg, source| {
                agg.with_flight_source(Arc::new(source))
            })
    }

    #[test]
    fn test_merge_precedence() {
        let merged = merge_fragments([live_fragment(), schedule_fragment()]);

        assert_eq!(merged.status, Some(FlightStatus::Delayed));
        assert_eq!(merged.delay_minutes, Some(25));
        assert_eq!(merged.gate.as_deref(), Some("B7"));
        assert_eq!(merged.flight_number.as_deref(), Some("FR8123"));
    }

    #[test]
    fn test_merge_reverse_order() {
        let merged = merge_fragments([schedule_fragment(), live_fragment()]);
        assert_eq!(merged.status, Some(FlightStatus::OnTime));
        assert_eq!(merged.delay_minutes, Some(25));
    }

    #[test]
    fn test_build_drops_delay_unless_delayed() {
        let merged = merge_fragments([schedule_fragment(), live_fragment()]);
        let flight = build_flight(merged, "FR8123").unwrap();
        assert_eq!(flight.status, Some(FlightStatus::OnTime));
        assert_eq!(flight.delay_minutes, None);

        let json = serde_json::to_string(&flight).unwrap();
        assert!(!json.contains("delayMinutes"));

        let merged = merge_fragments([live_fragment(), schedule_fragment()]);
        let flight = build_flight(merged, "FR8123").unwrap();
        assert_eq!(flight.delay_minutes, Some(25));
    }

    #[test]
    fn test_merge_nothing() {
        assert!(merge_fragments(Vec::new()).is_empty());
    }

    #[test]
    fn test_build_requires_airport_codes() {
        let fragment = FlightFragment {
            to: None,
            ..schedule_fragment()
        };
        let err = build_flight(fragment, "FR8123").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_build_computes_duration() {
        let flight = build_flight(schedule_fragment(), "FR8123").unwrap();
        assert_eq!(flight.duration_minutes, Some(100));

        let overnight = FlightFragment {
            departure_time: Some("23:30".to_string()),
            arrival_time: Some("01:00".to_string()),
            ..schedule_fragment()
        };
        let flight = build_flight(overnight, "FR8123").unwrap();
        assert_eq!(flight.duration_minutes, Some(90));
    }

    #[test]
    fn test_build_skips_duration_without_both_times() {
        let fragment = FlightFragment {
            arrival_time: None,
            ..schedule_fragment()
        };
        let flight = build_flight(fragment, "FR8123").unwrap();
        assert!(flight.duration_minutes.is_none());
    }

    #[test]
    fn test_build_uses_query_key_as_flight_number() {
        let fragment = FlightFragment {
            flight_number: None,
            ..schedule_fragment()
        };
        let flight = build_flight(fragment, "FR8123").unwrap();
        assert_eq!(flight.flight_number, "FR8123");
    }

    #[test]
    fn test_build_progress_needs_location() {
        let fragment = FlightFragment {
            departure_airport: Some(krk()),
            arrival_airport: Some(stn()),
            ..schedule_fragment()
        };
        let flight = build_flight(fragment, "FR8123").unwrap();

        assert!(flight.progress.is_none());
        assert!(flight.distance_to_arrival_km.is_none());
        let route = flight.route_distance_km.unwrap();
        assert!((1300.0..1450.0).contains(&route), "route was {route}");
        assert_eq!(flight.display_position(), Some(coord(51.885, 0.235)));
    }

    #[test]
    fn test_build_derived_metrics_with_location() {
        let fragment = FlightFragment {
            location: Some(Position::at(coord(51.0, 10.0))),
            departure_airport: Some(krk()),
            arrival_airport: Some(stn()),
            ..schedule_fragment()
        };
        let flight = build_flight(fragment, "FR8123").unwrap();

        let progress = flight.progress.unwrap();
        assert!((0.0..=100.0).contains(&progress));
        assert!(progress > 30.0 && progress < 70.0, "progress was {progress}");
        let remaining = flight.distance_to_arrival_km.unwrap();
        assert!(remaining < flight.route_distance_km.unwrap());
    }

    #[test]
    fn test_build_fills_airport_code() {
        let fragment = FlightFragment {
            departure_airport: Some(AirportFragment {
                location: Some(coord(50.0777, 19.7848)),
                ..AirportFragment::default()
            }),
            ..schedule_fragment()
        };
        let flight = build_flight(fragment, "FR8123").unwrap();
        assert_eq!(flight.departure_airport.unwrap().iata, "KRK");
    }

    #[tokio::test]
    async fn test_aggregate_merges_in_precedence_order() {
        let agg = aggregator(vec![
            StaticFlightSource::found("live", live_fragment()),
            StaticFlightSource::found("schedule", schedule_fragment()),
        ]);

        let flight = agg.aggregate_flight("FR8123").await.unwrap();

        assert_eq!(flight.status, Some(FlightStatus::Delayed));
        assert_eq!(flight.effective_delay_minutes(), 25);
        assert_eq!(flight.gate.as_deref(), Some("B7"));
        assert_eq!(flight.from, "KRK");
    }

    #[tokio::test]
    async fn test_aggregate_order_independent_of_completion() {
        let agg = aggregator(vec![
            StaticFlightSource::found("live", live_fragment()).delayed(Duration::from_millis(30)),
            StaticFlightSource::found("schedule", schedule_fragment()),
        ]);

        let flight = agg.aggregate_flight("FR8123").await.unwrap();
        assert_eq!(flight.status, Some(FlightStatus::Delayed));
    }

    #[tokio::test]
    async fn test_aggregate_tolerates_partial_failure() {
        crate::logging::init_test_logging();
        let agg = aggregator(vec![
            StaticFlightSource::failing("live", FailureCause::Status(503)),
            StaticFlightSource::found("schedule", schedule_fragment()),
        ]);

        let flight = agg.aggregate_flight("FR8123").await.unwrap();

        assert_eq!(flight.status, Some(FlightStatus::OnTime));
        assert!(flight.location.is_none());
        assert!(flight.progress.is_none());
    }

    #[tokio::test]
    async fn test_aggregate_all_failed_is_no_data() {
        let agg = aggregator(vec![
            StaticFlightSource::failing("live", FailureCause::Network("down".to_string())),
            StaticFlightSource::empty("schedule"),
        ]);

        let err = agg.aggregate_flight("FR8123").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_aggregate_without_sources_is_no_data() {
        let err = Aggregator::new(TIMEOUT)
            .aggregate_flight("FR8123")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out() {
        let slow = StaticFlightSource::found("live", live_fragment())
            .delayed(Duration::from_secs(60));
        let agg = Aggregator::new(Duration::from_secs(1))
            .with_flight_source(Arc::new(slow))
            .with_flight_source(Arc::new(StaticFlightSource::found(
                "schedule",
                schedule_fragment(),
            )));

        let flight = agg.aggregate_flight("FR8123").await.unwrap();

        assert_eq!(flight.status, Some(FlightStatus::OnTime));
        assert!(flight.location.is_none());
    }

    #[tokio::test]
    async fn test_bounded_reports_timeout() {
        let result: SourceResult<()> = bounded("slow", Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        let failure = result.unwrap_err();
        assert!(failure.is_timeout());
        assert_eq!(failure.source_name, "slow");
    }

    #[tokio::test]
    async fn test_aggregate_resolves_missing_airports() {
        let airports = Arc::new(StaticAirportSource::default().with("KRK", krk()).with("STN", stn()));
        let agg = aggregator(vec![StaticFlightSource::found("live", FlightFragment {
            location: Some(Position::at(coord(51.0, 10.0))),
            ..schedule_fragment()
        })])
        .with_airport_source(airports.clone());

        let flight = agg.aggregate_flight("FR8123").await.unwrap();

        assert_eq!(airports.call_count(), 2);
        assert_eq!(flight.departure_airport.unwrap().name.as_deref(), Some("Kraków"));
        assert!(flight.progress.is_some());
        assert!(flight.route_distance_km.is_some());
    }

    #[tokio::test]
    async fn test_aggregate_skips_known_airports() {
        let airports = Arc::new(StaticAirportSource::default().with("STN", stn()));
        let agg = aggregator(vec![StaticFlightSource::found("live", FlightFragment {
            departure_airport: Some(krk()),
            ..schedule_fragment()
        })])
        .with_airport_source(airports.clone());

        let flight = agg.aggregate_flight("FR8123").await.unwrap();

        assert_eq!(airports.call_count(), 1);
        assert!(flight.route_distance_km.is_some());
    }

    #[tokio::test]
    async fn test_airport_failure_only_omits_derived_fields() {
        let airports = Arc::new(
            StaticAirportSource::default()
                .with("KRK", krk())
                .failing_for("STN", FailureCause::Status(500)),
        );
        let agg = aggregator(vec![StaticFlightSource::found("schedule", schedule_fragment())])
            .with_airport_source(airports);

        let flight = agg.aggregate_flight("FR8123").await.unwrap();

        assert!(flight.departure_airport.is_some());
        assert!(flight.arrival_airport.is_none());
        assert!(flight.route_distance_km.is_none());
        assert_eq!(flight.gate.as_deref(), Some("B7"));
    }

    #[tokio::test]
    async fn test_mismatched_airport_is_ignored() {
        let airports = Arc::new(StaticAirportSource::default().with("STN", krk()));
        let agg = aggregator(vec![StaticFlightSource::found("schedule", schedule_fragment())])
            .with_airport_source(airports);

        let flight = agg.aggregate_flight("FR8123").await.unwrap();
        assert!(flight.arrival_airport.is_none());
    }

    #[tokio::test]
    async fn test_route_without_source() {
        let agg = Aggregator::new(TIMEOUT);
        assert!(agg.aggregate_route("KRK", "STN").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_route_lists_flights() {
        let unnamed = FlightFragment {
            flight_number: None,
            ..schedule_fragment()
        };
        let agg = Aggregator::new(TIMEOUT)
            .with_route_source(Arc::new(StaticRouteSource {
                result: Ok(vec![schedule_fragment(), unnamed]),
            }))
            .with_airport_source(Arc::new(
                StaticAirportSource::default().with("KRK", krk()).with("STN", stn()),
            ));

        let flights = agg.aggregate_route("KRK", "STN").await.unwrap().unwrap();

        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].flight_number, "FR8123");
        assert!(flights[0].route_distance_km.is_some());
    }

    #[tokio::test]
    async fn test_route_failure_is_surfaced() {
        let agg = Aggregator::new(TIMEOUT).with_route_source(Arc::new(StaticRouteSource {
            result: Err(SourceFailure::new("static-routes", FailureCause::Status(500))),
        }));

        let err = agg.aggregate_route("KRK", "STN").await.unwrap_err();
        assert!(matches!(err, Error::Source(_)));
    }

    #[tokio::test]
    async fn test_airport_lookup_outcomes() {
        let agg = Aggregator::new(TIMEOUT).with_airport_source(Arc::new(
            StaticAirportSource::default()
                .with("KRK", krk())
                .failing_for("LHR", FailureCause::Status(502)),
        ));

        assert_eq!(agg.aggregate_airport("KRK").await.unwrap().iata, "KRK");
        assert!(agg.aggregate_airport("QQQ").await.unwrap_err().is_not_found());
        assert!(matches!(
            agg.aggregate_airport("LHR").await.unwrap_err(),
            Error::Source(_)
        ));
    }

    #[tokio::test]
    async fn test_airport_lookup_unsupported() {
        let err = Aggregator::new(TIMEOUT)
            .aggregate_airport("KRK")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }

    #[test]
    fn test_debug_lists_sources() {
        let agg = aggregator(vec![StaticFlightSource::empty("live")]);
        let debug = format!("{agg:?}");
        assert!(debug.contains("live"));
    }
}
