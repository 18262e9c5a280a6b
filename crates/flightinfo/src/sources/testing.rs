//! Test doubles for sources and the HTTP client.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{
    AirportSource, FailureCause, FlightSource, HttpClient, HttpResponse, RouteSource,
    SourceFailure, SourceResult,
};
use crate::model::{AirportFragment, FlightFragment};

/// Mock HTTP client returning a canned response.
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    pub response: Result<HttpResponse, FailureCause>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl MockHttpClient {
    pub fn ok(status: u16, body: &str) -> Self {
        Self {
            response: Ok(HttpResponse::new(status, body)),
            seen: Arc::default(),
        }
    }

    pub fn failing(cause: FailureCause) -> Self {
        Self {
            response: Err(cause),
            seen: Arc::default(),
        }
    }

    /// Requested URLs with their query strings, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl HttpClient for MockHttpClient {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        _headers: &[(&str, &str)],
    ) -> Result<HttpResponse, FailureCause> {
        let mut full = url.to_string();
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            full.push('?');
            full.push_str(&pairs.join("&"));
        }
        self.seen.lock().unwrap().push(full);
        self.response.clone()
    }
}

/// Flight source that always returns the same outcome.
#[derive(Debug, Clone)]
pub struct StaticFlightSource {
    name: &'static str,
    result: SourceResult<Option<FlightFragment>>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StaticFlightSource {
    pub fn found(name: &'static str, fragment: FlightFragment) -> Self {
        Self::with_result(name, Ok(Some(fragment)))
    }

    pub fn empty(name: &'static str) -> Self {
        Self::with_result(name, Ok(None))
    }

    pub fn failing(name: &'static str, cause: FailureCause) -> Self {
        Self::with_result(name, Err(SourceFailure::new(name, cause)))
    }

    fn with_result(name: &'static str, result: SourceResult<Option<FlightFragment>>) -> Self {
        Self {
            name,
            result,
            delay: None,
            calls: Arc::default(),
        }
    }

    /// Sleep for `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FlightSource for StaticFlightSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_flight(&self, _flight_number: &str) -> SourceResult<Option<FlightFragment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

/// Flight source whose answers are released one by one by the test.
///
/// Each call takes the next queued fragment and waits for its gate.
#[derive(Debug, Default)]
pub struct GatedFlightSource {
    queue: Mutex<VecDeque<(oneshot::Receiver<()>, FlightFragment)>>,
}

impl GatedFlightSource {
    /// Queue an answer; the returned sender releases it.
    pub fn push(&self, fragment: FlightFragment) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.queue.lock().unwrap().push_back((rx, fragment));
        tx
    }
}

#[async_trait]
impl FlightSource for GatedFlightSource {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn fetch_flight(&self, _flight_number: &str) -> SourceResult<Option<FlightFragment>> {
        let next = self.queue.lock().unwrap().pop_front();
        let Some((gate, fragment)) = next else {
            return Ok(None);
        };
        let _ = gate.await;
        Ok(Some(fragment))
    }
}

/// Airport source answering from a fixed table keyed by upper-cased query.
#[derive(Debug, Default)]
pub struct StaticAirportSource {
    table: HashMap<String, SourceResult<Option<AirportFragment>>>,
    calls: AtomicUsize,
}

impl StaticAirportSource {
    pub fn with(mut self, query: &str, fragment: AirportFragment) -> Self {
        self.table.insert(query.to_uppercase(), Ok(Some(fragment)));
        self
    }

    pub fn failing_for(mut self, query: &str, cause: FailureCause) -> Self {
        self.table.insert(
            query.to_uppercase(),
            Err(SourceFailure::new("static-airports", cause)),
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AirportSource for StaticAirportSource {
    fn name(&self) -> &'static str {
        "static-airports"
    }

    async fn fetch_airport(&self, query: &str) -> SourceResult<Option<AirportFragment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .get(&query.to_uppercase())
            .cloned()
            .unwrap_or(Ok(None))
    }
}

/// Route source returning a fixed list.
#[derive(Debug)]
pub struct StaticRouteSource {
    pub result: SourceResult<Vec<FlightFragment>>,
}

#[async_trait]
impl RouteSource for StaticRouteSource {
    fn name(&self) -> &'static str {
        "static-routes"
    }

    async fn fetch_route(&self, _from: &str, _to: &str) -> SourceResult<Vec<FlightFragment>> {
        self.result.clone()
    }
}
