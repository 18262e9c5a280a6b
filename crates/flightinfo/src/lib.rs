//! `flightinfo` - Flight status lookup across several data sources
//!
//! This library queries heterogeneous flight data sources concurrently,
//! merges their partial answers into one canonical flight record, and
//! computes the navigation figures none of them provide (great-circle
//! distances, block time across midnight, route progress).

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod logging;
pub mod model;
pub mod navmath;
pub mod service;
pub mod sources;

pub use aggregator::Aggregator;
pub use config::Config;
pub use error::{Error, Result};
pub use guard::{QueryBoard, QueryTicket};
pub use logging::init_logging;
pub use model::{Aircraft, Airline, Airport, Flight, FlightStatus, Position};
pub use navmath::Coordinate;
pub use service::{FlightService, QueryOutcome, RouteResult};
