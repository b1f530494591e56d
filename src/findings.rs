//! The `Findings` sink — a mutable, append-only record of every conformance discrepancy
//! and every HTTP exchange observed during a run. Owned exclusively by the driver (the
//! CLI's `evaluate` subcommand) and passed by `&mut` to the evaluator and injection
//! client; see §5 for why no interior mutability is needed here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::geometry::LatLngRect;
use crate::query::Query;

/// One conformance discrepancy. Findings are not errors: the run continues and still
/// yields a report (§7).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    ObservationFailure {
        observer: String,
        query: Query,
    },
    DuplicateFlights {
        observer: String,
        flight_id: String,
        count: usize,
        uss: String,
        query: Query,
    },
    PrematureFlight {
        observer: String,
        flight_id: String,
        t_min: DateTime<Utc>,
        t_response: DateTime<Utc>,
        uss: String,
        query: Query,
    },
    LingeringFlight {
        observer: String,
        flight_id: String,
        t_max: DateTime<Utc>,
        t_initiated: DateTime<Utc>,
        uss: String,
        query: Query,
    },
    MissingFlight {
        observer: String,
        flight_id: String,
        rect: LatLngRect,
        uss: String,
        query: Query,
    },
    AreaTooLargeNotIndicated {
        observer: String,
        diagonal_km: f64,
        query: Query,
    },
}

/// Append-only sink for [`Query`] evidence and [`Finding`]s across a whole run.
#[derive(Debug, Default, Serialize)]
pub struct Findings {
    pub queries: Vec<Query>,
    pub issues: Vec<Finding>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observation_query(&mut self, query: Query) {
        self.queries.push(query);
    }

    pub fn add_observation_failure(&mut self, observer: &str, query: Query) {
        warn!(observer, "observation failure");
        self.issues.push(Finding::ObservationFailure {
            observer: observer.to_string(),
            query,
        });
    }

    pub fn add_duplicate_flights(
        &mut self,
        observer: &str,
        flight_id: &str,
        count: usize,
        uss: &str,
        query: Query,
    ) {
        warn!(observer, flight_id, count, uss, "duplicate flights observed");
        self.issues.push(Finding::DuplicateFlights {
            observer: observer.to_string(),
            flight_id: flight_id.to_string(),
            count,
            uss: uss.to_string(),
            query,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_premature_flight(
        &mut self,
        observer: &str,
        flight_id: &str,
        t_min: DateTime<Utc>,
        t_response: DateTime<Utc>,
        uss: &str,
        query: Query,
    ) {
        warn!(observer, flight_id, uss, %t_min, %t_response, "premature flight");
        self.issues.push(Finding::PrematureFlight {
            observer: observer.to_string(),
            flight_id: flight_id.to_string(),
            t_min,
            t_response,
            uss: uss.to_string(),
            query,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_lingering_flight(
        &mut self,
        observer: &str,
        flight_id: &str,
        t_max: DateTime<Utc>,
        t_initiated: DateTime<Utc>,
        uss: &str,
        query: Query,
    ) {
        warn!(observer, flight_id, uss, %t_max, %t_initiated, "lingering flight");
        self.issues.push(Finding::LingeringFlight {
            observer: observer.to_string(),
            flight_id: flight_id.to_string(),
            t_max,
            t_initiated,
            uss: uss.to_string(),
            query,
        });
    }

    pub fn add_missing_flight(
        &mut self,
        observer: &str,
        flight_id: &str,
        rect: LatLngRect,
        uss: &str,
        query: Query,
    ) {
        warn!(observer, flight_id, uss, "missing flight");
        self.issues.push(Finding::MissingFlight {
            observer: observer.to_string(),
            flight_id: flight_id.to_string(),
            rect,
            uss: uss.to_string(),
            query,
        });
    }

    pub fn add_area_too_large_not_indicated(
        &mut self,
        observer: &str,
        diagonal_km: f64,
        query: Query,
    ) {
        warn!(observer, diagonal_km, "area too large not indicated with 413");
        self.issues.push(Finding::AreaTooLargeNotIndicated {
            observer: observer.to_string(),
            diagonal_km,
            query,
        });
    }
}
