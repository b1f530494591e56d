//! Component G — Observation Evaluator.
//!
//! Classifies one observation against the ground truth injected into each USS. Pure
//! classification logic lives here as free functions over plain data; the only side effect
//! is appending to the `&mut Findings` sink (§5 — no interior mutability needed, the
//! dataflow is single-threaded per evaluation instant).

use chrono::{DateTime, Utc};

use crate::config::{EvaluationConfiguration, RidVersion};
use crate::findings::Findings;
use crate::geometry::{GeoMath, LatLngRect};
use crate::injected::InjectedFlight;
use crate::observer::GetDisplayDataResponse;
use crate::query::Query;

/// Mutually exclusive temporal-visibility classification for one injected flight at the
/// instant a query was initiated (§4.G.ii). `WithinGrace` is an explicit no-op hook rather
/// than an implicit fallthrough, per the open question in §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Premature,
    Lingering,
    MustBeVisible,
    WithinGrace,
}

fn classify_visibility(
    t_min: DateTime<Utc>,
    t_max: DateTime<Utc>,
    t_initiated: DateTime<Utc>,
    t_response: DateTime<Utc>,
    realtime_period: chrono::Duration,
    max_propagation_latency: chrono::Duration,
) -> Visibility {
    if t_response < t_min {
        return Visibility::Premature;
    }
    if t_response > t_max + realtime_period + max_propagation_latency {
        return Visibility::Lingering;
    }
    if t_min + max_propagation_latency < t_initiated && t_initiated < t_max + realtime_period {
        return Visibility::MustBeVisible;
    }
    Visibility::WithinGrace
}

fn telemetry_window(flight: &InjectedFlight) -> (DateTime<Utc>, DateTime<Utc>) {
    let mut t_min = None;
    let mut t_max = None;
    for sample in &flight.flight.telemetry {
        t_min = Some(t_min.map_or(sample.timestamp, |m: DateTime<Utc>| m.min(sample.timestamp)));
        t_max = Some(t_max.map_or(sample.timestamp, |m: DateTime<Utc>| m.max(sample.timestamp)));
    }
    (
        t_min.expect("an injected flight always has at least one telemetry sample"),
        t_max.expect("an injected flight always has at least one telemetry sample"),
    )
}

/// Entry point: routes one observation to area-too-large, cluster, or normal evaluation
/// by the query rectangle's diagonal (§4.G).
#[allow(clippy::too_many_arguments)]
pub fn evaluate_observation(
    observer_name: &str,
    injected_flights: &[InjectedFlight],
    observation: Option<&GetDisplayDataResponse>,
    query: &Query,
    rect: LatLngRect,
    rid_version: &RidVersion,
    eval_config: &EvaluationConfiguration,
    geo_math: &dyn GeoMath,
    findings: &mut Findings,
) {
    let diagonal_km = rect.diagonal_km(geo_math);

    if diagonal_km > rid_version.max_diagonal_km {
        evaluate_area_too_large(observer_name, diagonal_km, query, findings);
        return;
    }

    if diagonal_km > rid_version.max_details_diagonal_km {
        // Cluster-size policy evaluation is out of scope (§1 non-goals); routed here but
        // intentionally a no-op.
        return;
    }

    evaluate_normal(
        observer_name,
        injected_flights,
        observation,
        query,
        rect,
        rid_version.realtime_period,
        eval_config.max_propagation_latency,
        findings,
    );
}

fn evaluate_area_too_large(
    observer_name: &str,
    diagonal_km: f64,
    query: &Query,
    findings: &mut Findings,
) {
    if query.status_code() != 413 {
        findings.add_area_too_large_not_indicated(observer_name, diagonal_km, query.clone());
    }
}

#[allow(clippy::too_many_arguments)]
fn evaluate_normal(
    observer_name: &str,
    injected_flights: &[InjectedFlight],
    observation: Option<&GetDisplayDataResponse>,
    query: &Query,
    rect: LatLngRect,
    realtime_period: chrono::Duration,
    max_propagation_latency: chrono::Duration,
    findings: &mut Findings,
) {
    let Some(observation) = observation else {
        findings.add_observation_failure(observer_name, query.clone());
        return;
    };

    let t_initiated = query.request.timestamp;
    let t_response = query.response.reported;

    for flight in injected_flights {
        let Some(flight_id) = flight.flight_id() else {
            continue;
        };
        let (t_min, t_max) = telemetry_window(flight);
        let matching: Vec<_> = observation
            .flights
            .iter()
            .filter(|observed| observed.id == flight_id)
            .collect();

        if matching.len() > 1 {
            findings.add_duplicate_flights(
                observer_name,
                flight_id,
                matching.len(),
                &flight.uss_name,
                query.clone(),
            );
        }

        match classify_visibility(
            t_min,
            t_max,
            t_initiated,
            t_response,
            realtime_period,
            max_propagation_latency,
        ) {
            Visibility::Premature => {
                if !matching.is_empty() {
                    findings.add_premature_flight(
                        observer_name,
                        flight_id,
                        t_min,
                        t_response,
                        &flight.uss_name,
                        query.clone(),
                    );
                }
            }
            Visibility::Lingering => {
                if !matching.is_empty() {
                    findings.add_lingering_flight(
                        observer_name,
                        flight_id,
                        t_max,
                        t_initiated,
                        &flight.uss_name,
                        query.clone(),
                    );
                }
            }
            Visibility::MustBeVisible => {
                if matching.is_empty() {
                    findings.add_missing_flight(
                        observer_name,
                        flight_id,
                        rect,
                        &flight.uss_name,
                        query.clone(),
                    );
                }
            }
            Visibility::WithinGrace => {}
        }

        // Position/altitude/details comparison against `matching` is deferred (§1
        // non-goals); explicit no-op hook.
    }
}
