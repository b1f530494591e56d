//! Component E — Query-Rectangle Planner.
//!
//! Computes the lat/lng bounding rectangle to query at a given instant, given the ground
//! truth telemetry the evaluator is comparing against. Pure and deterministic for a fixed
//! `now` (testable property 7).

use chrono::{DateTime, Utc};

use crate::config::{EvaluationConfiguration, RidVersion};
use crate::error::{HarnessError, Result};
use crate::geometry::{GeoMath, LatLng, LatLngRect};
use crate::injected::InjectedFlight;

const OVERSHOOT: f64 = 1.01;
const MAX_ITERATIONS: u32 = 64;

/// Compute the query rectangle for `now`, expanding it until its diagonal meets
/// `eval_config.min_query_diagonal` (§4.E). Distinct names are used for the outer instant
/// (`now`) and each telemetry sample's timestamp to avoid the variable shadowing the
/// distilled spec's source exhibited (§9).
pub fn compute_query_rect(
    now: DateTime<Utc>,
    injected_flights: &[InjectedFlight],
    rid_version: &RidVersion,
    eval_config: &EvaluationConfiguration,
    geo_math: &dyn GeoMath,
) -> Result<LatLngRect> {
    let t_min = now - rid_version.realtime_period - eval_config.max_propagation_latency;
    let t_max = now;

    let mut lat_min = 90.0_f64;
    let mut lat_max = -90.0_f64;
    let mut lng_min = 360.0_f64;
    let mut lng_max = -360.0_f64;
    let mut data_exists = false;

    for flight in injected_flights {
        for sample in &flight.flight.telemetry {
            let sample_time = sample.timestamp;
            if sample_time >= t_min && sample_time <= t_max {
                data_exists = true;
                lat_min = lat_min.min(sample.position.lat);
                lat_max = lat_max.max(sample.position.lat);
                lng_min = lng_min.min(sample.position.lng);
                lng_max = lng_max.max(sample.position.lng);
            }
        }
    }

    if !data_exists {
        let mut lat_sum = 0.0_f64;
        let mut lng_sum = 0.0_f64;
        let mut count = 0u32;
        for flight in injected_flights {
            for sample in &flight.flight.telemetry {
                lat_sum += sample.position.lat;
                lng_sum += sample.position.lng;
                count += 1;
            }
        }
        if count == 0 {
            return Err(HarnessError::DegenerateGeometry { iterations: 0 });
        }
        lat_min = lat_sum / count as f64;
        lat_max = lat_min;
        lng_min = lng_sum / count as f64;
        lng_max = lng_min;
    }

    for _ in 0..MAX_ITERATIONS {
        let lo = LatLng::new(lat_min, lng_min);
        let hi = LatLng::new(lat_max, lng_max);
        let diagonal_m = geo_math.great_circle_distance_m(lo, hi);

        if diagonal_m >= eval_config.min_query_diagonal {
            return Ok(LatLngRect::new(lo, hi));
        }

        if lat_min == lat_max && lng_min == lng_max {
            lat_min -= 1e-5;
            lat_max += 1e-5;
            lng_min -= 1e-5;
            lng_max += 1e-5;
            continue;
        }

        let lat_center = 0.5 * (lat_min + lat_max);
        let lat_span =
            (lat_max - lat_min) * eval_config.min_query_diagonal / diagonal_m * OVERSHOOT;
        lat_min = lat_center - 0.5 * lat_span;
        lat_max = lat_center + 0.5 * lat_span;

        let lng_center = 0.5 * (lng_min + lng_max);
        let lng_span =
            (lng_max - lng_min) * eval_config.min_query_diagonal / diagonal_m * OVERSHOOT;
        lng_min = lng_center - 0.5 * lng_span;
        lng_max = lng_center + 0.5 * lng_span;
    }

    Err(HarnessError::DegenerateGeometry {
        iterations: MAX_ITERATIONS,
    })
}
