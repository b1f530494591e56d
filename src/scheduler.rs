//! Component F — Polling Scheduler.
//!
//! Drives evaluation from now until `t_end` at the configured cadence, optionally reusing
//! the prior query rectangle. The sole timer in the evaluation phase: observers are
//! queried sequentially, in configuration order, to keep findings deterministically
//! ordered (§5).

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::{EvaluationConfiguration, RidVersion};
use crate::error::{HarnessError, Result};
use crate::evaluator::evaluate_observation;
use crate::findings::Findings;
use crate::geometry::{GeoMath, LatLngRect};
use crate::injected::InjectedFlight;
use crate::observer::RidSystemObserver;
use crate::rect::compute_query_rect;

/// One named observer under poll, paired with the USS it belongs to for reporting.
pub struct NamedObserver {
    pub name: String,
    pub observer: Box<dyn RidSystemObserver>,
}

fn compute_t_end(
    injected_flights: &[InjectedFlight],
    rid_version: &RidVersion,
    eval_config: &EvaluationConfiguration,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let latest_telemetry = injected_flights
        .iter()
        .flat_map(|flight| flight.flight.telemetry.iter())
        .map(|sample| sample.timestamp)
        .max()
        .unwrap_or(now);

    now.max(latest_telemetry) + rid_version.realtime_period + eval_config.max_propagation_latency
}

/// Run the polling loop to completion or cancellation. `now_fn` is `chrono::Utc::now` in
/// production; tests that need determinism construct explicit timestamps rather than
/// mocking the clock (§5).
#[allow(clippy::too_many_arguments)]
pub async fn run_polling_loop(
    injected_flights: &[InjectedFlight],
    observers: &[NamedObserver],
    rid_version: &RidVersion,
    eval_config: &EvaluationConfiguration,
    geo_math: &dyn GeoMath,
    cancelled: &AtomicBool,
    findings: &mut Findings,
) -> Result<()> {
    let now = Utc::now();
    let t_end = compute_t_end(injected_flights, rid_version, eval_config, now);
    if now > t_end {
        return Err(HarnessError::TestDataExpired { t_end, now });
    }

    let mut t_next = now;
    let mut query_counter: u64 = 0;
    let mut last_rect: Option<LatLngRect> = None;

    while Utc::now() < t_end {
        let now = Utc::now();

        let reuse = last_rect.is_some()
            && eval_config.repeat_query_rect_period > 0
            && query_counter % eval_config.repeat_query_rect_period as u64 == 0;

        let rect = if reuse {
            last_rect.expect("reuse branch only taken when last_rect is Some")
        } else {
            compute_query_rect(now, injected_flights, rid_version, eval_config, geo_math)?
        };
        last_rect = Some(rect);

        debug!(query_counter, ?t_next, "polling observers");

        for named in observers {
            let (observation, query) = named.observer.observe_system(rect).await;
            findings.add_observation_query(query.clone());
            evaluate_observation(
                &named.name,
                injected_flights,
                observation.as_ref(),
                &query,
                rect,
                rid_version,
                eval_config,
                geo_math,
                findings,
            );
        }

        while t_next < Utc::now() {
            t_next += eval_config.min_polling_interval;
        }
        if t_next > t_end {
            break;
        }

        let sleep_duration = (t_next - Utc::now()).to_std().unwrap_or_default();
        tokio::time::sleep(sleep_duration).await;

        query_counter += 1;

        if cancelled.load(Ordering::SeqCst) {
            break;
        }
    }

    Ok(())
}
