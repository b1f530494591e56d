//! Component C — Payload Builder.
//!
//! Assembles one [`DeliverablePayload`] per USS: selects that USS's allocated track,
//! rewrites its timeline (Component B), and wraps it with fresh `test_id`/`injection_id`
//! identifiers. Exactly one flight is allocated to each USS, matching the configuration's
//! one-track-per-USS assignment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{RidQualifierTestConfiguration, UssAssignment};
use crate::error::{HarnessError, Result};
use crate::rewrite::rewrite_timeline;
use crate::track::{FullFlightRecord, OperatorLocation, TelemetrySample};

/// The RID flight-details payload reported for an injected flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidFlightDetails {
    pub id: String,
    pub operator_id: String,
    pub operator_location: OperatorLocation,
    pub operation_description: String,
    pub serial_number: String,
    pub registration_number: String,
}

/// A details response, effective from a given instant onward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestFlightDetails {
    pub effective_after: DateTime<Utc>,
    pub details: RidFlightDetails,
}

impl TestFlightDetails {
    /// Which details response applies "now". The source picks `details_responses[0]`
    /// unconditionally (a marked TODO); this is the policy hook that preserves that
    /// behavior without baking `[0]` into every call site (§9).
    pub fn primary(details_responses: &[TestFlightDetails]) -> Option<&TestFlightDetails> {
        details_responses.first()
    }
}

/// One flight's rewritten telemetry plus its details responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestFlight {
    pub injection_id: Uuid,
    pub telemetry: Vec<TelemetrySample>,
    pub details_responses: Vec<TestFlightDetails>,
}

/// One injection envelope for one USS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPayload {
    pub test_id: Uuid,
    pub requested_flights: Vec<TestFlight>,
}

/// The body of the `PUT /tests/{test_id}` request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTestParameters<'a> {
    pub requested_flights: &'a [TestFlight],
}

/// A payload ready to be delivered: where to PUT it, and what to PUT.
#[derive(Debug, Clone)]
pub struct DeliverablePayload {
    pub uss: UssAssignment,
    pub injection_path: String,
    pub injection_payload: TestPayload,
}

/// Build one [`DeliverablePayload`] per configured USS.
pub fn build_test_payloads(
    config: &RidQualifierTestConfiguration,
    tracks: &[FullFlightRecord],
) -> Result<Vec<DeliverablePayload>> {
    config
        .usses
        .iter()
        .map(|uss| build_one_payload(config, uss, tracks))
        .collect()
}

fn build_one_payload(
    config: &RidQualifierTestConfiguration,
    uss: &UssAssignment,
    tracks: &[FullFlightRecord],
) -> Result<DeliverablePayload> {
    let track = tracks
        .get(uss.allocated_flight_track_number)
        .ok_or_else(|| HarnessError::InvalidTrackAllocation {
            uss: uss.name.clone(),
            index: uss.allocated_flight_track_number,
            available: tracks.len(),
        })?;

    let (rewritten, anchor) = rewrite_timeline(track, config.now, config.test_start_time);

    let flight_id = rewritten.flight_telemetry.id.clone();
    let rid_details = RidFlightDetails {
        id: flight_id,
        operator_id: rewritten.operator_details.operator_id.clone(),
        operator_location: rewritten.operator_details.location,
        operation_description: rewritten.flight_details.operation_description.clone(),
        serial_number: rewritten.flight_details.serial_number.clone(),
        registration_number: rewritten.operator_details.registration_number.clone(),
    };

    let test_flight = TestFlight {
        injection_id: Uuid::new_v4(),
        telemetry: rewritten.flight_telemetry.states,
        details_responses: vec![TestFlightDetails {
            effective_after: anchor,
            details: rid_details,
        }],
    };

    let test_id = Uuid::new_v4();

    Ok(DeliverablePayload {
        uss: uss.clone(),
        injection_path: format!("/tests/{test_id}"),
        injection_payload: TestPayload {
            test_id,
            requested_flights: vec![test_flight],
        },
    })
}
