//! Component B — Timeline Rewriter.
//!
//! Pure transform: no I/O, no shared state. Given a disk-recorded track and a fresh wall
//! clock anchor, produces a new [`FullFlightRecord`] whose telemetry lands on the new
//! timeline, leaving the input untouched.

use chrono::{DateTime, Duration, Utc};

use crate::track::FullFlightRecord;

/// `test_start_time + 1 minute` — the instant the earliest injected sample must land on.
pub fn anchor(test_start_time: DateTime<Utc>) -> DateTime<Utc> {
    test_start_time + Duration::minutes(1)
}

/// Rewrite `record`'s telemetry onto the timeline anchored at `anchor(test_start_time)`,
/// and stamp the new `reference_time` the USS will see.
///
/// Returns the rewritten record together with the anchor, which callers need again to
/// compute `effective_after` for [`crate::payload::TestFlightDetails`].
pub fn rewrite_timeline(
    record: &FullFlightRecord,
    test_reference_time: DateTime<Utc>,
    test_start_time: DateTime<Utc>,
) -> (FullFlightRecord, DateTime<Utc>) {
    let anchor = anchor(test_start_time);
    let offset = anchor - record.reference_time;

    let mut rewritten = record.clone();
    for sample in &mut rewritten.flight_telemetry.states {
        sample.timestamp += offset;
    }
    rewritten.reference_time = test_reference_time;

    (rewritten, anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{
        FlightDetails, FlightTelemetry, OperatorDetails, OperatorLocation, Position,
        TelemetrySample,
    };
    use chrono::TimeZone;

    fn record_with(reference_time: DateTime<Utc>, timestamps: &[DateTime<Utc>]) -> FullFlightRecord {
        FullFlightRecord {
            reference_time,
            flight_telemetry: FlightTelemetry {
                id: "flight-1".to_string(),
                states: timestamps
                    .iter()
                    .map(|t| TelemetrySample {
                        timestamp: *t,
                        position: Position {
                            lat: 45.0,
                            lng: 10.0,
                            alt: 100.0,
                        },
                    })
                    .collect(),
            },
            flight_details: FlightDetails {
                operation_description: "test".to_string(),
                serial_number: "SN1".to_string(),
            },
            operator_details: OperatorDetails {
                operator_id: "op-1".to_string(),
                location: OperatorLocation { lat: 45.0, lng: 10.0 },
                registration_number: "REG1".to_string(),
            },
        }
    }

    #[test]
    fn earliest_sample_lands_one_minute_after_start() {
        let disk_reference = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let t0 = disk_reference;
        let t1 = disk_reference + Duration::seconds(30);
        let record = record_with(disk_reference, &[t0, t1]);

        let test_start_time = Utc.with_ymd_and_hms(2026, 7, 28, 12, 0, 0).unwrap();
        let test_reference_time = Utc.with_ymd_and_hms(2026, 7, 28, 12, 5, 0).unwrap();

        let (rewritten, anchor_time) =
            rewrite_timeline(&record, test_reference_time, test_start_time);

        assert_eq!(anchor_time, test_start_time + Duration::minutes(1));
        assert_eq!(
            rewritten.flight_telemetry.states[0].timestamp,
            anchor_time
        );
        assert_eq!(rewritten.reference_time, test_reference_time);
        // relative spacing between samples is preserved
        let gap = rewritten.flight_telemetry.states[1].timestamp
            - rewritten.flight_telemetry.states[0].timestamp;
        assert_eq!(gap, Duration::seconds(30));
    }

    #[test]
    fn is_pure_and_does_not_mutate_input() {
        let disk_reference = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let record = record_with(disk_reference, &[disk_reference]);
        let original = record.clone();

        let test_start_time = Utc.with_ymd_and_hms(2026, 7, 28, 12, 0, 0).unwrap();
        let test_reference_time = Utc.with_ymd_and_hms(2026, 7, 28, 12, 5, 0).unwrap();
        let _ = rewrite_timeline(&record, test_reference_time, test_start_time);

        assert_eq!(record.reference_time, original.reference_time);
        assert_eq!(
            record.flight_telemetry.states[0].timestamp,
            original.flight_telemetry.states[0].timestamp
        );
    }

    #[test]
    fn offset_then_negative_offset_round_trips() {
        let disk_reference = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let original_ts = disk_reference + Duration::seconds(10);
        let record = record_with(disk_reference, &[original_ts]);

        let test_start_time = Utc.with_ymd_and_hms(2026, 7, 28, 12, 0, 0).unwrap();
        let test_reference_time = Utc.with_ymd_and_hms(2026, 7, 28, 12, 5, 0).unwrap();
        let (rewritten, anchor_time) =
            rewrite_timeline(&record, test_reference_time, test_start_time);

        let forward_offset = anchor_time - disk_reference;
        let shifted = rewritten.flight_telemetry.states[0].timestamp;
        let restored = shifted - forward_offset;
        assert_eq!(restored, original_ts);
    }
}
