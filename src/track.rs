//! Component A — Track Loader.
//!
//! Reads recorded flight tracks from `<root>/<locale>/aircraft_states/` and parses them
//! into closed, strongly-typed [`FullFlightRecord`]s, validating the invariants the rest
//! of the harness relies on (strictly increasing telemetry timestamps, in-range lat/lng)
//! at load time rather than deferring to whatever later reads the data.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// A geographic position with altitude, in degrees and meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
}

/// One telemetry sample: a timestamped position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub timestamp: DateTime<Utc>,
    pub position: Position,
}

/// The telemetry track for one flight, keyed by a stable flight id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightTelemetry {
    pub id: String,
    pub states: Vec<TelemetrySample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightDetails {
    pub operation_description: String,
    pub serial_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatorLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorDetails {
    pub operator_id: String,
    pub location: OperatorLocation,
    pub registration_number: String,
}

/// A recorded flight track on disk, before timeline rewriting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullFlightRecord {
    pub reference_time: DateTime<Utc>,
    pub flight_telemetry: FlightTelemetry,
    pub flight_details: FlightDetails,
    pub operator_details: OperatorDetails,
}

impl FullFlightRecord {
    /// Validate the invariants the rest of the harness assumes: telemetry timestamps are
    /// strictly increasing, and every position lies within WGS84 bounds.
    fn validate(&self, path: &Path) -> Result<()> {
        let mut prev: Option<DateTime<Utc>> = None;
        for sample in &self.flight_telemetry.states {
            if let Some(prev_ts) = prev
                && sample.timestamp <= prev_ts
            {
                return Err(HarnessError::InvalidTrack {
                    path: path.display().to_string(),
                    reason: format!(
                        "telemetry timestamps are not strictly increasing ({prev_ts} >= {})",
                        sample.timestamp
                    ),
                });
            }
            prev = Some(sample.timestamp);

            if !(-90.0..=90.0).contains(&sample.position.lat) {
                return Err(HarnessError::InvalidTrack {
                    path: path.display().to_string(),
                    reason: format!("latitude {} out of range", sample.position.lat),
                });
            }
            if !(-180.0..=180.0).contains(&sample.position.lng) {
                return Err(HarnessError::InvalidTrack {
                    path: path.display().to_string(),
                    reason: format!("longitude {} out of range", sample.position.lng),
                });
            }
        }
        Ok(())
    }
}

/// Read every regular file under `<root>/<locale>/aircraft_states/`, parse it as a
/// [`FullFlightRecord`], and return them in a stable, lexicographically-sorted-by-filename
/// order (directory iteration order is platform-dependent and must not leak into the
/// `allocated_flight_track_number` indexing scheme).
pub fn load_tracks(root: &Path, locale: &str) -> Result<Vec<FullFlightRecord>> {
    let dir = root.join(locale).join("aircraft_states");

    let mut paths: Vec<PathBuf> = match fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.path())
            .collect(),
        Err(_) => Vec::new(),
    };

    if paths.is_empty() {
        return Err(HarnessError::NoTracksAvailable(dir.display().to_string()));
    }

    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let raw = fs::read_to_string(&path)?;
            let record: FullFlightRecord =
                serde_json::from_str(&raw).map_err(|e| HarnessError::InvalidTrack {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            record.validate(&path)?;
            Ok(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_record_json(reference_time: &str, timestamps: &[&str]) -> String {
        let states: Vec<String> = timestamps
            .iter()
            .map(|t| {
                format!(
                    r#"{{"timestamp":"{t}","position":{{"lat":45.0,"lng":10.0,"alt":100.0}}}}"#
                )
            })
            .collect();
        format!(
            r#"{{
                "reference_time": "{reference_time}",
                "flight_telemetry": {{"id": "flight-1", "states": [{}]}},
                "flight_details": {{"operation_description": "test", "serial_number": "SN1"}},
                "operator_details": {{
                    "operator_id": "op-1",
                    "location": {{"lat": 45.0, "lng": 10.0}},
                    "registration_number": "REG1"
                }}
            }}"#,
            states.join(",")
        )
    }

    #[test]
    fn loads_all_regular_files_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let states_dir = dir.path().join("CHE").join("aircraft_states");
        fs::create_dir_all(&states_dir).unwrap();

        fs::write(
            states_dir.join("b.json"),
            sample_record_json("2024-01-01T00:00:00Z", &["2024-01-01T00:00:00Z"]),
        )
        .unwrap();
        fs::write(
            states_dir.join("a.json"),
            sample_record_json("2024-01-01T00:00:00Z", &["2024-01-01T00:00:01Z"]),
        )
        .unwrap();

        let records = load_tracks(dir.path(), "CHE").unwrap();
        assert_eq!(records.len(), 2);
        // "a.json" sorts before "b.json"
        assert_eq!(
            records[0].flight_telemetry.states[0].timestamp.to_rfc3339(),
            "2024-01-01T00:00:01+00:00"
        );
    }

    #[test]
    fn fails_when_locale_directory_is_empty_or_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_tracks(dir.path(), "CHE").unwrap_err();
        assert!(matches!(err, HarnessError::NoTracksAvailable(_)));
    }

    #[test]
    fn rejects_non_monotonic_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let states_dir = dir.path().join("CHE").join("aircraft_states");
        fs::create_dir_all(&states_dir).unwrap();
        fs::write(
            states_dir.join("a.json"),
            sample_record_json(
                "2024-01-01T00:00:00Z",
                &["2024-01-01T00:00:01Z", "2024-01-01T00:00:00Z"],
            ),
        )
        .unwrap();

        let err = load_tracks(dir.path(), "CHE").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidTrack { .. }));
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let dir = tempfile::tempdir().unwrap();
        let states_dir = dir.path().join("CHE").join("aircraft_states");
        fs::create_dir_all(&states_dir).unwrap();
        let bad = sample_record_json("2024-01-01T00:00:00Z", &["2024-01-01T00:00:00Z"])
            .replace("\"lat\":45.0", "\"lat\":95.0");
        fs::write(states_dir.join("a.json"), bad).unwrap();

        let err = load_tracks(dir.path(), "CHE").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidTrack { .. }));
    }
}
