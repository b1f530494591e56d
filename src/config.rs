//! Component I — Configuration Loader.
//!
//! Parses a single TOML document into the three configuration surfaces the rest of the
//! harness needs: the test definition (`[test]`), the evaluation tuning knobs (`[evaluation]`),
//! and an RID version selector. Every table rejects unknown keys so a typo in the file
//! fails loading instead of silently being ignored.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Configuration entry binding one USS identity to exactly one recorded flight track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UssAssignment {
    pub name: String,
    pub injection_base_url: String,
    /// Present when this USS also runs the Display Provider to observe.
    #[serde(default)]
    pub observation_base_url: Option<String>,
    pub allocated_flight_track_number: usize,
}

/// `RIDQualifierTestConfiguration` — the test definition surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RidQualifierTestConfiguration {
    pub locale: String,
    pub now: DateTime<Utc>,
    pub test_start_time: DateTime<Utc>,
    pub usses: Vec<UssAssignment>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct EvaluationConfigurationToml {
    min_polling_interval_s: u64,
    max_propagation_latency_s: u64,
    min_query_diagonal_m: f64,
    repeat_query_rect_period: u32,
}

/// Tuning knobs for the polling scheduler and query-rectangle planner.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationConfiguration {
    pub min_polling_interval: chrono::Duration,
    pub max_propagation_latency: chrono::Duration,
    pub min_query_diagonal: f64,
    pub repeat_query_rect_period: u32,
}

impl From<EvaluationConfigurationToml> for EvaluationConfiguration {
    fn from(toml: EvaluationConfigurationToml) -> Self {
        Self {
            min_polling_interval: chrono::Duration::seconds(toml.min_polling_interval_s as i64),
            max_propagation_latency: chrono::Duration::seconds(
                toml.max_propagation_latency_s as i64,
            ),
            min_query_diagonal: toml.min_query_diagonal_m,
            repeat_query_rect_period: toml.repeat_query_rect_period,
        }
    }
}

/// Versioned RID constants. Two presets track the two ASTM F3411 revisions the wider RID
/// testing ecosystem distinguishes; both carry the same numeric constants in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RidVersionId {
    F3411_19,
    F3411_22a,
}

#[derive(Debug, Clone)]
pub struct RidVersion {
    pub id: RidVersionId,
    pub realtime_period: chrono::Duration,
    pub max_diagonal_km: f64,
    pub max_details_diagonal_km: f64,
    pub read_scope: &'static str,
    pub injection_scope: &'static str,
}

impl RidVersion {
    pub fn f3411_19() -> Self {
        Self {
            id: RidVersionId::F3411_19,
            realtime_period: chrono::Duration::seconds(60),
            max_diagonal_km: 7.0,
            max_details_diagonal_km: 2.0,
            read_scope: "rid.display_provider",
            injection_scope: "rid.inject_test_data",
        }
    }

    pub fn f3411_22a() -> Self {
        Self {
            id: RidVersionId::F3411_22a,
            ..Self::f3411_19()
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "f3411-19" => Ok(Self::f3411_19()),
            "f3411-22a" => Ok(Self::f3411_22a()),
            other => Err(HarnessError::Config(format!(
                "unknown rid_version '{other}', expected 'f3411-19' or 'f3411-22a'"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    test: RidQualifierTestConfiguration,
    evaluation: EvaluationConfigurationToml,
    rid_version: String,
}

/// The fully parsed configuration surface: test definition, evaluation tuning, RID version.
pub struct HarnessConfig {
    pub test: RidQualifierTestConfiguration,
    pub evaluation: EvaluationConfiguration,
    pub rid_version: RidVersion,
}

/// Load and parse a harness configuration TOML file.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    let raw = fs::read_to_string(path)?;
    let parsed: ConfigFile =
        toml::from_str(&raw).map_err(|e| HarnessError::Config(e.to_string()))?;

    Ok(HarnessConfig {
        test: parsed.test,
        evaluation: parsed.evaluation.into(),
        rid_version: RidVersion::parse(&parsed.rid_version)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        rid_version = "f3411-19"

        [test]
        locale = "CHE"
        now = "2026-07-28T12:00:00Z"
        test_start_time = "2026-07-28T12:00:00Z"

        [[test.usses]]
        name = "uss1"
        injection_base_url = "https://uss1.example.com"
        allocated_flight_track_number = 0

        [evaluation]
        min_polling_interval_s = 5
        max_propagation_latency_s = 10
        min_query_diagonal_m = 1000.0
        repeat_query_rect_period = 3
    "#;

    #[test]
    fn round_trips_expected_field_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.test.locale, "CHE");
        assert_eq!(config.test.usses.len(), 1);
        assert_eq!(config.test.usses[0].allocated_flight_track_number, 0);
        assert_eq!(config.evaluation.repeat_query_rect_period, 3);
        assert_eq!(config.rid_version.id, RidVersionId::F3411_19);
    }

    #[test]
    fn rejects_unknown_top_level_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, format!("{SAMPLE}\nbogus_key = 1")).unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn rejects_unknown_rid_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE.replace("f3411-19", "f3411-99")).unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }
}
