//! Closed error taxonomy for the harness.
//!
//! `Findings` (see [`crate::findings`]) carries conformance *discrepancies*; this module
//! carries everything that aborts a run. Callers match on variant rather than inspecting
//! strings, e.g. the CLI retries only on [`HarnessError::TestDataExpired`].

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("no track files found under {0}")]
    NoTracksAvailable(String),

    #[error("invalid track file {path}: {reason}")]
    InvalidTrack { path: String, reason: String },

    #[error(
        "uss '{uss}' allocated flight track number {index}, but only {available} tracks were loaded"
    )]
    InvalidTrackAllocation {
        uss: String,
        index: usize,
        available: usize,
    },

    #[error("test already exists")]
    TestAlreadyExists,

    #[error("injection endpoint not found")]
    EndpointNotFound,

    #[error("injection request was not authenticated")]
    Unauthenticated,

    #[error("injection token lacked the required scope")]
    InsufficientScope,

    #[error("injection payload was too large")]
    PayloadTooLarge,

    #[error("injection failed with unexpected status {0}")]
    InjectionFailed(StatusCode),

    #[error("test data ends at {t_end}, which is already in the past (now={now})")]
    TestDataExpired {
        t_end: chrono::DateTime<chrono::Utc>,
        now: chrono::DateTime<chrono::Utc>,
    },

    #[error("query rectangle expansion failed to converge after {iterations} iterations")]
    DegenerateGeometry { iterations: u32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
