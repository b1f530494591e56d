//! rid-qualifier-harness — a conformance-testing harness for Remote Identification (RID)
//! systems used by UAS Service Suppliers.
//!
//! Synthesizes time-shifted aircraft telemetry from recorded flight tracks, injects it into
//! one or more USSes under test, then polls independent Display Provider observers at a
//! controlled cadence, comparing each observation to the ground truth it injected.

pub mod auth;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod findings;
pub mod geometry;
pub mod injected;
pub mod injection;
pub mod log_format;
pub mod observer;
pub mod payload;
pub mod query;
pub mod rect;
pub mod rewrite;
pub mod scheduler;
pub mod track;
