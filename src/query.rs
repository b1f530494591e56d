//! A `Query` records one HTTP exchange, successful or not, for the final report.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub method: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub status_code: u16,
    pub body: Option<serde_json::Value>,
    pub reported: DateTime<Utc>,
}

/// A single HTTP request/response pair, produced once per attempt; never retried here.
#[derive(Debug, Clone, Serialize)]
pub struct Query {
    pub request: QueryRequest,
    pub response: QueryResponse,
}

impl Query {
    pub fn status_code(&self) -> u16 {
        self.response.status_code
    }
}
