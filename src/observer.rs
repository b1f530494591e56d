//! Component H — Observer Adapter.
//!
//! Abstracts one Display Provider behind a trait, following the same shape as the
//! teacher's `ForwardGeocoder`/`ReverseGeocoder` traits: a thin `#[async_trait]` seam so
//! test code and alternative transports can substitute a mock without touching the
//! scheduler or evaluator.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthProvider;
use crate::geometry::LatLngRect;
use crate::query::{Query, QueryRequest, QueryResponse};

/// One flight as reported by a Display Provider's `display_data` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedFlight {
    pub id: String,
    #[serde(default)]
    pub current_state: Option<serde_json::Value>,
}

/// Closed response shape for `GET {base}/display_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDisplayDataResponse {
    pub flights: Vec<ObservedFlight>,
}

/// Closed response shape for `GET {base}/display_data/{flight_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDetailsResponse {
    pub details: serde_json::Value,
}

/// One Display Provider under observation. Neither call retries — the polling scheduler
/// (§4.F) owns cadence.
#[async_trait]
pub trait RidSystemObserver: Send + Sync {
    async fn observe_system(&self, rect: LatLngRect) -> (Option<GetDisplayDataResponse>, Query);

    async fn observe_flight_details(
        &self,
        flight_id: &str,
    ) -> (Option<GetDetailsResponse>, Query);
}

/// `reqwest`-backed observer talking to a real Display Provider.
pub struct HttpObserver {
    client: reqwest::Client,
    base_url: String,
    read_scope: &'static str,
    auth: Box<dyn AuthProvider>,
}

impl HttpObserver {
    pub fn new(base_url: impl Into<String>, read_scope: &'static str, auth: Box<dyn AuthProvider>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("reqwest client configuration is valid"),
            base_url: base_url.into(),
            read_scope,
            auth,
        }
    }

    async fn get(&self, url: &str) -> (Option<reqwest::Response>, Query) {
        let timestamp = Utc::now();
        let token = self.auth.token(self.read_scope).unwrap_or_default();

        let result = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await;

        match result {
            Ok(response) => {
                let status_code = response.status().as_u16();
                let query = Query {
                    request: QueryRequest {
                        method: "GET".to_string(),
                        url: url.to_string(),
                        timestamp,
                    },
                    response: QueryResponse {
                        status_code,
                        body: None,
                        reported: Utc::now(),
                    },
                };
                (Some(response), query)
            }
            Err(_) => {
                let query = Query {
                    request: QueryRequest {
                        method: "GET".to_string(),
                        url: url.to_string(),
                        timestamp,
                    },
                    response: QueryResponse {
                        status_code: 0,
                        body: None,
                        reported: Utc::now(),
                    },
                };
                (None, query)
            }
        }
    }
}

#[async_trait]
impl RidSystemObserver for HttpObserver {
    async fn observe_system(&self, rect: LatLngRect) -> (Option<GetDisplayDataResponse>, Query) {
        let url = format!(
            "{}/display_data?view={}",
            self.base_url,
            rect.to_view_param()
        );
        let (response, query) = self.get(&url).await;

        let Some(response) = response else {
            return (None, query);
        };
        if response.status().as_u16() != 200 {
            return (None, query);
        }
        match response.json::<GetDisplayDataResponse>().await {
            Ok(parsed) => (Some(parsed), query),
            Err(_) => (None, query),
        }
    }

    async fn observe_flight_details(
        &self,
        flight_id: &str,
    ) -> (Option<GetDetailsResponse>, Query) {
        let url = format!("{}/display_data/{flight_id}", self.base_url);
        let (response, query) = self.get(&url).await;

        let Some(response) = response else {
            return (None, query);
        };
        if response.status().as_u16() != 200 {
            return (None, query);
        }
        match response.json::<GetDetailsResponse>().await {
            Ok(parsed) => (Some(parsed), query),
            Err(_) => (None, query),
        }
    }
}
