//! Component D — Injection Client.
//!
//! PUTs each `DeliverablePayload` to its USS's injection endpoint and classifies the HTTP
//! outcome into a closed error taxonomy. A failed submission is fatal for the run: this is
//! a test-orchestration tool, and partial injection invalidates the experiment.

use chrono::Utc;
use reqwest::StatusCode;

use crate::auth::AuthProvider;
use crate::error::{HarnessError, Result};
use crate::findings::Findings;
use crate::payload::{CreateTestParameters, DeliverablePayload};
use crate::query::{Query, QueryRequest, QueryResponse};

pub struct InjectionClient {
    client: reqwest::Client,
    injection_scope: &'static str,
    auth: Box<dyn AuthProvider>,
}

impl InjectionClient {
    pub fn new(injection_scope: &'static str, auth: Box<dyn AuthProvider>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("reqwest client configuration is valid"),
            injection_scope,
            auth,
        }
    }

    /// Submit one payload, recording the exchange into `findings` regardless of outcome.
    pub async fn submit(&self, payload: &DeliverablePayload, findings: &mut Findings) -> Result<()> {
        let url = format!("{}{}", payload.uss.injection_base_url, payload.injection_path);
        let token = self.auth.token(self.injection_scope)?;
        let body = CreateTestParameters {
            requested_flights: &payload.injection_payload.requested_flights,
        };

        let timestamp = Utc::now();
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let query = Query {
            request: QueryRequest {
                method: "PUT".to_string(),
                url: url.clone(),
                timestamp,
            },
            response: QueryResponse {
                status_code: status.as_u16(),
                body: None,
                reported: Utc::now(),
            },
        };
        findings.add_observation_query(query);

        match status {
            StatusCode::OK => {
                tracing::info!(uss = %payload.uss.name, test_id = %payload.injection_payload.test_id, "injected test data");
                Ok(())
            }
            StatusCode::CONFLICT => Err(HarnessError::TestAlreadyExists),
            StatusCode::NOT_FOUND => Err(HarnessError::EndpointNotFound),
            StatusCode::UNAUTHORIZED => Err(HarnessError::Unauthenticated),
            StatusCode::FORBIDDEN => Err(HarnessError::InsufficientScope),
            StatusCode::PAYLOAD_TOO_LARGE => Err(HarnessError::PayloadTooLarge),
            other => Err(HarnessError::InjectionFailed(other)),
        }
    }

    /// Submit every payload in order, aborting on the first failure (§4.D).
    pub async fn submit_all(
        &self,
        payloads: &[DeliverablePayload],
        findings: &mut Findings,
    ) -> Result<()> {
        for payload in payloads {
            self.submit(payload, findings).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use crate::payload::{TestFlight, TestPayload};
    use crate::config::UssAssignment;
    use uuid::Uuid;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload(server_uri: &str, test_id: Uuid) -> DeliverablePayload {
        DeliverablePayload {
            uss: UssAssignment {
                name: "uss1".to_string(),
                injection_base_url: server_uri.to_string(),
                observation_base_url: None,
                allocated_flight_track_number: 0,
            },
            injection_path: format!("/tests/{test_id}"),
            injection_payload: TestPayload {
                test_id,
                requested_flights: vec![TestFlight {
                    injection_id: Uuid::new_v4(),
                    telemetry: vec![],
                    details_responses: vec![],
                }],
            },
        }
    }

    #[tokio::test]
    async fn submit_succeeds_on_200() {
        let server = MockServer::start().await;
        let test_id = Uuid::new_v4();
        Mock::given(method("PUT"))
            .and(path(format!("/tests/{test_id}")))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = InjectionClient::new(
            "rid.inject_test_data",
            Box::new(StaticTokenProvider::new("token")),
        );
        let mut findings = Findings::new();
        let result = client.submit(&payload(&server.uri(), test_id), &mut findings).await;

        assert!(result.is_ok());
        assert_eq!(findings.queries.len(), 1);
    }

    // S2 — Injection conflict
    #[tokio::test]
    async fn submit_fails_with_test_already_exists_on_409() {
        let server = MockServer::start().await;
        let test_id = Uuid::new_v4();
        Mock::given(method("PUT"))
            .and(path(format!("/tests/{test_id}")))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let client = InjectionClient::new(
            "rid.inject_test_data",
            Box::new(StaticTokenProvider::new("token")),
        );
        let mut findings = Findings::new();
        let err = client
            .submit(&payload(&server.uri(), test_id), &mut findings)
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::TestAlreadyExists));
        assert_eq!(findings.queries.len(), 1);
    }

    #[tokio::test]
    async fn submit_all_aborts_after_first_failure() {
        let server = MockServer::start().await;
        let failing_id = Uuid::new_v4();
        let never_reached_id = Uuid::new_v4();
        Mock::given(method("PUT"))
            .and(path(format!("/tests/{failing_id}")))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let client = InjectionClient::new(
            "rid.inject_test_data",
            Box::new(StaticTokenProvider::new("token")),
        );
        let mut findings = Findings::new();
        let payloads = vec![
            payload(&server.uri(), failing_id),
            payload(&server.uri(), never_reached_id),
        ];

        let err = client.submit_all(&payloads, &mut findings).await.unwrap_err();
        assert!(matches!(err, HarnessError::TestAlreadyExists));
        assert_eq!(findings.queries.len(), 1);
    }
}
