// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the feedback backend.
//!
//! Provides [`HttpTransport`] which handles request construction, bearer
//! authentication, bounded timeouts, and classification of every failure
//! into a typed [`TransportError`]. The client makes exactly one attempt
//! per call; re-delivery of failed items belongs to the SDK's retry
//! coordinator, not this layer.

use std::time::Duration;

use async_trait::async_trait;
use pulsekit_core::wire::{ApiErrorBody, ExperiencePayload, ExperienceResponse, FeedbackPayload};
use pulsekit_core::{PulsekitError, Transport, TransportError};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

/// HTTP transport for feedback backend communication.
///
/// Manages authentication headers and connection pooling. Cheap to clone;
/// clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a new backend client.
    ///
    /// # Arguments
    /// * `api_key` - bearer token for the Authorization header
    /// * `base_url` - endpoint prefix, without a trailing slash
    /// * `timeout` - per-request bound; a stalled request fails as
    ///   [`TransportError::Timeout`] instead of blocking a retry pass
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, PulsekitError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer)
                .map_err(|e| PulsekitError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PulsekitError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<T: serde::Serialize>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<reqwest::Response, TransportError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        debug!(status = %status, path, "backend response received");

        if status.is_success() {
            return Ok(response);
        }

        // 401/422 carry a structured error body worth logging; anything the
        // server sends that doesn't parse is reported as the raw status only.
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ApiErrorBody>(&body).ok();
        match &parsed {
            Some(api_err) => warn!(
                status = status.as_u16(),
                error = api_err.error.as_str(),
                message = api_err.message.as_str(),
                "backend rejected request"
            ),
            None => warn!(status = status.as_u16(), body = body.as_str(), "backend request failed"),
        }
        Err(TransportError::Api {
            status: status.as_u16(),
            body: parsed,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_experience(
        &self,
        payload: &ExperiencePayload,
    ) -> Result<ExperienceResponse, TransportError> {
        let response = self.post_json("experiences", payload).await?;
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Malformed(format!("failed to read body: {e}")))?;
        serde_json::from_str::<ExperienceResponse>(&body)
            .map_err(|e| TransportError::Malformed(format!("failed to parse body: {e}")))
    }

    async fn send_feedback(&self, payload: &FeedbackPayload) -> Result<(), TransportError> {
        self.post_json("feedback", payload).await.map(|_| ())
    }
}

/// Classifies a reqwest error raised before a status line was received.
fn classify_request_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if let Some(status) = e.status() {
        TransportError::Api {
            status: status.as_u16(),
            body: None,
        }
    } else {
        TransportError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsekit_core::types::Rating;
    use pulsekit_core::wire::ClientInfo;
    use pulsekit_core::Experience;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_transport(base_url: &str) -> HttpTransport {
        HttpTransport::new("test-api-key", base_url, Duration::from_secs(2)).unwrap()
    }

    fn test_experience_payload() -> ExperiencePayload {
        let experience = Experience {
            timestamp_ms: 1_700_000_000_000,
            rating: Rating::Positive,
            context: Some("onboarding".to_string()),
        };
        let client = ClientInfo {
            client_id: "client-1".to_string(),
            source: "linux".to_string(),
            build_version: "1.0.0".to_string(),
        };
        ExperiencePayload::from_experience(&experience, &client)
    }

    fn test_feedback_payload() -> FeedbackPayload {
        let feedback = pulsekit_core::QueuedFeedback {
            timestamp_ms: 1_700_000_000_000,
            rating: Rating::Negative,
            body: Some("slow checkout".to_string()),
        };
        let client = ClientInfo {
            client_id: "client-1".to_string(),
            source: "linux".to_string(),
            build_version: "1.0.0".to_string(),
        };
        FeedbackPayload::from_feedback(&feedback, &client)
    }

    #[tokio::test]
    async fn send_experience_parses_response() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "should_show_feedback": true,
            "flow_type": "normal",
            "feedback_ui": {"title": "Thanks!", "subtitle": "One more thing", "prompt": "Tell us more"}
        });

        Mock::given(method("POST"))
            .and(path("/experiences"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({"value": 4, "client_id": "client-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let transport = test_transport(&server.uri());
        let response = transport
            .send_experience(&test_experience_payload())
            .await
            .unwrap();

        assert!(response.should_show_feedback);
        assert_eq!(response.flow_type, "normal");
        assert_eq!(
            response.feedback_ui.unwrap().title.as_deref(),
            Some("Thanks!")
        );
    }

    #[tokio::test]
    async fn send_experience_classifies_structured_422() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": "unprocessable_entity",
            "message": "Validation failed",
            "details": {"value": ["is out of range"]}
        });

        Mock::given(method("POST"))
            .and(path("/experiences"))
            .respond_with(ResponseTemplate::new(422).set_body_json(&error_body))
            .mount(&server)
            .await;

        let transport = test_transport(&server.uri());
        let err = transport
            .send_experience(&test_experience_payload())
            .await
            .unwrap_err();

        match err {
            TransportError::Api { status, body } => {
                assert_eq!(status, 422);
                let body = body.expect("structured body should parse");
                assert_eq!(body.error, "unprocessable_entity");
                assert_eq!(body.details["value"], vec!["is out of range"]);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_experience_classifies_unstructured_401() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/experiences"))
            .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
            .mount(&server)
            .await;

        let transport = test_transport(&server.uri());
        let err = transport
            .send_experience(&test_experience_payload())
            .await
            .unwrap_err();

        match err {
            TransportError::Api { status, body } => {
                assert_eq!(status, 401);
                assert!(body.is_none());
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_experience_classifies_malformed_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/experiences"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let transport = test_transport(&server.uri());
        let err = transport
            .send_experience(&test_experience_payload())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[tokio::test]
    async fn send_experience_classifies_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/experiences"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let transport =
            HttpTransport::new("test-api-key", &server.uri(), Duration::from_millis(100)).unwrap();
        let err = transport
            .send_experience(&test_experience_payload())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Timeout));
    }

    #[tokio::test]
    async fn send_feedback_success_needs_no_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(body_partial_json(serde_json::json!({"rating": "2"})))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = test_transport(&server.uri());
        transport
            .send_feedback(&test_feedback_payload())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn send_feedback_classifies_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/feedback"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = test_transport(&server.uri());
        let err = transport
            .send_feedback(&test_feedback_payload())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn connection_refused_classifies_as_network() {
        // Nothing listens on this port.
        let transport = test_transport("http://127.0.0.1:1");
        let err = transport
            .send_feedback(&test_feedback_payload())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Network(_)));
    }
}
