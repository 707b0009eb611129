// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire-format request and response types for the feedback backend.
//!
//! Payload builders convert the immutable domain records into the exact
//! field layout the backend expects; responses deserialize leniently so a
//! missing field never fails an otherwise successful submission.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Experience, QueuedFeedback};

/// Client identification attached to every outbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Opaque per-installation identifier (host-supplied or generated UUID).
    pub client_id: String,
    /// Platform tag, e.g. "linux" or "android".
    pub source: String,
    /// Host application build identifier.
    pub build_version: String,
}

/// Body of `POST {base}/experiences`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperiencePayload {
    pub client_id: String,
    /// ISO-8601 timestamp of the logged event.
    pub sent_at: String,
    /// Rating as its 1-5 integer value.
    pub value: u8,
    /// Free-text detail; empty string when absent.
    pub context: String,
    pub source: String,
    pub build_version: String,
}

impl ExperiencePayload {
    pub fn from_experience(experience: &Experience, client: &ClientInfo) -> ExperiencePayload {
        ExperiencePayload {
            client_id: client.client_id.clone(),
            sent_at: iso8601(experience.timestamp_ms),
            value: experience.rating.value(),
            context: experience.context.clone().unwrap_or_default(),
            source: client.source.clone(),
            build_version: client.build_version.clone(),
        }
    }
}

/// Body of `POST {base}/feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPayload {
    pub client_id: String,
    /// ISO-8601 timestamp of the submission.
    pub date: String,
    /// Rating as a stringified 1-5 integer.
    pub rating: String,
    /// Feedback body; empty string when absent.
    pub feedback: String,
    pub source: String,
    pub build_version: String,
}

impl FeedbackPayload {
    pub fn from_feedback(feedback: &QueuedFeedback, client: &ClientInfo) -> FeedbackPayload {
        FeedbackPayload {
            client_id: client.client_id.clone(),
            date: iso8601(feedback.timestamp_ms),
            rating: feedback.rating.value().to_string(),
            feedback: feedback.body.clone().unwrap_or_default(),
            source: client.source.clone(),
            build_version: client.build_version.clone(),
        }
    }
}

/// Successful response body of the experiences endpoint.
///
/// All fields default so a 2xx with a sparse body still counts as success;
/// an unparseable body is classified as malformed by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceResponse {
    #[serde(default)]
    pub should_show_feedback: bool,
    #[serde(default)]
    pub flow_type: String,
    #[serde(default)]
    pub feedback_ui: Option<FeedbackUiPayload>,
}

/// Server-supplied UI copy overrides. Fields the server omits keep their
/// local defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackUiPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Structured error body carried by 401/422 responses.
///
/// Logged for diagnostics; the item is queued for retry either way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
    /// Per-field validation details, e.g. {"rating": ["is out of range"]}.
    #[serde(default)]
    pub details: HashMap<String, Vec<String>>,
}

/// Formats milliseconds since the epoch as an ISO-8601 / RFC 3339 string.
fn iso8601(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rating;

    fn client() -> ClientInfo {
        ClientInfo {
            client_id: "client-1".to_string(),
            source: "linux".to_string(),
            build_version: "2.4.0".to_string(),
        }
    }

    #[test]
    fn experience_payload_fields() {
        let experience = Experience {
            timestamp_ms: 1_700_000_000_000,
            rating: Rating::StrongPositive,
            context: Some("after checkout".to_string()),
        };
        let payload = ExperiencePayload::from_experience(&experience, &client());
        assert_eq!(payload.client_id, "client-1");
        assert_eq!(payload.value, 5);
        assert_eq!(payload.context, "after checkout");
        assert!(payload.sent_at.starts_with("2023-11-14T"));
    }

    #[test]
    fn experience_payload_empty_context() {
        let experience = Experience {
            timestamp_ms: 0,
            rating: Rating::Neutral,
            context: None,
        };
        let payload = ExperiencePayload::from_experience(&experience, &client());
        assert_eq!(payload.context, "");
        assert_eq!(payload.sent_at, "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn feedback_payload_stringifies_rating() {
        let feedback = QueuedFeedback {
            timestamp_ms: 1_700_000_000_000,
            rating: Rating::Negative,
            body: Some("the cart lost my items".to_string()),
        };
        let payload = FeedbackPayload::from_feedback(&feedback, &client());
        assert_eq!(payload.rating, "2");
        assert_eq!(payload.feedback, "the cart lost my items");
    }

    #[test]
    fn experience_response_tolerates_sparse_body() {
        let response: ExperienceResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.should_show_feedback);
        assert_eq!(response.flow_type, "");
        assert!(response.feedback_ui.is_none());
    }

    #[test]
    fn experience_response_full_body() {
        let json = r#"{
            "should_show_feedback": true,
            "flow_type": "frustration",
            "feedback_ui": {"title": "Sorry!", "prompt": "Tell us more"}
        }"#;
        let response: ExperienceResponse = serde_json::from_str(json).unwrap();
        assert!(response.should_show_feedback);
        assert_eq!(response.flow_type, "frustration");
        let ui = response.feedback_ui.unwrap();
        assert_eq!(ui.title.as_deref(), Some("Sorry!"));
        assert_eq!(ui.subtitle, None);
    }

    #[test]
    fn api_error_body_with_nested_details() {
        let json = r#"{
            "error": "unprocessable_entity",
            "message": "Validation failed",
            "details": {"rating": ["is out of range"]}
        }"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error, "unprocessable_entity");
        assert_eq!(body.details["rating"], vec!["is out of range"]);
    }
}
