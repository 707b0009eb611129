// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Pulsekit SDK.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Maximum accepted length of a feedback body, in characters.
pub const MAX_FEEDBACK_CHARS: usize = 240;

/// Five-point user-sentiment scale.
///
/// Ordering matters: it derives which question variant the UI shows and
/// supports any "at least this positive" server-side logic. The integer
/// wire value runs 1 (strong negative) through 5 (strong positive).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
pub enum Rating {
    StrongNegative,
    Negative,
    Neutral,
    Positive,
    StrongPositive,
}

impl Rating {
    /// The 1-5 integer value sent on the wire.
    pub fn value(self) -> u8 {
        match self {
            Rating::StrongNegative => 1,
            Rating::Negative => 2,
            Rating::Neutral => 3,
            Rating::Positive => 4,
            Rating::StrongPositive => 5,
        }
    }

    /// Inverse of [`Rating::value`]. Returns `None` outside 1-5.
    pub fn from_value(value: u8) -> Option<Rating> {
        match value {
            1 => Some(Rating::StrongNegative),
            2 => Some(Rating::Negative),
            3 => Some(Rating::Neutral),
            4 => Some(Rating::Positive),
            5 => Some(Rating::StrongPositive),
            _ => None,
        }
    }
}

/// Which question variant the feedback UI should present.
///
/// Derived from the server's last experiences response; anything the server
/// sends that is not recognized falls back to [`FlowType::Neutral`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum FlowType {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl FlowType {
    /// Parses the server's `flow_type` string.
    ///
    /// Recognized values are "normal", "neutral", and "frustration";
    /// everything else maps to [`FlowType::Neutral`].
    pub fn from_server(value: &str) -> FlowType {
        match value {
            "normal" => FlowType::Positive,
            "neutral" => FlowType::Neutral,
            "frustration" => FlowType::Negative,
            _ => FlowType::Neutral,
        }
    }
}

/// One logged user-sentiment event. Immutable once created; removed from the
/// unsent queue only after confirmed delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    /// Milliseconds since the Unix epoch at the moment of logging.
    pub timestamp_ms: i64,
    pub rating: Rating,
    /// Optional free-text detail supplied by the host app.
    pub context: Option<String>,
}

/// One pending structured feedback submission. Same lifecycle as
/// [`Experience`]; the body is bounded at [`MAX_FEEDBACK_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedFeedback {
    pub timestamp_ms: i64,
    pub rating: Rating,
    pub body: Option<String>,
}

/// Title, subtitle, and prompt copy for the feedback UI.
///
/// Defaulted locally per flow type; replaced when a server response carries
/// overrides. No lifecycle beyond replace-on-response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackUiStrings {
    pub title: String,
    pub subtitle: String,
    pub prompt: String,
}

impl FeedbackUiStrings {
    /// Local default copy for the given flow type, used until (and unless)
    /// the server supplies overrides.
    pub fn for_flow(flow: FlowType) -> FeedbackUiStrings {
        let prompt = match flow {
            FlowType::Positive => "What did you enjoy the most?",
            FlowType::Neutral => "How could we improve?",
            FlowType::Negative => "What went wrong?",
        };
        FeedbackUiStrings {
            title: "We'd love your feedback".to_string(),
            subtitle: "It only takes a moment".to_string(),
            prompt: prompt.to_string(),
        }
    }
}

impl Default for FeedbackUiStrings {
    fn default() -> Self {
        FeedbackUiStrings::for_flow(FlowType::Neutral)
    }
}

/// The single durable blob holding all SDK state.
///
/// Every field carries `#[serde(default)]` so documents written by older
/// versions (or partially corrupted ones) still deserialize. All mutations
/// go through one read-modify-write-persist critical section; see the
/// `SharedState` type in the `pulsekit` crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Unsent experiences in append (FIFO) order.
    #[serde(default)]
    pub unsent_experiences: Vec<Experience>,

    /// Unsent feedback submissions in append (FIFO) order.
    #[serde(default)]
    pub unsent_feedback: Vec<QueuedFeedback>,

    /// The prompt latch: once true, only an explicit dismiss or reset
    /// clears it. A server response alone never flips it back to false.
    #[serde(default)]
    pub show_prompt: bool,

    /// Current UI copy, local default or server override.
    #[serde(default)]
    pub ui_strings: FeedbackUiStrings,

    /// Question variant derived from the last server response.
    #[serde(default)]
    pub flow_type: FlowType,

    /// When the prompt latch last opened. Reserved for rate-limiting.
    #[serde(default)]
    pub last_prompt_at_ms: Option<i64>,
}
