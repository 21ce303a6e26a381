//! Assistant turn results handed over by the LLM client.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Why the model stopped producing a turn.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StopReason {
    #[default]
    Stop,
    Length,
    ToolUse,
    Error,
    Aborted,
}

/// The terminal state of one assistant turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantTurn {
    #[serde(default)]
    pub stop_reason: StopReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AssistantTurn {
    /// A failed turn carrying raw provider error text.
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            stop_reason: StopReason::Error,
            error_message: Some(error_message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.stop_reason == StopReason::Error
    }
}
