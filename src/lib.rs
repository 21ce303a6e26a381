//! turnguard — provider error classification and role filtering.
//!
//! Sits between an LLM provider client and a user-facing agent runner:
//!
//! - [`format_error_text`] rewrites raw provider errors (plain text, HTTP
//!   status lines, JSON payloads) into stable, readable messages.
//! - [`sanitize_roles`] drops messages whose role the target API rejects.
//! - [`sanitize_user_facing_text`] cleans text before display.
//!
//! # Quick Start
//!
//! ```
//! use turnguard::prelude::*;
//!
//! let text = format_error_text(r#"{"error":{"message":"roles must alternate"}}"#);
//! assert!(text.contains("Message ordering conflict"));
//!
//! let messages = vec![
//!     ConversationMessage::system("be brief"),
//!     ConversationMessage::user("hi"),
//! ];
//! let kept = sanitize_roles(&messages, Some("anthropic-messages"));
//! assert_eq!(kept.len(), 1);
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod guard;
pub mod prelude;
pub mod provider;
pub mod text;
pub mod types;

pub use classify::is_context_overflow;
pub use guard::TurnGuard;
pub use provider::sanitize_roles;
pub use text::sanitize_user_facing_text;

use classify::{Classification, ErrorClassifier};
use types::AssistantTurn;

/// Classify a raw provider error with default settings.
pub fn classify_error(raw: &str) -> Classification {
    ErrorClassifier::default().classify(raw)
}

/// Friendly message for a raw provider error, with default settings.
pub fn format_error_text(raw: &str) -> String {
    ErrorClassifier::default().format_error_text(raw)
}

/// Friendly message for a failed turn; non-failed turns pass through.
pub fn format_assistant_error(turn: &AssistantTurn) -> Option<String> {
    ErrorClassifier::default().format_assistant_error(turn)
}
