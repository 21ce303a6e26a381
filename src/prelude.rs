//! Convenience re-exports for common use.

pub use crate::classify::{Classification, ErrorClassifier};
pub use crate::config::GuardConfig;
pub use crate::error::{ErrorCategory, FailoverReason, Result, TurnguardError};
pub use crate::guard::TurnGuard;
pub use crate::provider::{ApiFamily, RolePolicy};
pub use crate::types::{AssistantTurn, ConversationMessage, RoleTagged, StopReason};
pub use crate::{
    classify_error, format_assistant_error, format_error_text, sanitize_roles,
    sanitize_user_facing_text,
};
