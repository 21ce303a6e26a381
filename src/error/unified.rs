//! Stable error taxonomy shared by the classifier and failover hints.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The user-facing category a raw provider error was classified into.
///
/// Exactly one category applies per classification. Variants are listed in
/// the priority order the classifier checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    RoleOrderingConflict,
    UnsupportedRoleType,
    GenericRoleError,
    ContextOverflow,
    HttpStatusError,
    RawProviderError,
    Uncategorized,
}

impl ErrorCategory {
    /// Whether this category concerns message roles.
    pub fn is_role_error(self) -> bool {
        matches!(
            self,
            Self::RoleOrderingConflict | Self::UnsupportedRoleType | Self::GenericRoleError
        )
    }

    /// Whether the friendly message suggests starting a new conversation.
    pub fn suggests_reset(self) -> bool {
        self.is_role_error()
    }
}

/// Why a failed provider call might succeed elsewhere or later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailoverReason {
    Billing,
    RateLimit,
    Overloaded,
    Auth,
    Timeout,
    Format,
}

impl FailoverReason {
    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimit | Self::Overloaded | Self::Timeout)
    }
}
