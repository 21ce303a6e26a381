//! Configured entry point bundling the classifier and role policy.

use crate::classify::{classify_failover_reason, Classification, ErrorClassifier};
use crate::config::GuardConfig;
use crate::error::{FailoverReason, Result};
use crate::provider::RolePolicy;
use crate::text;
use crate::types::{AssistantTurn, RoleTagged};

/// Error classification and role filtering under one configuration.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnGuard {
    classifier: ErrorClassifier,
    policy: RolePolicy,
}

impl TurnGuard {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            classifier: ErrorClassifier::from_config(config),
            policy: RolePolicy::from_config(config),
        }
    }

    /// Build from `.env`, the config file, and environment overrides.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(&GuardConfig::from_env()?))
    }

    pub fn with_policy(mut self, policy: RolePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    pub fn policy(&self) -> &RolePolicy {
        &self.policy
    }

    pub fn classify(&self, raw: &str) -> Classification {
        self.classifier.classify(raw)
    }

    pub fn format_error_text(&self, raw: &str) -> String {
        self.classifier.format_error_text(raw)
    }

    pub fn format_assistant_error(&self, turn: &AssistantTurn) -> Option<String> {
        self.classifier.format_assistant_error(turn)
    }

    pub fn sanitize_user_facing_text(&self, text: &str) -> String {
        text::sanitize_with(&self.classifier, text)
    }

    pub fn sanitize_roles<M>(&self, messages: &[M], model_api: Option<&str>) -> Vec<M>
    where
        M: RoleTagged + Clone,
    {
        self.policy.sanitize(messages, model_api)
    }

    pub fn failover_reason(&self, raw: &str) -> Option<FailoverReason> {
        classify_failover_reason(raw)
    }
}
