//! Shared test helpers.
#![allow(dead_code)]

use turnguard::types::{AssistantTurn, ConversationMessage, RoleTagged};

/// A message with a role and string content.
pub fn message(role: &str, content: &str) -> ConversationMessage {
    ConversationMessage::new(role, content)
}

/// One message per role, content numbered from 1.
pub fn messages_with_roles(roles: &[&str]) -> Vec<ConversationMessage> {
    roles
        .iter()
        .enumerate()
        .map(|(idx, role)| message(role, &(idx + 1).to_string()))
        .collect()
}

pub fn roles_of<M: RoleTagged>(messages: &[M]) -> Vec<Option<String>> {
    messages
        .iter()
        .map(|m| m.role().map(str::to_string))
        .collect()
}

pub fn some_roles(roles: &[&str]) -> Vec<Option<String>> {
    roles.iter().map(|r| Some((*r).to_string())).collect()
}

/// A failed assistant turn carrying `raw` as its error text.
pub fn failed_turn(raw: &str) -> AssistantTurn {
    AssistantTurn::failed(raw)
}
