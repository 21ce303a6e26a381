//! Conversation message types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Anything carrying an optional conversation role.
///
/// `None` means the role is absent or undefined; such messages always
/// survive role filtering.
pub trait RoleTagged {
    fn role(&self) -> Option<&str>;
}

/// A message from the agent runner's conversation state.
///
/// Only `role` is interpreted. Every other field is kept verbatim, in its
/// original order, and serialized back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ConversationMessage {
    /// Create a message with a role and string content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self::without_role(content).with_role(role)
    }

    /// Create a message with no role field.
    pub fn without_role(content: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("content".to_string(), Value::String(content.into()));
        Self { role: None, fields }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Attach an extra field, replacing any previous value under `key`.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// The `content` field when it is a plain string.
    pub fn content_text(&self) -> Option<&str> {
        self.fields.get("content").and_then(Value::as_str)
    }
}

impl RoleTagged for ConversationMessage {
    fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

impl RoleTagged for Value {
    fn role(&self) -> Option<&str> {
        self.get("role").and_then(Value::as_str)
    }
}

impl<T: RoleTagged + ?Sized> RoleTagged for &T {
    fn role(&self) -> Option<&str> {
        (**self).role()
    }
}
