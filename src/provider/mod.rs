//! Provider API families and their message-role constraints.

pub mod sanitize;

pub use sanitize::{sanitize_roles, FamilyPolicy, RolePolicy};

use std::fmt;

/// A group of model APIs sharing the same role-support constraints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    /// Anthropic Messages API and its variants.
    Anthropic,
    /// Google Gemini APIs, including preview and versioned surfaces.
    Google,
    /// A family added through configuration.
    Custom(String),
}

impl ApiFamily {
    /// Canonical family tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Custom(name) => name,
        }
    }

    /// Parse a family tag, keeping unknown tags as [`ApiFamily::Custom`].
    pub fn parse(raw: &str) -> Self {
        let tag = raw.trim().to_ascii_lowercase();
        match tag.as_str() {
            "anthropic" | "claude" => Self::Anthropic,
            "google" | "gemini" => Self::Google,
            _ => Self::Custom(tag),
        }
    }

    /// Model-API id prefixes that resolve to this family by default.
    pub fn default_markers(&self) -> Vec<String> {
        match self {
            Self::Anthropic => vec!["anthropic".to_string()],
            Self::Google => vec!["google".to_string(), "gemini".to_string()],
            Self::Custom(name) => vec![name.clone()],
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
