//! Error types for turnguard.
//!
//! Classification and role filtering are total and never fail; only
//! configuration loading produces a [`TurnguardError`].

pub mod unified;

pub use unified::{ErrorCategory, FailoverReason};

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for fallible turnguard operations.
#[derive(Error, Debug)]
pub enum TurnguardError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl TurnguardError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Toml {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TurnguardError>;
