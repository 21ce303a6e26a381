//! Configuration (layered: defaults < TOML file < environment).

use std::fs;
use std::path::{Path, PathBuf};

use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classify::{DEFAULT_MAX_ERROR_CHARS, DEFAULT_RESET_COMMAND};
use crate::error::{Result, TurnguardError};

/// Path of a TOML config file to load instead of the platform default.
pub const CONFIG_PATH_ENV: &str = "TURNGUARD_CONFIG";
/// Overrides [`GuardConfig::reset_command`].
pub const RESET_COMMAND_ENV: &str = "TURNGUARD_RESET_COMMAND";
/// Overrides [`GuardConfig::max_error_chars`].
pub const MAX_ERROR_CHARS_ENV: &str = "TURNGUARD_MAX_ERROR_CHARS";

/// Settings for the classifier and role sanitizer.
///
/// ```
/// use turnguard::config::GuardConfig;
///
/// let config = GuardConfig::builder().reset_command("/reset").build();
/// assert_eq!(config.max_error_chars, 600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Command suggested to start a new conversation.
    #[builder(into, default = DEFAULT_RESET_COMMAND.to_string())]
    pub reset_command: String,
    /// Passthrough error text longer than this is truncated.
    #[builder(default = DEFAULT_MAX_ERROR_CHARS)]
    pub max_error_chars: usize,
    /// Overrides and additions to the built-in role policy table.
    #[builder(default)]
    pub role_policies: Vec<RolePolicyEntry>,
}

/// One `[[role_policies]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePolicyEntry {
    /// Family tag; `anthropic` and `google` override the built-ins.
    pub family: String,
    /// Model-API id prefixes; defaults to the family tag for new families.
    #[serde(default)]
    pub markers: Vec<String>,
    pub allowed_roles: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            reset_command: DEFAULT_RESET_COMMAND.to_string(),
            max_error_chars: DEFAULT_MAX_ERROR_CHARS,
            role_policies: Vec::new(),
        }
    }
}

impl GuardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|err| TurnguardError::Configuration(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| TurnguardError::io(path, err))?;
        let config: Self = toml::from_str(&raw).map_err(|err| TurnguardError::toml(path, err))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`GuardConfig::load`], but a missing file yields `None`.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(TurnguardError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Platform config location, e.g. `~/.config/turnguard/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "turnguard")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `.env`, the config file, and environment overrides.
    ///
    /// The file named by `TURNGUARD_CONFIG` must exist; the platform
    /// default is optional.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim())?,
            _ => match Self::default_path() {
                Some(path) => Self::load_optional(path)?.unwrap_or_default(),
                None => Self::default(),
            },
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(command) = std::env::var(RESET_COMMAND_ENV) {
            let command = command.trim();
            if command.is_empty() {
                warn!(var = RESET_COMMAND_ENV, "ignoring empty reset command override");
            } else {
                self.reset_command = command.to_string();
            }
        }

        if let Ok(raw) = std::env::var(MAX_ERROR_CHARS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => self.max_error_chars = limit,
                _ => warn!(
                    var = MAX_ERROR_CHARS_ENV,
                    value = %raw,
                    "ignoring invalid error length override"
                ),
            }
        }
    }

    /// Reject settings that would produce unusable output.
    pub fn validate(&self) -> Result<()> {
        if self.reset_command.trim().is_empty() {
            return Err(TurnguardError::invalid_value("reset_command", ""));
        }
        if self.max_error_chars == 0 {
            return Err(TurnguardError::invalid_value("max_error_chars", "0"));
        }
        for entry in &self.role_policies {
            if entry.family.trim().is_empty() {
                return Err(TurnguardError::invalid_value("role_policies.family", ""));
            }
            if entry.allowed_roles.iter().any(|role| role.trim().is_empty()) {
                return Err(TurnguardError::invalid_value(
                    format!("role_policies.{}.allowed_roles", entry.family),
                    "",
                ));
            }
        }
        Ok(())
    }
}
