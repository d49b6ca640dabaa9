//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML. Every field has a
//! default so the agent runs without a config file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::gateway::length::OverLength;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub nickname: NicknameConfig,
    #[serde(default)]
    pub command: CommandConfig,
    #[serde(default)]
    pub community: CommunityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.nickname.name_prefix.is_empty() {
            anyhow::bail!("nickname.name_prefix must not be empty");
        }
        if self.nickname.idle_nickname.is_empty() {
            anyhow::bail!("nickname.idle_nickname must not be empty");
        }
        if self.nickname.max_length == 0 {
            anyhow::bail!("nickname.max_length must be greater than zero");
        }
        if self.command.prefix.is_empty() || self.command.setmode.is_empty() {
            anyhow::bail!("command.prefix and command.setmode must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicknameConfig {
    /// Name pool file, one nickname per line.
    #[serde(default = "default_pool_path")]
    pub pool_path: PathBuf,
    /// Nickname given to members who leave voice entirely.
    #[serde(default = "default_idle_nickname")]
    pub idle_nickname: String,
    /// Prepended to the display name in name mode.
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default)]
    pub over_length: OverLength,
}

impl Default for NicknameConfig {
    fn default() -> Self {
        Self {
            pool_path: default_pool_path(),
            idle_nickname: default_idle_nickname(),
            name_prefix: default_name_prefix(),
            max_length: default_max_length(),
            over_length: OverLength::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_command_prefix")]
    pub prefix: String,
    #[serde(default = "default_setmode")]
    pub setmode: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            prefix: default_command_prefix(),
            setmode: default_setmode(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// Whether the agent holds the manage-nicknames permission.
    #[serde(default = "default_true")]
    pub manage_nicknames: bool,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            manage_nicknames: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_pool_path() -> PathBuf {
    PathBuf::from("nickname.txt")
}
fn default_idle_nickname() -> String {
    "風吹けば名無し".to_string()
}
fn default_name_prefix() -> String {
    "風吹けば".to_string()
}
fn default_max_length() -> usize {
    32
}
fn default_command_prefix() -> String {
    "!".to_string()
}
fn default_setmode() -> String {
    "setmode".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_filter() -> String {
    "info".to_string()
}
