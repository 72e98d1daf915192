use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::usage::limits::{default_rules, DEFAULT_CONTEXT_LIMIT};
use crate::usage::{
    ContextLimitRule, ContextLimits, ScanOptions, SessionLayout, DEFAULT_LOOKBACK_HOURS,
    DEFAULT_SESSION_LIMIT,
};

const APP_NAME: &str = "agentmeter";
const CONFIG_NAME: &str = "config";

/// Persistent configuration, stored as TOML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding one subdirectory per agent. Auto-detected when unset.
    pub agents_dir: Option<String>,
    pub default_context_limit: u64,
    pub server: ServerConfig,
    pub sessions: SessionsConfig,
    /// Checked in order; the first pattern found in the model name wins
    pub context_limits: Vec<ContextLimitRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionsConfig {
    /// Serve `/api/sessions`; off gives the usage-only server
    pub enabled: bool,
    pub limit: usize,
    pub lookback_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agents_dir: None,
            default_context_limit: DEFAULT_CONTEXT_LIMIT,
            server: ServerConfig::default(),
            sessions: SessionsConfig::default(),
            context_limits: default_rules(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 7890,
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: DEFAULT_SESSION_LIMIT,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }
}

impl Config {
    /// Build scan options rooted at an already resolved agents directory
    pub fn scan_options(&self, agents_dir: PathBuf) -> ScanOptions {
        ScanOptions {
            agents_dir,
            layout: SessionLayout::default(),
            lookback: chrono::Duration::hours(self.sessions.lookback_hours.max(1)),
            session_limit: self.sessions.limit,
            context_limits: ContextLimits::new(
                self.context_limits.clone(),
                self.default_context_limit,
            ),
        }
    }
}

/// Load configuration from `path`, or from the platform config dir.
/// A missing file is created with defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config: Config = match path {
        Some(path) => confy::load_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => confy::load(APP_NAME, CONFIG_NAME).context("Failed to load config")?,
    };
    Ok(config)
}

/// Where the config file lives
pub fn config_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
            .context("Failed to resolve config path"),
    }
}
