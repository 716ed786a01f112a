use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::engine::outcome::Outcome;

const ENV_FILE: &str = ".env";

/// Overrides `[api] base_url` when set.
pub const API_URL_ENV: &str = "ORACLENET_API_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub value_bets: ValueBetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_request_timeout() -> u64 { 10_000 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_interval")]
    pub interval_s: u64,
}

fn default_refresh_interval() -> u64 { 300 }

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_s: default_refresh_interval() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValueBetConfig {
    /// Minimum edge, exclusive.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Bookmaker whose prices define implied probability. Never substituted.
    #[serde(default = "default_reference_bookmaker")]
    pub reference_bookmaker: String,
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    #[serde(default = "default_outcomes")]
    pub outcomes: Vec<Outcome>,
}

fn default_threshold() -> f64 { 0.05 }
fn default_reference_bookmaker() -> String {
    "hollywoodbets".to_string()
}
fn default_display_limit() -> usize { 4 }
fn default_outcomes() -> Vec<Outcome> {
    Outcome::ALL.to_vec()
}

impl Default for ValueBetConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            reference_bookmaker: default_reference_bookmaker(),
            display_limit: default_display_limit(),
            outcomes: default_outcomes(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
    /// `EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_file() -> String {
    "oraclenet.log".to_string()
}
fn default_log_filter() -> String {
    "oraclenet=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        if config.refresh.interval_s == 0 {
            anyhow::bail!("refresh.interval_s must be greater than zero");
        }
        if config.value_bets.display_limit == 0 {
            anyhow::bail!("value_bets.display_limit must be greater than zero");
        }
        Ok(config)
    }

    /// Like `load`, but a missing file means built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Backend base URL: `ORACLENET_API_URL` if set and non-empty, else the config value.
    pub fn api_base_url(&self) -> String {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.api.base_url.clone(),
        }
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let content = match std::fs::read_to_string(Path::new(ENV_FILE)) {
            Ok(c) => c,
            Err(_) => return,
        };
        for (key, value) in parse_env_lines(&content) {
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

/// KEY=VALUE pairs from .env content; comments, blanks and quotes stripped.
fn parse_env_lines(content: &str) -> Vec<(&str, &str)> {
    // Strip BOM if present (common on Windows-created files)
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .map(|line| line.trim().trim_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim().trim_matches('"').trim_matches('\'')))
        .collect()
}
