//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.skillsbank/config.json`) and environment.
//! Environment values win over the file for credentials.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::credentials::{Credentials, DEFAULT_API_URL};

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Skills Bank API credentials.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// When true, a failing item yields `{"error": ...}` and the remaining items still run.
    #[serde(default)]
    pub continue_on_fail: bool,
}

/// Credentials as stored on disk. Both fields are optional; see [`resolve_credentials`].
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsConfig {
    /// Base URL of the API. Overridden by SKILLSBANK_API_URL env.
    pub api_url: Option<String>,
    /// API key from the Skills Bank profile page. Overridden by SKILLSBANK_API_KEY env.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Config written by `init`: production URL, empty key.
    pub fn initial() -> Self {
        Self {
            credentials: CredentialsConfig {
                api_url: Some(DEFAULT_API_URL.to_string()),
                api_key: Some(String::new()),
            },
            continue_on_fail: false,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn env_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok().as_deref())
}

/// Resolve credentials: env SKILLSBANK_API_URL / SKILLSBANK_API_KEY override config.
pub fn resolve_credentials(config: &Config) -> Credentials {
    merge_credentials(
        &config.credentials,
        env_var("SKILLSBANK_API_URL"),
        env_var("SKILLSBANK_API_KEY"),
    )
}

/// Overrides win when set; missing URL falls back to the production API, missing key to empty.
pub fn merge_credentials(
    stored: &CredentialsConfig,
    api_url: Option<String>,
    api_key: Option<String>,
) -> Credentials {
    let api_url = api_url
        .or_else(|| non_empty(stored.api_url.as_deref()))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_key = api_key
        .or_else(|| non_empty(stored.api_key.as_deref()))
        .unwrap_or_default();
    if api_key.is_empty() {
        log::warn!("no Skills Bank API key configured; requests will be rejected");
    }
    Credentials::new(api_url, api_key)
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("SKILLSBANK_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".skillsbank").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, or the default (SKILLSBANK_CONFIG_PATH or ~/.skillsbank/config.json).
/// Missing file => default config. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
