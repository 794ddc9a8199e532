// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment configuration store.
//!
//! The runtime reads its persisted key/value configuration exactly once,
//! during bootstrap, through the [`ConfigStore`] trait. The default store is
//! a JSON5-or-JSON file (`deployment.json`); a missing file is an empty
//! configuration, a malformed one is an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::env;

/// File name of the deployment configuration.
pub const CONFIG_FILE_NAME: &str = "deployment.json";

/// Whether console output should also be logged to files.
pub const KEY_ENABLE_LOGGING: &str = "deployment.log";
/// Directory receiving log files.
pub const KEY_USER_LOG_DIR: &str = "deployment.user.logdir";
/// Persisted base directory.
pub const KEY_BASE_DIR: &str = "basedir";
/// Proxy mode: 0 none, 1 manual, 2 auto-config, 3 browser.
pub const KEY_PROXY_TYPE: &str = "deployment.proxy.type";
pub const KEY_PROXY_HTTP_HOST: &str = "deployment.proxy.http.host";
pub const KEY_PROXY_HTTP_PORT: &str = "deployment.proxy.http.port";
pub const KEY_PROXY_HTTPS_HOST: &str = "deployment.proxy.https.host";
pub const KEY_PROXY_HTTPS_PORT: &str = "deployment.proxy.https.port";
/// Use the HTTP proxy for every scheme.
pub const KEY_PROXY_SAME: &str = "deployment.proxy.same";
/// Comma separated hosts that never use a proxy.
pub const KEY_PROXY_BYPASS_LIST: &str = "deployment.proxy.bypass.list";
/// Skip the proxy for local addresses.
pub const KEY_PROXY_BYPASS_LOCAL: &str = "deployment.proxy.bypass.local";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Flat key/value deployment settings.
///
/// Values are kept as JSON; typed accessors accept both native JSON values
/// and their string spellings (`"true"`, `"8080"`), since hand-edited files
/// use both.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentConfig {
    values: BTreeMap<String, serde_json::Value>,
}

impl DeploymentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a raw value.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Get a value as a non-empty string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Get a value as bool.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key)? {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => Some(s.trim().eq_ignore_ascii_case("true")),
            _ => None,
        }
    }

    /// Get a value as i64.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Set a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether console output should be copied to log files.
    pub fn logging_enabled(&self) -> bool {
        self.get_bool(KEY_ENABLE_LOGGING).unwrap_or(false)
    }

    /// Configured log directory, if any.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.get_str(KEY_USER_LOG_DIR).map(PathBuf::from)
    }
}

/// Persisted configuration consulted once at bootstrap.
pub trait ConfigStore: Send + Sync {
    /// Load the full configuration.
    fn load(&self) -> Result<DeploymentConfig, ConfigError>;

    /// Persist a single key. Stores that cannot write accept and drop it.
    fn persist(&self, _key: &str, _value: &str) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// JSON5-or-JSON file backed store.
#[derive(Clone, Debug)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Store backed by an explicit file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `deployment.json` in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CONFIG_FILE_NAME))
    }

    /// Resolve the store location.
    ///
    /// # Priority
    ///
    /// 1. `JNLP_CONFIG_DIR`
    /// 2. `$HOME/.netx`
    /// 3. `.netx` relative to the current directory
    pub fn resolve() -> Self {
        let dir = env::config_dir()
            .or_else(|| env::home().map(|home| crate::runtime::paths::default_base_dir(&home)))
            .unwrap_or_else(|| PathBuf::from(crate::runtime::paths::NETX_DIR_NAME));
        Self::in_dir(&dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<DeploymentConfig, ConfigError> {
        if !self.path.exists() {
            return Ok(DeploymentConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        parse_json5_or_json(&content).map_err(|e| ConfigError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        config.set(key, value);
        ensure_parent_exists(&self.path)?;
        let json = serde_json::to_string_pretty(&config)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: parking_lot::Mutex<DeploymentConfig>,
}

impl MemoryConfigStore {
    pub fn new(config: DeploymentConfig) -> Self {
        Self {
            config: parking_lot::Mutex::new(config),
        }
    }

    /// Current contents, including persisted keys.
    pub fn snapshot(&self) -> DeploymentConfig {
        self.config.lock().clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<DeploymentConfig, ConfigError> {
        Ok(self.config.lock().clone())
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.config.lock().set(key, value);
        Ok(())
    }
}

/// Parse content as JSON5, falling back to strict JSON on parse failure.
fn parse_json5_or_json<T: serde::de::DeserializeOwned>(
    content: &str,
) -> Result<T, serde_json::Error> {
    json5::from_str(content).or_else(|_| serde_json::from_str(content))
}

/// Ensure a file's parent directory exists, creating it and ancestors if needed.
fn ensure_parent_exists(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
