// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles ratchet.toml parsing with version validation and unknown key warnings.

pub mod duration;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::gitlog::DEFAULT_TIMEOUT;

/// Config file name looked up by discovery.
pub const CONFIG_FILE: &str = "ratchet.toml";

/// Only supported config version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Known top-level keys.
const KNOWN_KEYS: &[&str] = &["version", "ratchet"];

/// Known keys of the `[ratchet]` table.
const KNOWN_RATCHET_KEYS: &[&str] = &["prefix", "slack", "input", "timeout"];

/// Full configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    #[serde(default)]
    pub ratchet: RatchetConfig,
}

/// Defaults for the ratchet commands; CLI flags override them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RatchetConfig {
    /// Notes namespace separating independent ratchets.
    pub prefix: String,

    /// Tolerance added to baselines.
    pub slack: i64,

    /// Report type: "csv" | "checkstyle".
    pub input: String,

    /// Limit on one history walk; "0s" disables it.
    #[serde(deserialize_with = "duration::deserialize_option")]
    pub timeout: Option<Duration>,
}

impl Default for RatchetConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            slack: 0,
            input: "csv".to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl RatchetConfig {
    /// Watchdog timeout for history walks, `None` when disabled.
    pub fn walk_timeout(&self) -> Option<Duration> {
        self.timeout.filter(|t| !t.is_zero())
    }
}

/// Config with flexible parsing that captures unknown keys.
#[derive(Deserialize)]
struct FlexibleConfig {
    version: Option<i64>,

    #[serde(default)]
    ratchet: Option<toml::Table>,

    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

/// Load and validate config from a file path.
pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse(&content, path)
}

/// Parse config, warning on unknown keys.
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let config_error = |message: String| Error::Config {
        message,
        path: Some(path.to_path_buf()),
    };

    let flexible: FlexibleConfig =
        toml::from_str(content).map_err(|e| config_error(e.to_string()))?;

    let version = flexible
        .version
        .ok_or_else(|| config_error("missing required field: version".to_string()))?;
    if version != SUPPORTED_VERSION {
        return Err(config_error(format!(
            "unsupported config version {} (supported: {})\n  Upgrade git-ratchet to use this config.",
            version, SUPPORTED_VERSION
        )));
    }

    for key in flexible.unknown.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn_unknown_key(path, key);
        }
    }

    let ratchet = match flexible.ratchet {
        Some(table) => {
            let known: toml::Table = table
                .into_iter()
                .filter(|(key, _)| {
                    let known = KNOWN_RATCHET_KEYS.contains(&key.as_str());
                    if !known {
                        warn_unknown_key(path, &format!("ratchet.{key}"));
                    }
                    known
                })
                .collect();
            toml::Value::Table(known)
                .try_into()
                .map_err(|e: toml::de::Error| config_error(e.to_string()))?
        }
        None => RatchetConfig::default(),
    };

    Ok(Config { version, ratchet })
}

fn warn_unknown_key(path: &Path, key: &str) {
    eprintln!(
        "git-ratchet: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
