// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Config file discovery.
//!
//! Walks from the current directory up to the git root looking for ratchet.toml.

use std::path::{Path, PathBuf};

use crate::config::{self, CONFIG_FILE, Config};
use crate::error::{Error, Result};

/// Find ratchet.toml starting from `start_dir` and walking up to git root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.is_file() {
            return Some(config_path);
        }

        // Stop at git root
        if current.join(".git").exists() {
            return None;
        }

        current = current.parent()?;
    }
}

/// Resolve config path from CLI arg, env var, or discovery.
///
/// Priority:
/// 1. CLI flag `-C`/`--config` (handled by clap with env = "RATCHET_CONFIG")
/// 2. Discovery from current directory up to git root
/// 3. None (use defaults)
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.exists() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(Error::Config {
            message: format!("config file not found: {}", path.display()),
            path: Some(path.to_path_buf()),
        }),
        None => Ok(find_config(cwd)),
    }
}

/// Load the resolved config, or defaults when there is none.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    match resolve_config(explicit, cwd)? {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            config::load(&path)
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
