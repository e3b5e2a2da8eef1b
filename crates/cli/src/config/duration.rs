// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Duration strings for the history walk timeout.
//!
//! Accepts `"30s"`, `"1.5s"`, `"500ms"` and `"2m"`.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Parse a duration string into a Duration.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let invalid = || format!("invalid duration: {s}");

    // Milliseconds before seconds: "ms" also ends in 's'
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_millis(n));
    }

    if let Some(secs) = s.strip_suffix('s') {
        let n: f64 = secs.trim().parse().map_err(|_| invalid())?;
        if !n.is_finite() || n < 0.0 {
            return Err(invalid());
        }
        return Ok(Duration::from_secs_f64(n));
    }

    if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_secs(n.saturating_mul(60)));
    }

    Err(format!(
        "invalid duration format: {s} (use 30s, 500ms, or 1m)"
    ))
}

/// Deserialize an optional duration string.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| parse_duration(&s).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
