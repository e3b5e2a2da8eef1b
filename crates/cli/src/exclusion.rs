// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusions: recorded waivers for failing measures.
//!
//! An exclusion note holds one JSON object per line:
//!
//! ```text
//! {"measure": ["errors", "warnings"]}
//! ```
//!
//! Exclusions are collected over `<hash>^1..HEAD`, so one recorded at a
//! merge also covers the commits it brings in.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::notes::{NotesLog, exclusion_ref};

/// Measures excused at one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    #[serde(default)]
    pub measure: Vec<String>,
}

impl Exclusion {
    pub fn new(measures: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            measure: measures.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decode one exclusion note line.
pub fn parse_exclusion(line: &str) -> Result<Exclusion> {
    let line = line.trim().trim_matches('\'');
    serde_json::from_str(line).map_err(|source| Error::ExclusionDecode {
        line: line.to_string(),
        source,
    })
}

/// Sorted names excused anywhere in `<hash>^1..HEAD`.
///
/// Duplicates are kept. Any undecodable line aborts the read.
pub fn read_exclusions<L: NotesLog>(log: &L, prefix: &str, hash: &str) -> Result<Vec<String>> {
    let range = format!("{hash}^1..HEAD");
    let mut names = Vec::new();

    for record in log.records(&exclusion_ref(prefix), &range)? {
        let record = record?;
        for line in record.note.lines() {
            if line.trim().trim_matches('\'').is_empty() {
                continue;
            }
            let exclusion = parse_exclusion(line)?;
            tracing::debug!(commit = %record.hash, measures = ?exclusion.measure, "exclusion");
            names.extend(exclusion.measure);
        }
    }

    names.sort();
    Ok(names)
}

/// Outcome of matching failing measures against exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Failing measures covered by an exclusion.
    pub excused: Vec<String>,
    /// Exclusions that matched nothing this run.
    pub unused: Vec<String>,
    /// Failing measures with no exclusion.
    pub unexcused: Vec<String>,
}

impl Resolution {
    pub fn passed(&self) -> bool {
        self.unexcused.is_empty()
    }

    /// `Ok` only when every failing measure was excused.
    pub fn verdict(&self) -> Result<()> {
        if self.passed() {
            Ok(())
        } else {
            Err(Error::MeasuresFailing {
                unexcused: self.unexcused.clone(),
            })
        }
    }
}

/// Merge-join sorted `failing` names against sorted `exclusions`.
pub fn resolve(exclusions: &[String], failing: &[String]) -> Resolution {
    let mut resolution = Resolution::default();
    let (mut i, mut j) = (0, 0);

    while i < exclusions.len() && j < failing.len() {
        let (ex, fail) = (&exclusions[i], &failing[j]);
        if ex < fail {
            resolution.unused.push(ex.clone());
            i += 1;
        } else if fail < ex {
            resolution.unexcused.push(fail.clone());
            j += 1;
        } else {
            resolution.excused.push(fail.clone());
            i += 1;
            j += 1;
        }
    }

    resolution.unused.extend_from_slice(&exclusions[i..]);
    resolution.unexcused.extend_from_slice(&failing[j..]);
    resolution
}

#[cfg(test)]
#[path = "exclusion_tests.rs"]
mod tests;
