// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Measures recorded in history.
//!
//! Walks commits newest-first and decodes the measure report stored in each
//! commit's note. Commits without a note, or whose note holds no measures,
//! are skipped. A corrupt note aborts the walk.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::measure::{Measure, parse_measures_csv};
use crate::notes::{CommitRecord, NotesLog, measure_ref};

/// Measures recorded at one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitMeasure {
    pub commit_hash: String,
    pub committer: String,
    pub timestamp: DateTime<Utc>,
    pub measures: Vec<Measure>,
}

/// Lazy walk over the commits that carry measures.
pub struct CommitMeasures<I> {
    records: I,
}

impl<I> CommitMeasures<I>
where
    I: Iterator<Item = Result<CommitRecord>>,
{
    pub fn new(records: I) -> Self {
        Self { records }
    }
}

impl<I> Iterator for CommitMeasures<I>
where
    I: Iterator<Item = Result<CommitRecord>>,
{
    type Item = Result<CommitMeasure>;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            match record.and_then(decode_record) {
                Ok(Some(measure)) => return Some(Ok(measure)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Decode one record; `None` when it carries no measures.
fn decode_record(record: CommitRecord) -> Result<Option<CommitMeasure>> {
    let note = record.note.trim();
    if note.is_empty() {
        return Ok(None);
    }

    let secs: i64 = record.timestamp.trim().parse().map_err(|e| {
        Error::Format(format!(
            "commit {}: invalid timestamp {:?}: {e}",
            record.hash, record.timestamp
        ))
    })?;
    let timestamp = DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        Error::Format(format!(
            "commit {}: timestamp {secs} out of range",
            record.hash
        ))
    })?;

    let measures = parse_measures_csv(note.as_bytes()).map_err(|e| match e {
        Error::Format(msg) => Error::Format(format!("commit {}: {msg}", record.hash)),
        other => other,
    })?;
    if measures.is_empty() {
        tracing::debug!(commit = %record.hash, "note holds no measures, skipping");
        return Ok(None);
    }

    Ok(Some(CommitMeasure {
        commit_hash: record.hash,
        committer: record.author,
        timestamp,
        measures,
    }))
}

/// Start a walk over all commits reachable from HEAD that carry measures.
pub fn commit_measures<L: NotesLog>(log: &L, prefix: &str) -> Result<CommitMeasures<L::Records>> {
    Ok(CommitMeasures::new(log.records(&measure_ref(prefix), "HEAD")?))
}

/// Most recent recorded measures, if any commit has them.
pub fn latest_measures<L: NotesLog>(log: &L, prefix: &str) -> Result<Option<CommitMeasure>> {
    let latest = commit_measures(log, prefix)?.next().transpose()?;
    if let Some(ref found) = latest {
        tracing::info!(
            commit = %found.commit_hash,
            measures = found.measures.len(),
            "found stored baseline"
        );
    }
    Ok(latest)
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
