// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Commit notes as a record source.
//!
//! Measures and exclusions live in git notes under per-prefix refs. Readers
//! only need a stream of `(hash, author, timestamp, note)` records in commit
//! order, so the source is a trait: [`crate::gitlog::GitLog`] streams it from
//! `git log`, [`MemoryLog`] serves fixtures.

use std::collections::HashMap;

use crate::error::Result;

/// Notes ref holding measure reports.
pub fn measure_ref(prefix: &str) -> String {
    format!("git-ratchet-1-{prefix}")
}

/// Notes ref holding exclusions.
pub fn exclusion_ref(prefix: &str) -> String {
    format!("git-ratchet-excuse-1-{prefix}")
}

/// Fully qualified form of a notes ref name.
pub fn qualified(notes_ref: &str) -> String {
    format!("refs/notes/{notes_ref}")
}

/// One commit with the note attached under a given ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    /// `Name <email>` of the author.
    pub author: String,
    /// Unix seconds, undecoded.
    pub timestamp: String,
    /// Note text; empty when the commit has no note.
    pub note: String,
}

impl CommitRecord {
    pub fn new(
        hash: impl Into<String>,
        author: impl Into<String>,
        timestamp: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            author: author.into(),
            timestamp: timestamp.into(),
            note: note.into(),
        }
    }
}

/// Source of commit records, newest first.
pub trait NotesLog {
    type Records: Iterator<Item = Result<CommitRecord>>;

    /// Start a fresh walk of `range` reading notes from `notes_ref`.
    ///
    /// Dropping the returned iterator before it is exhausted must release
    /// any underlying resources.
    fn records(&self, notes_ref: &str, range: &str) -> Result<Self::Records>;
}

impl<L: NotesLog + ?Sized> NotesLog for &L {
    type Records = L::Records;

    fn records(&self, notes_ref: &str, range: &str) -> Result<Self::Records> {
        (**self).records(notes_ref, range)
    }
}

/// In-memory notes log.
///
/// Records are kept per notes ref in the order given. The revision range is
/// ignored: every record registered for a ref is returned.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    refs: HashMap<String, Vec<CommitRecord>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register records (newest first) under a notes ref.
    pub fn with_records(
        mut self,
        notes_ref: impl Into<String>,
        records: impl IntoIterator<Item = CommitRecord>,
    ) -> Self {
        self.refs
            .entry(notes_ref.into())
            .or_default()
            .extend(records);
        self
    }
}

impl NotesLog for MemoryLog {
    type Records = std::vec::IntoIter<Result<CommitRecord>>;

    fn records(&self, notes_ref: &str, _range: &str) -> Result<Self::Records> {
        let records: Vec<Result<CommitRecord>> = self
            .refs
            .get(notes_ref)
            .into_iter()
            .flatten()
            .cloned()
            .map(Ok)
            .collect();
        Ok(records.into_iter())
    }
}

#[cfg(test)]
#[path = "notes_tests.rs"]
mod tests;
