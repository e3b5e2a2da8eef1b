// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Git repository access for writing ratchet notes.
//!
//! Uses git2 (libgit2) for revision lookup and note writes. History walks go
//! through [`crate::gitlog`] instead, which streams from `git log`.

use std::path::Path;

use git2::{ErrorCode, Oid, Repository, Signature};

use crate::error::{Error, Result};
use crate::exclusion::Exclusion;
use crate::measure::{Measure, format_measures};
use crate::notes::{exclusion_ref, measure_ref, qualified};

/// Fallback identity when the repository has none configured.
const FALLBACK_NAME: &str = "git-ratchet";
const FALLBACK_EMAIL: &str = "git-ratchet@localhost";

/// An opened repository.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open the repository containing `path`.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(Self { repo })
    }

    /// Working tree root (or the git dir for bare repositories).
    pub fn root(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Resolve a revision to the full hash of its commit.
    pub fn resolve(&self, rev: &str) -> Result<String> {
        Ok(self.commit_id(rev)?.to_string())
    }

    fn commit_id(&self, rev: &str) -> Result<Oid> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        Ok(commit.id())
    }

    fn signature(&self) -> Result<Signature<'static>> {
        self.repo
            .signature()
            .or_else(|_| Signature::now(FALLBACK_NAME, FALLBACK_EMAIL))
            .map_err(Error::from)
    }

    /// Note text under `notes_ref` (short name) on `rev`, if any.
    pub fn read_note(&self, notes_ref: &str, rev: &str) -> Result<Option<String>> {
        let oid = self.commit_id(rev)?;
        match self.repo.find_note(Some(&qualified(notes_ref)), oid) {
            Ok(note) => Ok(Some(note.message().unwrap_or_default().to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_note(&self, notes_ref: &str, oid: Oid, text: &str) -> Result<()> {
        let sig = self.signature()?;
        self.repo
            .note(&sig, &sig, Some(&qualified(notes_ref)), oid, text, true)?;
        Ok(())
    }

    /// Record `measures` on `rev`, replacing any earlier measure note.
    ///
    /// Returns the full hash of the annotated commit.
    pub fn write_measures(&self, prefix: &str, rev: &str, measures: &[Measure]) -> Result<String> {
        let oid = self.commit_id(rev)?;
        self.write_note(&measure_ref(prefix), oid, &format_measures(measures))?;
        tracing::info!(commit = %oid, count = measures.len(), "stored measures");
        Ok(oid.to_string())
    }

    /// Append one exclusion line to the exclusion note on `rev`.
    ///
    /// Returns the full hash of the annotated commit.
    pub fn append_exclusion(&self, prefix: &str, rev: &str, exclusion: &Exclusion) -> Result<String> {
        let line = serde_json::to_string(exclusion)
            .map_err(|e| Error::Internal(format!("failed to encode exclusion: {e}")))?;
        let notes_ref = exclusion_ref(prefix);
        let oid = self.commit_id(rev)?;

        let text = match self.read_note(&notes_ref, rev)? {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{}\n{line}\n", existing.trim_end())
            }
            _ => format!("{line}\n"),
        };

        self.write_note(&notes_ref, oid, &text)?;
        tracing::info!(commit = %oid, measures = ?exclusion.measure, "recorded exclusion");
        Ok(oid.to_string())
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
