// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Quality ratchet backed by git notes.
//!
//! Measures are recorded as notes on commits. A check compares freshly
//! computed measures against the most recent recorded set and fails when one
//! got worse, unless a later commit carries an exclusion for it.

pub mod cli;
pub mod color;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exclusion;
pub mod git;
pub mod gitlog;
pub mod history;
pub mod measure;
pub mod notes;
pub mod output;
pub mod ratchet;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{Error, ExitCode, Result};
pub use exclusion::{Exclusion, Resolution, read_exclusions, resolve};
pub use history::{CommitMeasure, commit_measures, latest_measures};
pub use measure::{InputType, Measure, parse_measures};
pub use notes::{CommitRecord, MemoryLog, NotesLog};
pub use ratchet::{Comparison, MeasureEvent, RatchetReport, compare, compare_measures};

#[cfg(test)]
pub mod test_utils;
