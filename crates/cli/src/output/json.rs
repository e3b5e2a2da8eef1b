// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON output formatter.
//!
//! JSON is buffered and written at the end (not streamed).

use std::io::Write;

use chrono::Utc;
use serde::Serialize;

use crate::exclusion::Resolution;
use crate::history::CommitMeasure;
use crate::measure::Measure;
use crate::ratchet::{MeasureEvent, RatchetReport};

/// Check result document.
#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    timestamp: String,
    passed: bool,
    measures: &'a [Measure],
    failing: &'a [String],
    events: &'a [MeasureEvent],
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<&'a Resolution>,
}

impl<'a> From<&'a RatchetReport> for CheckOutput<'a> {
    fn from(report: &'a RatchetReport) -> Self {
        Self {
            timestamp: super::timestamp(&Utc::now()),
            passed: report.passed(),
            measures: report.measures(),
            failing: &report.comparison.failing,
            events: &report.comparison.events,
            resolution: report.resolution.as_ref(),
        }
    }
}

/// JSON output formatter.
pub struct JsonFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a check result.
    pub fn write_report(&mut self, report: &RatchetReport) -> std::io::Result<()> {
        self.write_value(&CheckOutput::from(report))
    }

    /// Write recorded history as an array, newest commit first.
    pub fn write_dump(&mut self, history: &[CommitMeasure]) -> std::io::Result<()> {
        self.write_value(&history)
    }

    fn write_value<T: Serialize>(&mut self, value: &T) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{}", json)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
