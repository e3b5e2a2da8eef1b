// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text output formatter.
//!
//! Check reports print one line per event, then a summary:
//! ```text
//! <name>: FAIL <detail>
//! <name>: EXCUSED <detail>
//! <name>: NEW
//! <name>: IMPROVED <value> (baseline <baseline>)
//! <name>: LOWERED baseline <from> -> <to>
//! PASS: <n> measures checked
//! ```

use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::{csv_field, timestamp};
use crate::color::scheme;
use crate::history::CommitMeasure;
use crate::ratchet::{MeasureEvent, RatchetReport};

/// Column header for history dumps.
pub const DUMP_HEADER: &str = "hash,committer,timestamp,name,value,baseline";

/// Text output formatter with color support.
pub struct TextFormatter<W: WriteColor> {
    out: W,
}

impl TextFormatter<StandardStream> {
    /// Formatter writing to stdout.
    pub fn stdout(color_choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(color_choice))
    }
}

impl<W: WriteColor> TextFormatter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write every comparator event, then the summary line.
    pub fn write_report(&mut self, report: &RatchetReport) -> std::io::Result<()> {
        // Each excused name covers one failure event.
        let mut excused: Vec<&str> = report
            .resolution
            .iter()
            .flat_map(|r| r.excused.iter().map(String::as_str))
            .collect();

        for event in &report.comparison.events {
            let was_excused = event.is_failure()
                && match excused.iter().position(|name| *name == event.name()) {
                    Some(idx) => {
                        excused.remove(idx);
                        true
                    }
                    None => false,
                };
            self.write_event(event, was_excused)?;
        }

        if let Some(resolution) = &report.resolution
            && !resolution.unused.is_empty()
        {
            writeln!(self.out, "unused exclusions: {}", resolution.unused.join(", "))?;
        }

        self.write_summary(report)
    }

    fn write_event(&mut self, event: &MeasureEvent, excused: bool) -> std::io::Result<()> {
        let (label, style, detail) = match event {
            MeasureEvent::Missing { .. } => {
                (fail_label(excused), fail_style(excused), "no computed value".to_string())
            }
            MeasureEvent::Regressed {
                value,
                baseline,
                slack,
                ..
            } => {
                let detail = if *slack == 0 {
                    format!("{value} exceeds baseline {baseline}")
                } else {
                    format!("{value} exceeds baseline {baseline} + slack {slack}")
                };
                (fail_label(excused), fail_style(excused), detail)
            }
            MeasureEvent::New { .. } => ("NEW", scheme::warn(), String::new()),
            MeasureEvent::Improved {
                value, baseline, ..
            } => (
                "IMPROVED",
                scheme::pass(),
                format!("{value} (baseline {baseline})"),
            ),
            MeasureEvent::Clamped { from, to, .. } => (
                "LOWERED",
                scheme::warn(),
                format!("baseline {from} -> {to}"),
            ),
        };

        self.out.set_color(&scheme::measure_name())?;
        write!(self.out, "{}", event.name())?;
        self.out.reset()?;
        write!(self.out, ": ")?;
        self.out.set_color(&style)?;
        write!(self.out, "{label}")?;
        self.out.reset()?;
        if detail.is_empty() {
            writeln!(self.out)
        } else {
            writeln!(self.out, " {detail}")
        }
    }

    /// `PASS` with the measure count, or `FAIL` with the unexcused names.
    pub fn write_summary(&mut self, report: &RatchetReport) -> std::io::Result<()> {
        if report.passed() {
            let count = report.measures().len();
            self.out.set_color(&scheme::pass())?;
            write!(self.out, "PASS")?;
            self.out.reset()?;
            writeln!(
                self.out,
                ": {} measure{} checked",
                count,
                if count == 1 { "" } else { "s" }
            )
        } else {
            let unexcused = match &report.resolution {
                Some(resolution) => &resolution.unexcused,
                None => &report.comparison.failing,
            };
            self.out.set_color(&scheme::fail())?;
            write!(self.out, "FAIL")?;
            self.out.reset()?;
            writeln!(self.out, ": {}", unexcused.join(", "))
        }
    }

    /// Confirmation after a note was written.
    pub fn write_stored(&mut self, what: &str, hash: &str) -> std::io::Result<()> {
        write!(self.out, "{what} on ")?;
        self.out.set_color(&scheme::commit())?;
        write!(self.out, "{hash}")?;
        self.out.reset()?;
        writeln!(self.out)
    }

    /// History as CSV, one row per measure, newest commit first.
    pub fn write_dump(&mut self, history: &[CommitMeasure]) -> std::io::Result<()> {
        writeln!(self.out, "{DUMP_HEADER}")?;
        for entry in history {
            let ts = timestamp(&entry.timestamp);
            for m in &entry.measures {
                writeln!(
                    self.out,
                    "{},{},{},{},{},{}",
                    entry.commit_hash,
                    csv_field(&entry.committer),
                    ts,
                    csv_field(&m.name),
                    m.value,
                    m.baseline
                )?;
            }
        }
        Ok(())
    }
}

fn fail_label(excused: bool) -> &'static str {
    if excused { "EXCUSED" } else { "FAIL" }
}

fn fail_style(excused: bool) -> ColorSpec {
    if excused { scheme::warn() } else { scheme::fail() }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
