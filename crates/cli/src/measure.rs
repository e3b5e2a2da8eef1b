// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Measure reports and their parsers.
//!
//! Two report types are understood:
//! - CSV: one `name,value[,baseline]` record per measure, with optional
//!   quoting
//! - Checkstyle XML: every `<error>` element is counted into a single
//!   `errors` measure
//!
//! Parsed measure sets are always sorted by name. The ratchet merge-joins
//! rely on that order.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::csv_field;

/// Name of the synthetic measure produced from checkstyle reports.
pub const CHECKSTYLE_MEASURE: &str = "errors";

/// Element counted in checkstyle reports.
const CHECKSTYLE_ELEMENT: &[u8] = b"error";

/// One tracked quality metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Measure {
    pub name: String,
    pub value: i64,
    /// Ceiling the value is judged against.
    pub baseline: i64,
}

impl Measure {
    pub fn new(name: impl Into<String>, value: i64, baseline: i64) -> Self {
        Self {
            name: name.into(),
            value,
            baseline,
        }
    }
}

/// Report type selecting the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Csv,
    Checkstyle,
    Unknown,
}

impl InputType {
    /// Map a report type name to its tag. Unrecognized names become `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "csv" => InputType::Csv,
            "checkstyle" => InputType::Checkstyle,
            _ => InputType::Unknown,
        }
    }
}

/// Parse a raw report into a name-sorted measure set.
pub fn parse_measures<R: BufRead>(reader: R, input: InputType) -> Result<Vec<Measure>> {
    match input {
        InputType::Csv => parse_measures_csv(reader),
        InputType::Checkstyle => parse_measures_checkstyle(reader),
        InputType::Unknown => Err(Error::UnsupportedInput("unknown".to_string())),
    }
}

/// Parse `name,value[,baseline]` rows.
///
/// Blank rows are skipped. A missing baseline defaults to the value.
/// Duplicate names are kept as separate entries. Fields may be quoted:
/// a quoted field can hold commas, newlines and doubled `""` quotes.
pub fn parse_measures_csv<R: BufRead>(reader: R) -> Result<Vec<Measure>> {
    let mut measures = Vec::new();
    let mut record = String::new();
    let mut lineno = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::Io {
            path: PathBuf::from("<report>"),
            source: e,
        })?;
        if record.is_empty() {
            if line.trim().is_empty() {
                continue;
            }
            lineno = idx + 1;
        } else {
            record.push('\n');
        }
        record.push_str(&line);

        // An open quote continues the record on the next line
        if let Some(fields) = split_record(lineno, &record)? {
            measures.push(parse_row(lineno, &record, &fields)?);
            record.clear();
        }
    }

    if !record.is_empty() {
        return Err(Error::Format(format!(
            "line {lineno}: unterminated quoted field"
        )));
    }

    // Stable sort keeps duplicates in report order
    measures.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(measures)
}

/// Split one record into fields, or `None` while a quoted field is open.
///
/// Unquoted fields are trimmed. Quoted fields are kept verbatim.
fn split_record(lineno: usize, record: &str) -> Result<Option<Vec<String>>> {
    let mut fields = Vec::new();
    let mut rest = record;

    loop {
        if let Some(quoted) = rest.trim_start().strip_prefix('"') {
            let mut field = String::new();
            let mut chars = quoted.char_indices();
            let tail = loop {
                match chars.next() {
                    None => return Ok(None),
                    Some((i, '"')) if quoted[i + 1..].starts_with('"') => {
                        field.push('"');
                        chars.next();
                    }
                    Some((i, '"')) => break quoted[i + 1..].trim_start(),
                    Some((_, c)) => field.push(c),
                }
            };
            fields.push(field);

            match tail.strip_prefix(',') {
                Some(next) => rest = next,
                None if tail.is_empty() => return Ok(Some(fields)),
                None => {
                    return Err(Error::Format(format!(
                        "line {lineno}: unexpected {tail:?} after quoted field"
                    )));
                }
            }
        } else {
            let (field, next) = match rest.split_once(',') {
                Some((field, next)) => (field, Some(next)),
                None => (rest, None),
            };
            if field.contains('"') {
                return Err(Error::Format(format!(
                    "line {lineno}: bare quote in unquoted field {field:?}"
                )));
            }
            fields.push(field.trim().to_string());

            match next {
                Some(next) => rest = next,
                None => return Ok(Some(fields)),
            }
        }
    }
}

fn parse_row(lineno: usize, record: &str, fields: &[String]) -> Result<Measure> {
    let [name, value, rest @ ..] = fields else {
        return Err(Error::Format(format!(
            "line {lineno}: badly formatted measure {record:?} (expected name,value[,baseline])"
        )));
    };

    let value = parse_int(lineno, "value", value)?;
    let baseline = match rest.first() {
        Some(field) => parse_int(lineno, "baseline", field)?,
        None => value,
    };

    Ok(Measure::new(name.as_str(), value, baseline))
}

fn parse_int(lineno: usize, what: &str, field: &str) -> Result<i64> {
    field
        .parse()
        .map_err(|e| Error::Format(format!("line {lineno}: invalid {what} {field:?}: {e}")))
}

/// Count `<error>` elements anywhere in a checkstyle document.
///
/// Malformed markup is an error rather than a truncated count, including
/// elements left open at the end of input.
pub fn parse_measures_checkstyle<R: BufRead>(reader: R) -> Result<Vec<Measure>> {
    let mut xml = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut errors = 0i64;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                if e.local_name().as_ref() == CHECKSTYLE_ELEMENT {
                    errors += 1;
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == CHECKSTYLE_ELEMENT {
                    errors += 1;
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::Format(format!(
                        "checkstyle: unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    ))
                })?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::Format(format!("checkstyle: {e}"))),
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(Error::Format(format!(
            "checkstyle: {depth} element(s) left open at end of report"
        )));
    }

    Ok(vec![Measure::new(CHECKSTYLE_MEASURE, errors, errors)])
}

/// Read a report of type `input` from `path`, or from stdin when `None`.
pub fn read_report(path: Option<&Path>, input: &str) -> Result<Vec<Measure>> {
    let input_type = InputType::from_name(input);
    if input_type == InputType::Unknown {
        return Err(Error::UnsupportedInput(input.to_string()));
    }

    match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| Error::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            parse_measures(BufReader::new(file), input_type)
        }
        None => parse_measures(std::io::stdin().lock(), input_type),
    }
}

/// Render measures in the stored `name,value,baseline` form.
///
/// Names are quoted when needed so the note reads back unchanged.
pub fn format_measures(measures: &[Measure]) -> String {
    let mut out = String::new();
    for m in measures {
        let _ = writeln!(out, "{},{},{}", csv_field(&m.name), m.value, m.baseline);
    }
    out
}

#[cfg(test)]
#[path = "measure_tests.rs"]
mod tests;
