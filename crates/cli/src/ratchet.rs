// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ratchet enforcement and measure comparison.
//!
//! Stored and computed measure sets are both sorted by name and compared in a
//! single merge-join pass. A computed value may not exceed the stored baseline
//! plus slack, and a stored measure may not disappear. Failures are then
//! matched against recorded exclusions.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::exclusion::{Resolution, read_exclusions, resolve};
use crate::measure::Measure;
use crate::notes::NotesLog;

/// Something the comparator observed about one measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeasureEvent {
    /// Stored measure with no computed value (failure).
    Missing { name: String },
    /// Computed measure not tracked before.
    New { name: String },
    /// Value above baseline plus slack (failure).
    Regressed {
        name: String,
        value: i64,
        baseline: i64,
        slack: i64,
    },
    /// Value below the stored baseline.
    Improved {
        name: String,
        value: i64,
        baseline: i64,
    },
    /// Computed baseline lowered to the stored one.
    Clamped { name: String, from: i64, to: i64 },
}

impl MeasureEvent {
    pub fn name(&self) -> &str {
        match self {
            MeasureEvent::Missing { name }
            | MeasureEvent::New { name }
            | MeasureEvent::Regressed { name, .. }
            | MeasureEvent::Improved { name, .. }
            | MeasureEvent::Clamped { name, .. } => name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            MeasureEvent::Missing { .. } | MeasureEvent::Regressed { .. }
        )
    }
}

/// Result of comparing computed measures against stored ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Computed measures with baselines clamped; the next baseline to store.
    pub measures: Vec<Measure>,
    /// Names of missing or regressed measures, in name order.
    pub failing: Vec<String>,
    pub events: Vec<MeasureEvent>,
}

impl Comparison {
    pub fn passed(&self) -> bool {
        self.failing.is_empty()
    }
}

/// Compare name-sorted `computed` measures against name-sorted `stored` ones.
///
/// Inputs are not re-sorted. Duplicate names are walked as separate
/// sequential entries. The clamp runs on every step of the joint pass, so a
/// computed measure is also lowered when it is paired with a stored entry of
/// a different name.
pub fn compare(stored: &[Measure], mut computed: Vec<Measure>, slack: i64) -> Result<Comparison> {
    if computed.is_empty() {
        return Err(Error::NoComputedMeasures);
    }
    if stored.is_empty() {
        return Err(Error::NoStoredMeasures);
    }

    let mut failing = Vec::new();
    let mut events = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < stored.len() && j < computed.len() {
        let old = &stored[i];
        let current = &mut computed[j];

        // Baselines only ratchet down, against whichever stored entry is current
        if current.baseline > old.baseline {
            events.push(MeasureEvent::Clamped {
                name: current.name.clone(),
                from: current.baseline,
                to: old.baseline,
            });
            current.baseline = old.baseline;
        }

        match old.name.cmp(&current.name) {
            Ordering::Less => {
                failing.push(old.name.clone());
                events.push(MeasureEvent::Missing {
                    name: old.name.clone(),
                });
                i += 1;
            }
            Ordering::Greater => {
                events.push(MeasureEvent::New {
                    name: current.name.clone(),
                });
                j += 1;
            }
            Ordering::Equal => {
                if current.value > old.baseline.saturating_add(slack) {
                    failing.push(current.name.clone());
                    events.push(MeasureEvent::Regressed {
                        name: current.name.clone(),
                        value: current.value,
                        baseline: old.baseline,
                        slack,
                    });
                } else if current.value < old.baseline {
                    events.push(MeasureEvent::Improved {
                        name: current.name.clone(),
                        value: current.value,
                        baseline: old.baseline,
                    });
                }
                i += 1;
                j += 1;
            }
        }
    }

    for old in &stored[i..] {
        failing.push(old.name.clone());
        events.push(MeasureEvent::Missing {
            name: old.name.clone(),
        });
    }

    for current in &computed[j..] {
        events.push(MeasureEvent::New {
            name: current.name.clone(),
        });
    }

    Ok(Comparison {
        measures: computed,
        failing,
        events,
    })
}

/// Comparison plus, when anything failed, its exclusion resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatchetReport {
    pub comparison: Comparison,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

impl RatchetReport {
    pub fn passed(&self) -> bool {
        self.resolution.as_ref().map_or(self.comparison.passed(), Resolution::passed)
    }

    /// `Err(MeasuresFailing)` when a failure is left unexcused.
    pub fn verdict(&self) -> Result<()> {
        match &self.resolution {
            Some(resolution) => resolution.verdict(),
            None if self.comparison.passed() => Ok(()),
            None => Err(Error::MeasuresFailing {
                unexcused: self.comparison.failing.clone(),
            }),
        }
    }

    /// Adjusted computed measures, suitable as the next stored baseline.
    pub fn measures(&self) -> &[Measure] {
        &self.comparison.measures
    }
}

/// Compare measures and resolve any failures against the exclusions recorded
/// since `hash` (the commit the stored measures came from).
pub fn compare_measures<L: NotesLog>(
    log: &L,
    prefix: &str,
    hash: &str,
    stored: &[Measure],
    computed: Vec<Measure>,
    slack: i64,
) -> Result<RatchetReport> {
    let comparison = compare(stored, computed, slack)?;

    let resolution = if comparison.passed() {
        None
    } else {
        tracing::info!(failing = ?comparison.failing, "checking for exclusions");
        let exclusions = read_exclusions(log, prefix, hash)?;
        tracing::info!(total = exclusions.len(), "exclusions found");
        Some(resolve(&exclusions, &comparison.failing))
    };

    Ok(RatchetReport {
        comparison,
        resolution,
    })
}

#[cfg(test)]
#[path = "ratchet_tests.rs"]
mod tests;
