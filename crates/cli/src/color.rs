// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Color detection and terminal styling.
//!
//! Detection logic:
//! 1. `--no-color` flag or NO_COLOR env var → no color
//! 2. `--color` flag or COLOR env var → color
//! 3. default:
//!    - If not stdout.is_tty() → no color
//!    - If CI env var set → no color
//!    - Else → use color

use std::io::IsTerminal;

use termcolor::ColorChoice;

/// Resolve color choice from CLI flags and environment variables.
///
/// Priority: flags > NO_COLOR > COLOR > auto-detect
pub fn resolve_color(force: bool, disable: bool) -> ColorChoice {
    if disable {
        return ColorChoice::Never;
    }
    if force {
        return ColorChoice::Always;
    }
    // NO_COLOR: any value (including empty) disables color
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    if std::env::var_os("COLOR").is_some() {
        return ColorChoice::Always;
    }
    if !std::io::stdout().is_terminal() || std::env::var_os("CI").is_some() {
        return ColorChoice::Never;
    }
    ColorChoice::Auto
}

/// Color scheme for check output.
pub mod scheme {
    use termcolor::{Color, ColorSpec};

    /// Bold measure name.
    pub fn measure_name() -> ColorSpec {
        let mut style = ColorSpec::new();
        style.set_bold(true);
        style
    }

    /// Red "FAIL" and failure labels.
    pub fn fail() -> ColorSpec {
        let mut style = ColorSpec::new();
        style.set_fg(Some(Color::Red)).set_bold(true);
        style
    }

    /// Green "PASS" and improvement labels.
    pub fn pass() -> ColorSpec {
        let mut style = ColorSpec::new();
        style.set_fg(Some(Color::Green)).set_bold(true);
        style
    }

    /// Yellow labels for informational events.
    pub fn warn() -> ColorSpec {
        let mut style = ColorSpec::new();
        style.set_fg(Some(Color::Yellow)).set_bold(true);
        style
    }

    /// Cyan commit hashes.
    pub fn commit() -> ColorSpec {
        let mut style = ColorSpec::new();
        style.set_fg(Some(Color::Cyan));
        style
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
