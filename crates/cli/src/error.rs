// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

/// git-ratchet error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found or invalid
    #[error("config error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid command-line arguments
    #[error("argument error: {0}")]
    Argument(String),

    /// File I/O error
    #[error("io error: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed measure report, log record or timestamp.
    #[error("format error: {0}")]
    Format(String),

    /// An exclusion note line that is not valid JSON.
    #[error("bad exclusion {line:?}: {source}")]
    ExclusionDecode {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// Report type that has no parser.
    #[error("unsupported input type: {0}")]
    UnsupportedInput(String),

    #[error("no measures passed to git-ratchet to compare against")]
    NoComputedMeasures,

    #[error("no stored measures to compare against")]
    NoStoredMeasures,

    /// `git` could not be started, read, or exited unsuccessfully.
    #[error("{command}: {message}")]
    Subprocess { command: String, message: String },

    /// `git` was killed by the watchdog.
    #[error("{command}: timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// Regressions remain after exclusions were applied.
    #[error("one or more metrics currently failing: {}", .unexcused.join(", "))]
    MeasuresFailing { unexcused: Vec<String> },

    /// Internal error (bug)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type using git-ratchet Error
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Ratchet passed
    Success = 0,
    /// One or more measures failing without an exclusion
    CheckFailed = 1,
    /// Configuration or argument error
    ConfigError = 2,
    /// Internal error
    InternalError = 3,
    /// Report or history data could not be used
    InputError = 4,
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config { .. } | Error::Argument(_) | Error::UnsupportedInput(_) => {
                ExitCode::ConfigError
            }
            Error::MeasuresFailing { .. } => ExitCode::CheckFailed,
            Error::Format(_)
            | Error::ExclusionDecode { .. }
            | Error::NoComputedMeasures
            | Error::NoStoredMeasures => ExitCode::InputError,
            Error::Io { .. }
            | Error::Subprocess { .. }
            | Error::Timeout { .. }
            | Error::Git(_)
            | Error::Internal(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
