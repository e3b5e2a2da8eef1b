// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::RatchetConfig;

/// Fail the build when a tracked quality measure gets worse
#[derive(Parser)]
#[command(name = "git-ratchet")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "RATCHET_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare a measure report against the last stored baseline
    Check(CheckArgs),
    /// Record a measure report as the baseline of a commit
    Store(StoreArgs),
    /// Excuse measures from failing until the next stored baseline
    Excuse(ExcuseArgs),
    /// List every recorded baseline, newest first
    Dump(DumpArgs),
}

/// Where a measure report comes from.
#[derive(clap::Args, Default)]
pub struct ReportSource {
    /// Report file ("-" or absent reads stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Report type: csv or checkstyle
    #[arg(short, long, value_name = "TYPE")]
    pub input: Option<String>,
}

impl ReportSource {
    /// The report file, or `None` for stdin.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref().filter(|p| *p != Path::new("-"))
    }

    pub fn input_type<'a>(&'a self, config: &'a RatchetConfig) -> &'a str {
        self.input.as_deref().unwrap_or(&config.input)
    }
}

#[derive(clap::Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: ReportSource,

    /// Notes namespace
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Amount a measure may exceed its baseline before failing
    #[arg(short, long, allow_negative_numbers = true)]
    pub slack: Option<i64>,

    /// Store the adjusted measures on HEAD when the check passes
    #[arg(short, long)]
    pub write: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Force color output
    #[arg(long)]
    pub color: bool,

    /// Disable color output
    #[arg(long)]
    pub no_color: bool,
}

impl CheckArgs {
    pub fn prefix<'a>(&'a self, config: &'a RatchetConfig) -> &'a str {
        self.prefix.as_deref().unwrap_or(&config.prefix)
    }

    pub fn slack(&self, config: &RatchetConfig) -> i64 {
        self.slack.unwrap_or(config.slack)
    }
}

#[derive(clap::Args)]
pub struct StoreArgs {
    #[command(flatten)]
    pub source: ReportSource,

    /// Notes namespace
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Commit to annotate
    #[arg(long, value_name = "REV", default_value = "HEAD")]
    pub commit: String,
}

impl StoreArgs {
    pub fn prefix<'a>(&'a self, config: &'a RatchetConfig) -> &'a str {
        self.prefix.as_deref().unwrap_or(&config.prefix)
    }
}

#[derive(clap::Args)]
pub struct ExcuseArgs {
    /// Measure to excuse (repeatable)
    #[arg(short, long = "measure", value_name = "NAME", required = true)]
    pub measures: Vec<String>,

    /// Notes namespace
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Commit to annotate
    #[arg(long, value_name = "REV", default_value = "HEAD")]
    pub commit: String,
}

impl ExcuseArgs {
    pub fn prefix<'a>(&'a self, config: &'a RatchetConfig) -> &'a str {
        self.prefix.as_deref().unwrap_or(&config.prefix)
    }
}

#[derive(clap::Args)]
pub struct DumpArgs {
    /// Notes namespace
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}

impl DumpArgs {
    pub fn prefix<'a>(&'a self, config: &'a RatchetConfig) -> &'a str {
        self.prefix.as_deref().unwrap_or(&config.prefix)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
