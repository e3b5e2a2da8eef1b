// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Dump command implementation.

use git_ratchet::cli::{Cli, DumpArgs, OutputFormat};
use git_ratchet::color::resolve_color;
use git_ratchet::discovery;
use git_ratchet::error::{ExitCode, Result};
use git_ratchet::git::GitRepo;
use git_ratchet::gitlog::GitLog;
use git_ratchet::history::{CommitMeasure, commit_measures};
use git_ratchet::output::json::JsonFormatter;
use git_ratchet::output::text::TextFormatter;

/// Run the dump command.
pub fn run(cli: &Cli, args: &DumpArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = discovery::load_config(cli.config.as_deref(), &cwd)?;
    let settings = &config.ratchet;

    let repo = GitRepo::discover(&cwd)?;
    let log = GitLog::new(repo.root()).with_timeout(settings.walk_timeout());
    let history = commit_measures(&log, args.prefix(settings))?.collect::<Result<Vec<CommitMeasure>>>()?;
    tracing::debug!(commits = history.len(), "read measure history");

    match args.output {
        OutputFormat::Text => {
            TextFormatter::stdout(resolve_color(false, false)).write_dump(&history)?
        }
        OutputFormat::Json => JsonFormatter::new(std::io::stdout().lock()).write_dump(&history)?,
    }

    Ok(ExitCode::Success)
}
