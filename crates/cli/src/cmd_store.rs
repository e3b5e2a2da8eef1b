// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Store command implementation.

use git_ratchet::cli::{Cli, StoreArgs};
use git_ratchet::color::resolve_color;
use git_ratchet::discovery;
use git_ratchet::error::{Error, ExitCode};
use git_ratchet::git::GitRepo;
use git_ratchet::measure::read_report;
use git_ratchet::output::text::TextFormatter;

/// Run the store command.
pub fn run(cli: &Cli, args: &StoreArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = discovery::load_config(cli.config.as_deref(), &cwd)?;
    let settings = &config.ratchet;

    let measures = read_report(args.source.path(), args.source.input_type(settings))?;
    if measures.is_empty() {
        return Err(Error::NoComputedMeasures.into());
    }

    let repo = GitRepo::discover(&cwd)?;
    let hash = repo.write_measures(args.prefix(settings), &args.commit, &measures)?;

    TextFormatter::stdout(resolve_color(false, false))
        .write_stored(&format!("stored {} measures", measures.len()), &hash)?;
    Ok(ExitCode::Success)
}
