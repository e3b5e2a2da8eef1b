// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Excuse command implementation.

use git_ratchet::cli::{Cli, ExcuseArgs};
use git_ratchet::color::resolve_color;
use git_ratchet::discovery;
use git_ratchet::error::ExitCode;
use git_ratchet::exclusion::Exclusion;
use git_ratchet::git::GitRepo;
use git_ratchet::output::text::TextFormatter;

/// Run the excuse command.
pub fn run(cli: &Cli, args: &ExcuseArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = discovery::load_config(cli.config.as_deref(), &cwd)?;

    let repo = GitRepo::discover(&cwd)?;
    let exclusion = Exclusion::new(args.measures.iter().map(String::as_str));
    let hash = repo.append_exclusion(args.prefix(&config.ratchet), &args.commit, &exclusion)?;

    TextFormatter::stdout(resolve_color(false, false))
        .write_stored(&format!("excused {}", args.measures.join(", ")), &hash)?;
    Ok(ExitCode::Success)
}
