// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Check command implementation.

use git_ratchet::cli::{CheckArgs, Cli, OutputFormat};
use git_ratchet::color::resolve_color;
use git_ratchet::discovery;
use git_ratchet::error::{Error, ExitCode};
use git_ratchet::git::GitRepo;
use git_ratchet::gitlog::GitLog;
use git_ratchet::history::latest_measures;
use git_ratchet::measure::read_report;
use git_ratchet::output::json::JsonFormatter;
use git_ratchet::output::text::TextFormatter;
use git_ratchet::ratchet::{MeasureEvent, compare_measures};

/// Run the check command.
pub fn run(cli: &Cli, args: &CheckArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = discovery::load_config(cli.config.as_deref(), &cwd)?;
    let settings = &config.ratchet;
    let prefix = args.prefix(settings);

    let computed = read_report(args.source.path(), args.source.input_type(settings))?;
    tracing::debug!(count = computed.len(), "parsed report");
    if computed.is_empty() {
        return Err(Error::NoComputedMeasures.into());
    }

    let repo = GitRepo::discover(&cwd)?;
    let log = GitLog::new(repo.root()).with_timeout(settings.walk_timeout());

    let stored = latest_measures(&log, prefix)?.ok_or(Error::NoStoredMeasures)?;
    let report = compare_measures(
        &log,
        prefix,
        &stored.commit_hash,
        &stored.measures,
        computed,
        args.slack(settings),
    )?;

    for event in &report.comparison.events {
        log_event(event);
    }

    let mut text = match args.output {
        OutputFormat::Text => {
            let mut formatter = TextFormatter::stdout(resolve_color(args.color, args.no_color));
            formatter.write_report(&report)?;
            Some(formatter)
        }
        OutputFormat::Json => {
            JsonFormatter::new(std::io::stdout().lock()).write_report(&report)?;
            None
        }
    };

    report.verdict()?;

    if args.write {
        let measures = report.measures();
        let hash = repo.write_measures(prefix, "HEAD", measures)?;
        if let Some(formatter) = text.as_mut() {
            formatter.write_stored(&format!("stored {} measures", measures.len()), &hash)?;
        }
    }

    Ok(ExitCode::Success)
}

fn log_event(event: &MeasureEvent) {
    match event {
        MeasureEvent::Missing { name } => {
            tracing::error!(measure = %name, "measure missing from report");
        }
        MeasureEvent::Regressed {
            name,
            value,
            baseline,
            slack,
        } => {
            tracing::error!(measure = %name, value, baseline, slack, "measure regressed");
        }
        MeasureEvent::New { name } => {
            tracing::warn!(measure = %name, "new measure");
        }
        MeasureEvent::Improved {
            name,
            value,
            baseline,
        } => {
            tracing::info!(measure = %name, value, baseline, "measure improved");
        }
        MeasureEvent::Clamped { name, from, to } => {
            tracing::info!(measure = %name, from, to, "baseline lowered");
        }
    }
}
