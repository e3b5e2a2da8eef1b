// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! git-ratchet CLI entry point.

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt};

use git_ratchet::cli::{Cli, Command};
use git_ratchet::error::ExitCode;

mod cmd_check;
mod cmd_dump;
mod cmd_excuse;
mod cmd_store;

fn init_logging() {
    let filter = EnvFilter::try_from_env("RATCHET_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("git-ratchet: {}", e);
            match e.downcast_ref::<git_ratchet::Error>() {
                Some(err) => ExitCode::from(err),
                None => ExitCode::InternalError,
            }
        }
    };

    std::process::exit(exit_code as i32);
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        None => {
            // Show help for bare invocation
            Cli::command().print_help()?;
            println!();
            Ok(ExitCode::Success)
        }
        Some(Command::Check(args)) => cmd_check::run(&cli, args),
        Some(Command::Store(args)) => cmd_store::run(&cli, args),
        Some(Command::Excuse(args)) => cmd_excuse::run(&cli, args),
        Some(Command::Dump(args)) => cmd_dump::run(&cli, args),
    }
}
