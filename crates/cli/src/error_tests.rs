// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn config_error_display() {
    let err = Error::Config {
        message: "invalid version".into(),
        path: Some(PathBuf::from("ratchet.toml")),
    };
    assert!(err.to_string().contains("invalid version"));
}

#[test]
fn failing_error_lists_measures() {
    let err = Error::MeasuresFailing {
        unexcused: vec!["errors".into(), "warnings".into()],
    };
    let msg = err.to_string();
    assert!(msg.contains("one or more metrics currently failing"));
    assert!(msg.contains("errors, warnings"));
}

#[test]
fn empty_input_errors_are_distinct() {
    assert_ne!(
        Error::NoComputedMeasures.to_string(),
        Error::NoStoredMeasures.to_string()
    );
}

#[parameterized(
    config = { Error::Config { message: "x".into(), path: None }, ExitCode::ConfigError },
    argument = { Error::Argument("x".into()), ExitCode::ConfigError },
    unsupported = { Error::UnsupportedInput("yaml".into()), ExitCode::ConfigError },
    failing = { Error::MeasuresFailing { unexcused: vec!["a".into()] }, ExitCode::CheckFailed },
    format = { Error::Format("x".into()), ExitCode::InputError },
    no_stored = { Error::NoStoredMeasures, ExitCode::InputError },
    no_computed = { Error::NoComputedMeasures, ExitCode::InputError },
    subprocess = { Error::Subprocess { command: "git log".into(), message: "x".into() }, ExitCode::InternalError },
    timeout = { Error::Timeout { command: "git log".into(), after: Duration::from_secs(1) }, ExitCode::InternalError },
    internal = { Error::Internal("x".into()), ExitCode::InternalError },
)]
fn exit_code_mapping(err: Error, expected: ExitCode) {
    assert_eq!(ExitCode::from(&err), expected);
}
