// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unit tests for the streaming git log reader.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use tempfile::TempDir;

use super::*;
use crate::test_utils::{add_note, commit, temp_repo};

// =============================================================================
// RECORD PARSING
// =============================================================================

#[test]
fn parse_record_splits_fields() {
    let raw = "abc123\x1fJane <jane@example.com>\x1f1700000000\x1ferrors,3,4\nlint,1\n";
    let record = parse_record(raw).unwrap();
    assert_eq!(record.hash, "abc123");
    assert_eq!(record.author, "Jane <jane@example.com>");
    assert_eq!(record.timestamp, "1700000000");
    assert_eq!(record.note, "errors,3,4\nlint,1\n");
}

#[test]
fn parse_record_keeps_separators_inside_note() {
    let raw = "h\x1fa\x1f1\x1fnote\x1fwith separator";
    let record = parse_record(raw).unwrap();
    assert_eq!(record.note, "note\x1fwith separator");
}

#[test]
fn parse_record_empty_note() {
    let record = parse_record("h\x1fa\x1f1\x1f").unwrap();
    assert!(record.note.is_empty());
}

#[test]
fn parse_record_too_few_fields() {
    let err = parse_record("h\x1fa").unwrap_err();
    assert!(matches!(err, Error::Format(_)));
}

// =============================================================================
// SUBPROCESS
// =============================================================================

fn repo_with_history() -> (TempDir, Vec<String>) {
    let repo = temp_repo();
    let hashes: Vec<String> = (1..=3)
        .map(|n| commit(repo.path(), &format!("commit {n}")))
        .collect();
    add_note(repo.path(), "r", &hashes[0], "a,1\nb,2");
    add_note(repo.path(), "r", &hashes[2], "a,1");
    (repo, hashes)
}

#[test]
fn streams_records_newest_first() {
    let (repo, hashes) = repo_with_history();
    let log = GitLog::new(repo.path());

    let records: Vec<CommitRecord> = log
        .records("r", "HEAD")
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].hash, hashes[2]);
    assert_eq!(records[2].hash, hashes[0]);
    assert_eq!(records[0].author, "Test User <test@example.com>");
    assert!(records[0].timestamp.parse::<i64>().is_ok());
    assert_eq!(records[0].note.trim(), "a,1");
    assert!(records[1].note.trim().is_empty());
    assert_eq!(records[2].note.trim(), "a,1\nb,2");
}

#[test]
fn missing_notes_ref_gives_empty_notes() {
    let (repo, _) = repo_with_history();
    let log = GitLog::new(repo.path());

    let records: Vec<CommitRecord> = log
        .records("nothing-here", "HEAD")
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.note.trim().is_empty()));
}

#[test]
fn range_limits_walk() {
    let (repo, hashes) = repo_with_history();
    let log = GitLog::new(repo.path());

    let range = format!("{}..HEAD", hashes[0]);
    let count = log.records("r", &range).unwrap().count();
    assert_eq!(count, 2);
}

#[test]
fn dropping_early_is_not_an_error() {
    let repo = temp_repo();
    for n in 0..50 {
        commit(repo.path(), &format!("commit {n}"));
    }
    let log = GitLog::new(repo.path());

    let mut stream = log.records("r", "HEAD").unwrap();
    let first = stream.next().unwrap().unwrap();
    assert_eq!(first.hash.len(), 40);
    drop(stream);

    // A second walk starts fresh
    assert_eq!(log.records("r", "HEAD").unwrap().count(), 50);
}

#[test]
fn bad_range_reports_subprocess_error() {
    let (repo, _) = repo_with_history();
    let log = GitLog::new(repo.path());

    let results: Vec<Result<CommitRecord>> =
        log.records("r", "no-such-rev..HEAD").unwrap().collect();

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(Error::Subprocess { .. })));
}

#[test]
fn outside_repository_is_subprocess_error() {
    let dir = TempDir::new().unwrap();
    let log = GitLog::new(dir.path()).with_timeout(None);

    let results: Vec<Result<CommitRecord>> = log.records("r", "HEAD").unwrap().collect();
    assert!(matches!(results.last(), Some(Err(Error::Subprocess { .. }))));
}

#[test]
fn missing_directory_fails_to_start() {
    let log = GitLog::new("/nonexistent/git-ratchet/repo");
    assert!(matches!(
        log.records("r", "HEAD"),
        Err(Error::Subprocess { .. })
    ));
}

// =============================================================================
// WATCHDOG
// =============================================================================

#[test]
fn expired_watchdog_reports_timeout() {
    let (repo, _) = repo_with_history();
    let log = GitLog::new(repo.path()).with_timeout(Some(Duration::from_nanos(1)));

    let results: Vec<Result<CommitRecord>> = log.records("r", "HEAD").unwrap().collect();

    match results.last() {
        Some(Err(Error::Timeout { command, after })) => {
            assert_eq!(command, "git log --notes=r HEAD");
            assert_eq!(*after, Duration::from_nanos(1));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn timeout_error_names_command_and_limit() {
    let (repo, _) = repo_with_history();
    let log = GitLog::new(repo.path()).with_timeout(Some(Duration::from_nanos(1)));

    let err = log
        .records("r", "HEAD")
        .unwrap()
        .find_map(Result::err)
        .unwrap();
    let message = err.to_string();
    assert!(message.contains("git log --notes=r HEAD"), "got {message}");
    assert!(message.contains("timed out"), "got {message}");
}

#[test]
fn generous_timeout_streams_everything() {
    let (repo, _) = repo_with_history();
    let log = GitLog::new(repo.path()).with_timeout(Some(Duration::from_secs(60)));

    let records: Vec<CommitRecord> = log
        .records("r", "HEAD")
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(records.len(), 3);
}
