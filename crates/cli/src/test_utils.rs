//! Shared unit test utilities.
//!
//! Provides throwaway git repositories for tests that exercise real history.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run git in `dir`, panicking on failure, and return trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Creates a temp directory holding an empty git repository.
pub fn temp_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q", "-b", "main"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "user.name", "Test User"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);
    dir
}

/// Commit a change and return the full hash of the new commit.
///
/// Each message writes its own file, so branches never conflict on merge.
pub fn commit(dir: &Path, message: &str) -> String {
    let name = format!("{}.txt", message.replace(|c: char| !c.is_alphanumeric(), "_"));
    fs::write(dir.join(&name), message).unwrap();
    git(dir, &["add", &name]);
    git(dir, &["commit", "-q", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

/// Attach a note under `notes_ref` (short name) to `rev`.
pub fn add_note(dir: &Path, notes_ref: &str, rev: &str, content: &str) {
    git(
        dir,
        &["notes", &format!("--ref={notes_ref}"), "add", "-f", "-m", content, rev],
    );
}

/// Read the note under `notes_ref` on `rev`, if any.
pub fn read_note(dir: &Path, notes_ref: &str, rev: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["notes", &format!("--ref={notes_ref}"), "show", rev])
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).to_string())
}
