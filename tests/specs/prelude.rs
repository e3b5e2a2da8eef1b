//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for driving git-ratchet against throwaway repositories.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::{Predicate, PredicateBooleanExt};
use std::path::Path;
use std::process::Command;

/// Trait for converting into a string predicate.
/// Allows passing `&str` (as contains) or any `Predicate<str>`.
pub trait IntoStrPredicate<P: Predicate<str>> {
    fn into_predicate(self) -> P;
}

impl IntoStrPredicate<predicates::str::ContainsPredicate> for &str {
    fn into_predicate(self) -> predicates::str::ContainsPredicate {
        predicates::str::contains(self)
    }
}

impl<P: Predicate<str>> IntoStrPredicate<P> for P {
    fn into_predicate(self) -> P {
        self
    }
}

/// Returns a Command configured to run the git-ratchet binary
pub fn ratchet_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("git-ratchet"));
    cmd.env_remove("RATCHET_CONFIG").env_remove("RATCHET_LOG");
    cmd
}

// =============================================================================
// RunAssert
// =============================================================================

/// Result of a run for chaining assertions
pub struct RunAssert {
    output: std::process::Output,
}

#[allow(dead_code)]
impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected (with diff on failure)
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout matches predicate.
    pub fn stdout_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            predicate.into_predicate().eval(&stdout),
            "stdout predicate failed:\n{}",
            stdout
        );
        self
    }

    /// Assert stdout does not match predicate.
    pub fn stdout_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            !predicate.into_predicate().eval(&stdout),
            "stdout should NOT match predicate:\n{}",
            stdout
        );
        self
    }

    /// Assert stderr matches predicate.
    pub fn stderr_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            predicate.into_predicate().eval(&stderr),
            "stderr predicate failed:\n{}",
            stderr
        );
        self
    }

    /// Assert stderr does not match predicate.
    pub fn stderr_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            !predicate.into_predicate().eval(&stderr),
            "stderr should NOT match predicate:\n{}",
            stderr
        );
        self
    }

    /// Parse stdout as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).expect("stdout should be valid JSON")
    }
}

// =============================================================================
// Project
// =============================================================================

/// Temporary git repository with helper methods.
///
/// Every project starts with one commit so `HEAD` resolves.
pub struct Project {
    dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl Project {
    /// Create a repository with a single initial commit
    pub fn new() -> Self {
        let temp = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        temp.git(&["init", "-b", "main"]);
        temp.git(&["config", "user.email", "test@example.com"]);
        temp.git(&["config", "user.name", "Test User"]);
        temp.git(&["config", "commit.gpgsign", "false"]);
        temp.commit("feat: initial commit");
        temp
    }

    /// Get the project path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write ratchet.toml (auto-prefixes with `version = 1` if not present)
    pub fn config(&self, content: &str) {
        let content = if content.contains("version") {
            content.to_string()
        } else {
            format!("version = 1\n{}", content)
        };
        self.file("ratchet.toml", &content);
    }

    /// Write a file at the given path (parent directories created automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    /// Run git in the project, returning trimmed stdout
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("git should run");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Add a commit touching a unique file, returning its hash
    pub fn commit(&self, message: &str) -> String {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should work")
            .as_nanos();
        self.file(format!("dummy_{}.txt", id), message);
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }

    /// Note under `refs/notes/<notes_ref>` on HEAD, if any
    pub fn note(&self, notes_ref: &str) -> Option<String> {
        let output = Command::new("git")
            .args(["notes", &format!("--ref={notes_ref}"), "show", "HEAD"])
            .current_dir(self.path())
            .output()
            .expect("git should run");
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run git-ratchet in the project and capture its output
    pub fn ratchet(&self, args: &[&str]) -> Run {
        let mut cmd = ratchet_cmd();
        cmd.args(args).current_dir(self.path());
        Run { cmd }
    }
}

/// Pending git-ratchet invocation.
pub struct Run {
    cmd: Command,
}

#[allow(dead_code)]
impl Run {
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Expect exit code 0
    pub fn passes(self) -> RunAssert {
        self.exits(0)
    }

    /// Expect exit code 1
    pub fn fails(self) -> RunAssert {
        self.exits(1)
    }

    /// Expect a specific exit code
    pub fn exits(mut self, code: i32) -> RunAssert {
        let output = self.cmd.output().expect("command should run");
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit code\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Feed `input` on stdin and expect a specific exit code
    pub fn stdin_exits(self, input: &str, code: i32) -> RunAssert {
        let output = assert_cmd::Command::from_std(self.cmd)
            .write_stdin(input)
            .output()
            .expect("command should run");
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit code\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}
