// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming `git log` reader.
//!
//! Runs one `git log --notes=<ref>` subprocess per walk and yields records as
//! they arrive on stdout; nothing is buffered beyond the current record.
//!
//! ## Record format
//!
//! Fields are separated by `0x1f` and records terminated by `0x1e`, so notes
//! may contain commas, quotes and newlines without escaping:
//!
//! ```text
//! <hash> 0x1f <author> <<email>> 0x1f <unix-seconds> 0x1f <note> 0x1e
//! ```
//!
//! ## Process lifetime
//!
//! The child is always reaped. Readers commonly stop after the first useful
//! record; closing stdout early makes git die of `SIGPIPE`, and that exit
//! status is ignored. A watchdog thread kills the child when the walk
//! outlives its timeout.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};

use crate::error::{Error, Result};
use crate::notes::{CommitRecord, NotesLog};

/// Separator between fields of a record.
pub const FIELD_SEP: char = '\x1f';

/// Terminator of a record.
pub const RECORD_END: u8 = 0x1e;

const LOG_FORMAT: &str = "--format=%H%x1f%an <%ae>%x1f%at%x1f%N%x1e";

/// Default limit on a single history walk.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Notes log backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitLog {
    root: PathBuf,
    timeout: Option<Duration>,
}

impl GitLog {
    /// Read history of the repository containing `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Override the walk timeout. `None` disables the watchdog.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl NotesLog for GitLog {
    type Records = LogStream;

    fn records(&self, notes_ref: &str, range: &str) -> Result<LogStream> {
        LogStream::spawn(&self.root, notes_ref, range, self.timeout)
    }
}

struct Watchdog {
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

/// Records streamed from a running `git log`.
pub struct LogStream {
    command: String,
    child: Arc<Mutex<Child>>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<String>>,
    watchdog: Option<Watchdog>,
    timed_out: Arc<AtomicBool>,
    timeout: Option<Duration>,
    buf: Vec<u8>,
}

impl LogStream {
    fn spawn(
        root: &Path,
        notes_ref: &str,
        range: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let command = format!("git log --notes={notes_ref} {range}");

        let mut child = Command::new("git")
            .arg("log")
            .arg(format!("--notes={notes_ref}"))
            .arg(LOG_FORMAT)
            .arg(range)
            .arg("--")
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Subprocess {
                command: command.clone(),
                message: format!("failed to start: {e}"),
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Internal("git log stdout was not captured".to_string()))?;

        // Drained off-thread so a chatty stderr cannot stall the child
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                text
            })
        });

        let child = Arc::new(Mutex::new(child));
        let timed_out = Arc::new(AtomicBool::new(false));
        let watchdog = timeout.map(|after| {
            let (cancel, cancelled) = crossbeam_channel::bounded::<()>(0);
            let child = Arc::clone(&child);
            let timed_out = Arc::clone(&timed_out);
            let handle = std::thread::spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = cancelled.recv_timeout(after) {
                    timed_out.store(true, Ordering::SeqCst);
                    if let Ok(mut child) = child.lock() {
                        let _ = child.kill();
                    }
                }
            });
            Watchdog { cancel, handle }
        });

        tracing::debug!(%command, "started history walk");

        Ok(Self {
            command,
            child,
            stdout: Some(BufReader::new(stdout)),
            stderr,
            watchdog,
            timed_out,
            timeout,
            buf: Vec::new(),
        })
    }

    /// Close the pipe, stop the watchdog and reap the child.
    ///
    /// `exhausted` is false when the reader stopped before EOF; the child's
    /// exit status is then ignored.
    fn finish(&mut self, exhausted: bool) -> Result<()> {
        drop(self.stdout.take());

        if let Some(watchdog) = self.watchdog.take() {
            drop(watchdog.cancel);
            let _ = watchdog.handle.join();
        }

        let status = {
            let mut child = self
                .child
                .lock()
                .map_err(|_| Error::Internal("git log child lock poisoned".to_string()))?;
            child.wait().map_err(|e| Error::Subprocess {
                command: self.command.clone(),
                message: format!("failed to wait: {e}"),
            })?
        };
        let stderr = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if self.timed_out.load(Ordering::SeqCst) {
            return Err(Error::Timeout {
                command: self.command.clone(),
                after: self.timeout.unwrap_or_default(),
            });
        }

        if !exhausted {
            tracing::debug!(command = %self.command, %status, "history walk closed early");
            return Ok(());
        }

        if !status.success() {
            return Err(Error::Subprocess {
                command: self.command.clone(),
                message: format!("{status}: {}", stderr.trim()),
            });
        }

        Ok(())
    }
}

impl Iterator for LogStream {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let stdout = self.stdout.as_mut()?;
            self.buf.clear();

            match stdout.read_until(RECORD_END, &mut self.buf) {
                Ok(0) => return self.finish(true).err().map(Err),
                Ok(_) => {
                    let text = String::from_utf8_lossy(&self.buf);
                    let raw = text
                        .trim_end_matches(RECORD_END as char)
                        .trim_start_matches(['\r', '\n']);
                    if raw.is_empty() {
                        continue;
                    }
                    return Some(parse_record(raw));
                }
                Err(e) => {
                    let _ = self.finish(false);
                    return Some(Err(Error::Subprocess {
                        command: self.command.clone(),
                        message: format!("failed to read output: {e}"),
                    }));
                }
            }
        }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        if self.stdout.is_some()
            && let Err(e) = self.finish(false)
        {
            tracing::debug!(error = %e, "history walk cleanup failed");
        }
    }
}

/// Split one raw log record into its fields.
pub(crate) fn parse_record(raw: &str) -> Result<CommitRecord> {
    let mut fields = raw.splitn(4, FIELD_SEP);
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(hash), Some(author), Some(timestamp), Some(note)) => Ok(CommitRecord::new(
            hash.trim(),
            author,
            timestamp.trim(),
            note,
        )),
        _ => Err(Error::Format(format!("malformed log record {raw:?}"))),
    }
}

#[cfg(test)]
#[path = "gitlog_tests.rs"]
mod tests;
