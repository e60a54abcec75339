//! Pluggable line-input sources for the interactive sender.
//!
//! The sender loop reads "the next line of operator input" through the
//! [`InputSource`] trait instead of touching stdin directly, so tests can
//! drive it with scripted input and no live terminal is required.

use std::collections::VecDeque;
use std::io;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// A source of operator-authored text lines.
///
/// `Ok(None)` means end-of-input; the sender treats that as transient (a
/// script feeding stdin may simply not have produced the next line yet).
#[allow(async_fn_in_trait)] // callers never spawn the returned future
pub trait InputSource {
    /// Read the next line, without its trailing newline.
    async fn next_line(&mut self) -> io::Result<Option<String>>;
}

// ---------------------------------------------------------------------------
// Stdin-backed source
// ---------------------------------------------------------------------------

/// Reads lines from the process's stdin.
pub struct StdinInput {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinInput {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdinInput {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }
}

// ---------------------------------------------------------------------------
// Scripted source (tests)
// ---------------------------------------------------------------------------

/// Yields a fixed sequence of lines, then reports end-of-input forever.
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
