//! # Line Sources
//!
//! A [`LineSource`] hands the prompt loop one line of raw input at a time.
//! It mirrors the classic scanner shape: [`scan`](LineSource::scan) advances,
//! [`text`](LineSource::text) exposes the current line and
//! [`err`](LineSource::err) explains why scanning stopped.
//!
//! Two implementations ship with the crate:
//! - [`BufferedLineSource`]: backed by any [`BufRead`] (stdin by default).
//! - [`ScriptedLineSource`]: a FIFO of canned lines for tests and demos.
//!
//! [`SharedBuffer`] is the output-side companion: a clonable in-memory
//! writer for capturing what a prompt printed.
use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::error::{PromptError, Result};

/// Sequential, line-based text acquisition.
pub trait LineSource: Send {
    /// Advances to the next line. Returns `false` once the source is
    /// exhausted or failed.
    fn scan(&mut self) -> bool;

    /// The line produced by the last successful [`scan`](Self::scan),
    /// without its line terminator.
    fn text(&self) -> &str;

    /// The I/O fault that stopped scanning, if any. `None` after a `false`
    /// scan means the source was simply exhausted.
    fn err(&self) -> Option<&io::Error>;

    /// Hands out the fault reported by [`err`](Self::err) by value.
    ///
    /// Sources that own their error should move it out so its `source()`
    /// chain survives; the provided version can only copy kind and message.
    /// After a take the source reads as exhausted.
    fn take_err(&mut self) -> Option<io::Error> {
        self.err()
            .map(|err| io::Error::new(err.kind(), err.to_string()))
    }

    /// Scans one line and maps a stop into the matching [`PromptError`].
    fn read_line(&mut self) -> Result<String> {
        if self.scan() {
            return Ok(self.text().to_string());
        }
        match self.take_err() {
            Some(err) => Err(PromptError::Input(err)),
            None => Err(PromptError::InputExhausted),
        }
    }
}

/// [`LineSource`] backed by a buffered reader.
pub struct BufferedLineSource {
    reader: Box<dyn BufRead + Send>,
    line: String,
    err: Option<io::Error>,
    done: bool,
}

impl BufferedLineSource {
    pub fn new<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        Self {
            reader: Box::new(reader),
            line: String::new(),
            err: None,
            done: false,
        }
    }
}

impl LineSource for BufferedLineSource {
    fn scan(&mut self) -> bool {
        self.line.clear();
        if self.done {
            return false;
        }

        match self.reader.read_line(&mut self.line) {
            Ok(0) => {
                self.done = true;
                false
            }
            Ok(_) => {
                if self.line.ends_with('\n') {
                    self.line.pop();
                    if self.line.ends_with('\r') {
                        self.line.pop();
                    }
                }
                true
            }
            Err(e) => {
                self.line.clear();
                self.err = Some(e);
                self.done = true;
                false
            }
        }
    }

    fn text(&self) -> &str {
        &self.line
    }

    fn err(&self) -> Option<&io::Error> {
        self.err.as_ref()
    }

    fn take_err(&mut self) -> Option<io::Error> {
        self.err.take()
    }
}

/// [`LineSource`] that emits canned lines in FIFO order.
///
/// Once the script runs out, [`scan`](LineSource::scan) returns `false` and
/// [`err`](LineSource::err) reports the configured failure, or nothing when
/// the script simply ends.
///
/// ```rust
/// use promptline::{LineSource, ScriptedLineSource};
///
/// let mut source = ScriptedLineSource::new(["Bobby"]);
/// assert!(source.scan());
/// assert_eq!(source.text(), "Bobby");
/// assert!(!source.scan());
/// assert!(source.err().is_none());
/// ```
#[derive(Debug, Default)]
pub struct ScriptedLineSource {
    lines: VecDeque<String>,
    current: String,
    failure: Option<io::Error>,
}

impl ScriptedLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            current: String::new(),
            failure: None,
        }
    }

    /// Reports `err` once the scripted lines are used up.
    pub fn failing_with(mut self, err: io::Error) -> Self {
        self.failure = Some(err);
        self
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLineSource {
    fn scan(&mut self) -> bool {
        match self.lines.pop_front() {
            Some(line) => {
                self.current = line;
                true
            }
            None => {
                self.current.clear();
                false
            }
        }
    }

    fn text(&self) -> &str {
        &self.current
    }

    fn err(&self) -> Option<&io::Error> {
        if self.lines.is_empty() {
            self.failure.as_ref()
        } else {
            None
        }
    }

    fn take_err(&mut self) -> Option<io::Error> {
        if self.lines.is_empty() {
            self.failure.take()
        } else {
            None
        }
    }
}

/// Clonable in-memory writer. Every clone appends to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
