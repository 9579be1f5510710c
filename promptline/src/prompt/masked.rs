//! Non-echoing input for password prompts.
//!
//! On an interactive terminal the characters are read in raw mode and never
//! written back. Any other stream falls back to the next whitespace-delimited
//! token of the next line.
use std::io;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};

use crate::source::LineSource;

/// Restores cooked mode when dropped, even if the read fails halfway.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads a secret from the controlling terminal without echo.
///
/// Enter finishes the read, Backspace removes the last character and
/// Ctrl-C / Ctrl-D abort it. Raw mode swallows the interrupt signal, so an
/// aborted read is an ordinary masked-read failure and the prompt asks again.
pub(super) fn read_from_terminal() -> io::Result<String> {
    let _guard = RawModeGuard::enable()?;
    let mut secret = String::new();

    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };

        if kind == KeyEventKind::Release {
            continue;
        }

        match code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char('c' | 'd') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "masked input aborted",
                ));
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}

/// Takes the first whitespace-delimited token of the next line.
///
/// An exhausted source or a blank line is an error.
pub(super) fn read_token(source: &mut dyn LineSource) -> io::Result<String> {
    if !source.scan() {
        return Err(source
            .take_err()
            .unwrap_or_else(|| io::ErrorKind::UnexpectedEof.into()));
    }

    source
        .text()
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "expected a token"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedLineSource;

    #[test]
    fn test_read_token_takes_first_word() {
        let mut source = ScriptedLineSource::new(["  hunter2 trailing"]);
        assert_eq!(read_token(&mut source).unwrap(), "hunter2");
    }

    #[test]
    fn test_read_token_rejects_blank_line() {
        let mut source = ScriptedLineSource::new(["   "]);
        let err = read_token(&mut source).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_token_passes_source_fault_through() {
        let mut source = ScriptedLineSource::new(Vec::<String>::new())
            .failing_with(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        let err = read_token(&mut source).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(err.to_string(), "pipe closed");
    }

    #[test]
    fn test_read_token_on_exhausted_source() {
        let mut source = ScriptedLineSource::new(Vec::<String>::new());
        let err = read_token(&mut source).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
