//! # Prompt Engine
//!
//! A [`Prompt`] owns one interaction cycle: it renders a message, reads a
//! line, validates it, serializes it into an [`Answer`] and loops until
//! something acceptable arrives.
//!
//! ## Execution loop
//!
//! ```text
//!            +-------------------------------+
//!            | render "message [default]: "  |<-----------------+
//!            +---------------+---------------+                  |
//!                            |                                  |
//!                            v                                  |
//!            +-------------------------------+   I/O fault /    |
//!            |  read line (or masked read)   |---exhausted----> Err
//!            +---------------+---------------+                  |
//!                 non-empty  |  empty                           |
//!          +-----------------+------------------+               |
//!          v                                    v               |
//!   trim, validate, serialize        default? -> serialize it   |
//!     ok  -> Ok(Some(answer))        allow_nil? -> Ok(None)     |
//!     bad -> invalid message --------------- else invalid ------+
//! ```
//!
//! The loop is unbounded on purpose: it ends only with an accepted answer or
//! an irrecoverable read error. Callers that need a bound race it against a
//! cancellation signal (see [`Cancellable`](crate::Cancellable)).
//!
//! ## Masked prompts
//!
//! Masked input never goes through trimming. A failed masked read is shown
//! as invalid input and retried; it never aborts the prompt.
//!
//! ## Example
//! ```rust,no_run
//! use promptline::{Prompt, serialization, validation};
//!
//! let age = Prompt::new("Age")
//!     .validator(validation::numbers_only())
//!     .serializer(serialization::unsigned())
//!     .invalid_message("Age should be between 0 - 150")
//!     .key("age");
//!
//! match age.execute() {
//!     Ok(Some(answer)) => println!("you are {answer}"),
//!     Ok(None) => println!("no answer"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
use std::{
    fmt::{self, Debug},
    io::{self, BufRead, BufReader, IsTerminal, Read, Write},
    sync::Arc,
};

use parking_lot::{Mutex, MutexGuard};
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::{
    answer::Answer,
    error::{Result, SerializeError},
    serialization::Serializer,
    source::{BufferedLineSource, LineSource},
    validation::Validator,
};

mod masked;

pub(crate) const DEFAULT_DELIMITER: &str = ": ";
pub(crate) const DEFAULT_INVALID_MESSAGE: &str = "Invalid Input";
/// Echoed in the invalid-input message when nothing was typed.
const EMPTY_INPUT_TOKEN: &str = "null";

/// Immutable description of a prompt.
#[derive(Clone)]
struct PromptConfig {
    message: String,
    allow_nil: bool,
    masked: bool,
    invalid_message: Option<String>,
    default_text: String,
    validator: Option<Validator>,
    pattern: Option<Regex>,
    serializer: Option<Serializer>,
    key: String,
    delimiter: Option<String>,
    suppress_trim: bool,
    suppress_echo: bool,
}

impl PromptConfig {
    fn new(message: String) -> Self {
        Self {
            message,
            allow_nil: false,
            masked: false,
            invalid_message: None,
            default_text: String::new(),
            validator: None,
            pattern: None,
            serializer: None,
            key: String::new(),
            delimiter: None,
            suppress_trim: false,
            suppress_echo: false,
        }
    }

    /// An empty default text means "no default".
    fn has_default(&self) -> bool {
        !self.default_text.is_empty()
    }

    fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER)
    }

    fn invalid_message(&self) -> &str {
        self.invalid_message
            .as_deref()
            .unwrap_or(DEFAULT_INVALID_MESSAGE)
    }

    /// Pattern and validator must both accept when both are present.
    fn accepts(&self, raw: &str) -> bool {
        self.pattern.as_ref().is_none_or(|p| p.is_match(raw))
            && self.validator.as_ref().is_none_or(|v| v(raw))
    }

    fn serialize(&self, raw: &str) -> std::result::Result<Option<Answer>, SerializeError> {
        match &self.serializer {
            Some(serializer) => serializer(raw),
            None => Ok(Some(Answer::Text(raw.to_string()))),
        }
    }
}

/// Input side of a prompt: the pending reader and the line source built from it.
#[derive(Default)]
struct InputState {
    /// Reader handed to the line source on first use. `None` means stdin.
    reader: Option<Box<dyn BufRead + Send>>,
    source: Option<Box<dyn LineSource>>,
}

impl InputState {
    fn source(&mut self) -> &mut dyn LineSource {
        let reader = &mut self.reader;
        self.source
            .get_or_insert_with(|| {
                let reader = reader
                    .take()
                    .unwrap_or_else(|| Box::new(BufReader::new(io::stdin())));
                Box::new(BufferedLineSource::new(reader))
            })
            .as_mut()
    }
}

type SharedOutput = Arc<Mutex<Box<dyn Write + Send>>>;

/// Handles to the streams of a prompt. Cloning shares the streams.
#[derive(Clone)]
struct PromptIo {
    input: Arc<Mutex<InputState>>,
    output: SharedOutput,
    /// Input is the process stdin, so masked reads may use the terminal.
    stdin_backed: bool,
}

impl Default for PromptIo {
    fn default() -> Self {
        Self {
            input: Arc::default(),
            output: Arc::new(Mutex::new(Box::new(io::stdout()))),
            stdin_backed: true,
        }
    }
}

/// One execution's hold on the prompt streams.
///
/// The input stays locked for the whole execution; output is locked per write.
struct Session<'a> {
    input: MutexGuard<'a, InputState>,
    output: &'a Mutex<Box<dyn Write + Send>>,
    stdin_backed: bool,
}

impl Session<'_> {
    fn source(&mut self) -> &mut dyn LineSource {
        self.input.source()
    }

    fn emit(&self, args: fmt::Arguments<'_>) {
        let mut output = self.output.lock();
        if let Err(err) = output.write_fmt(args).and_then(|()| output.flush()) {
            warn!(error = %err, "failed to write to prompt output");
        }
    }

    fn render_prompt(&self, config: &PromptConfig) {
        if config.has_default() {
            self.emit(format_args!(
                "{} [{}]{}",
                config.message,
                config.default_text,
                config.delimiter()
            ));
        } else {
            self.emit(format_args!("{}{}", config.message, config.delimiter()));
        }
    }

    /// `echo` is the rejected raw input, or `None` when there is nothing to show.
    fn render_invalid(&self, config: &PromptConfig, echo: Option<&str>) {
        match echo {
            Some(raw) if !config.suppress_echo => {
                self.emit(format_args!("\n{} [{}]\n\n", config.invalid_message(), raw));
            }
            _ => self.emit(format_args!("\n{}\n\n", config.invalid_message())),
        }
    }

    fn read_masked(&mut self) -> io::Result<String> {
        let result = if self.stdin_backed && io::stdin().is_terminal() {
            masked::read_from_terminal()
        } else {
            masked::read_token(self.source())
        };
        // The newline typed by the user was never echoed.
        self.emit(format_args!("\n"));
        result
    }
}

/// A single interactive prompt.
///
/// Built with [`Prompt::new`] and the chained setters below, then run with
/// [`execute`](Prompt::execute) as many times as needed. Each execution is
/// independent; the line source is built on first use and reused afterwards.
///
/// Cloning is cheap: clones share the configuration and the same streams,
/// which is what lets a background execution path own the prompt for the
/// duration of a cancellable call. Concurrent executions sharing an input are
/// serialized by an internal lock. Builder calls only ever change the prompt
/// they are called on: [`with_reader`](Prompt::with_reader) and friends give
/// it fresh stream handles and never touch its clones.
///
/// # Defaults
/// - input: process stdin, output: process stdout
/// - delimiter: `": "`
/// - invalid message: `"Invalid Input"`
/// - no default text, no validator, no serializer (answers are [`Answer::Text`])
#[derive(Clone)]
pub struct Prompt {
    config: Arc<PromptConfig>,
    io: PromptIo,
}

impl Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("message", &self.config.message)
            .field("key", &self.config.key)
            .field("default_text", &self.config.default_text)
            .field("allow_nil", &self.config.allow_nil)
            .field("masked", &self.config.masked)
            .finish_non_exhaustive()
    }
}

impl Prompt {
    /// Creates a prompt displaying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            config: Arc::new(PromptConfig::new(message.into())),
            io: PromptIo::default(),
        }
    }

    fn config_mut(&mut self) -> &mut PromptConfig {
        Arc::make_mut(&mut self.config)
    }

    /// Empty input without a default resolves to `Ok(None)` instead of being rejected.
    #[must_use]
    pub fn allow_nil(mut self, allow: bool) -> Self {
        self.config_mut().allow_nil = allow;
        self
    }

    /// Suppresses echo while the answer is typed.
    ///
    /// On a terminal, Ctrl-C during a masked read does not raise SIGINT; it
    /// fails the read and the prompt asks again. Bound such prompts with
    /// [`Cancellable::execute_with_timeout`](crate::Cancellable::execute_with_timeout).
    #[must_use]
    pub fn masked(mut self, masked: bool) -> Self {
        self.config_mut().masked = masked;
        self
    }

    /// Message shown when input is rejected.
    #[must_use]
    pub fn invalid_message(mut self, message: impl Into<String>) -> Self {
        self.config_mut().invalid_message = Some(message.into());
        self
    }

    /// Raw text used when the user just hits enter.
    ///
    /// When a serializer is also set, the default must be serializable by
    /// it; otherwise a diagnostic is printed and the prompt keeps asking.
    #[must_use]
    pub fn default_text(mut self, text: impl Into<String>) -> Self {
        self.config_mut().default_text = text.into();
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.config_mut().validator = Some(validator);
        self
    }

    /// Regex the raw input must match. Anchor it (`^...$`) for full-match semantics.
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.config_mut().pattern = Some(pattern);
        self
    }

    #[must_use]
    pub fn serializer(mut self, serializer: Serializer) -> Self {
        self.config_mut().serializer = Some(serializer);
        self
    }

    /// Result key used when the prompt is part of a [`PromptSequence`](crate::PromptSequence).
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.config_mut().key = key.into();
        self
    }

    /// Text appended after the message, `": "` when unset or empty.
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        self.config_mut().delimiter = (!delimiter.is_empty()).then_some(delimiter);
        self
    }

    /// Keeps leading and trailing whitespace. Masked input is never trimmed.
    #[must_use]
    pub fn suppress_trim(mut self, suppress: bool) -> Self {
        self.config_mut().suppress_trim = suppress;
        self
    }

    /// Stops echoing rejected input inside the invalid-input message.
    #[must_use]
    pub fn suppress_echo(mut self, suppress: bool) -> Self {
        self.config_mut().suppress_echo = suppress;
        self
    }

    /// Reads input from `reader` instead of stdin.
    #[must_use]
    pub fn with_reader<R>(mut self, reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        self.io.input = Arc::new(Mutex::new(InputState {
            reader: Some(Box::new(BufReader::new(reader))),
            source: None,
        }));
        self.io.stdin_backed = false;
        self
    }

    /// Writes prompt output to `writer` instead of stdout.
    #[must_use]
    pub fn with_writer<W>(mut self, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.io.output = Arc::new(Mutex::new(Box::new(writer)));
        self
    }

    /// Replaces the line source entirely.
    #[must_use]
    pub fn with_line_source<S>(mut self, source: S) -> Self
    where
        S: LineSource + 'static,
    {
        self.io.input = Arc::new(Mutex::new(InputState {
            reader: None,
            source: Some(Box::new(source)),
        }));
        self.io.stdin_backed = false;
        self
    }

    pub fn message(&self) -> &str {
        &self.config.message
    }

    /// Result key, empty when unset.
    pub fn result_key(&self) -> &str {
        &self.config.key
    }

    /// Runs the prompt until an answer is accepted.
    ///
    /// Returns `Ok(None)` only for empty input on an `allow_nil` prompt
    /// without default. Fails only when the regular line source is
    /// exhausted or faults.
    pub fn execute(&self) -> Result<Option<Answer>> {
        let mut session = Session {
            input: self.io.input.lock(),
            output: &self.io.output,
            stdin_backed: self.io.stdin_backed,
        };
        self.run(&mut session)
    }

    fn run(&self, io: &mut Session<'_>) -> Result<Option<Answer>> {
        let config = &*self.config;
        debug!(message = %config.message, key = %config.key, "executing prompt");

        loop {
            io.render_prompt(config);

            let raw = if config.masked {
                match io.read_masked() {
                    Ok(raw) => raw,
                    Err(err) => {
                        trace!(error = %err, "masked read failed");
                        io.render_invalid(config, None);
                        continue;
                    }
                }
            } else {
                let line = io.source().read_line()?;
                if config.suppress_trim {
                    line
                } else {
                    line.trim().to_string()
                }
            };

            if !raw.is_empty() {
                if config.accepts(&raw) {
                    match config.serialize(&raw) {
                        Ok(Some(answer)) => {
                            debug!(key = %config.key, "prompt answered");
                            return Ok(Some(answer));
                        }
                        Ok(None) => trace!("serializer produced no value"),
                        // Parse errors quote the input.
                        Err(_) if config.masked => trace!("serializer rejected masked input"),
                        Err(err) => trace!(error = %err, "serializer rejected input"),
                    }
                } else if !config.masked {
                    trace!(input = %raw, "input failed validation");
                }
                io.render_invalid(config, Some(&raw));
                continue;
            }

            if config.has_default() {
                match config.serialize(&config.default_text) {
                    Ok(Some(answer)) => {
                        debug!(key = %config.key, "prompt answered with default");
                        return Ok(Some(answer));
                    }
                    Ok(None) => {
                        warn!(default = %config.default_text, "default produced no value");
                        io.emit(format_args!(
                            "Default value cannot be serialized: no value produced\n"
                        ));
                    }
                    Err(err) => {
                        warn!(default = %config.default_text, error = %err, "default cannot be serialized");
                        io.emit(format_args!("Default value cannot be serialized: {}\n", err));
                    }
                }
                continue;
            }

            if config.allow_nil {
                debug!(key = %config.key, "prompt answered with nothing");
                return Ok(None);
            }

            io.render_invalid(config, Some(EMPTY_INPUT_TOKEN));
        }
    }
}
