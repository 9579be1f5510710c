//! # Errors
//!
//! Only two kinds of faults ever leave a prompt: stream-level failures on the
//! regular input path and structural misconfiguration of a sequence.
//! Everything else (failed validation, failed serialization, masked-read
//! hiccups) is absorbed by the prompt loop and turned into a retry.
//!
//! | Variant                          | Raised by                                   |
//! |----------------------------------|---------------------------------------------|
//! | [`PromptError::Input`]           | line source reported an I/O fault           |
//! | [`PromptError::InputExhausted`]  | line source reached the end of its stream   |
//! | [`PromptError::MissingKey`]      | sequence member without a result key        |
//! | [`PromptError::Cancelled`]       | cancellable wrapper lost the race           |
//! | [`PromptError::Background`]      | background execution path panicked          |
use std::io;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = PromptError> = std::result::Result<T, E>;

/// Errors returned to the caller of a prompt or a prompt sequence.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The line source failed while reading. Never retried.
    #[error("got irrecoverable input error: {0}")]
    Input(#[source] io::Error),

    /// The line source has no more lines to give. Never retried.
    #[error("got irrecoverable input error: input stream exhausted")]
    InputExhausted,

    /// A member of a sequence has an empty result key.
    #[error("'key' field is missing from one or more prompts (member #{index})")]
    MissingKey { index: usize },

    /// The cancellation signal fired before the prompt completed.
    #[error("call was canceled")]
    Cancelled,

    /// The background execution path died before producing a result.
    #[error("prompt execution path failed: {0}")]
    Background(String),
}

impl PromptError {
    /// Returns `true` when the error only says the result was not observed in time.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Error returned by a [`Serializer`](crate::serialization::Serializer) that
/// cannot convert its raw input.
///
/// Inside a prompt this never reaches the caller: on user input it counts as
/// invalid input, on the default text it produces a printed diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    /// The input could not be parsed as the target type.
    #[error("'{input}' is not a valid {target}")]
    Parse { input: String, target: &'static str },

    /// Free-form failure from a user supplied serializer.
    #[error("{0}")]
    Custom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_error_messages() {
        let err = PromptError::Input(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.to_string(), "got irrecoverable input error: pipe closed");

        let err = PromptError::MissingKey { index: 2 };
        assert_eq!(
            err.to_string(),
            "'key' field is missing from one or more prompts (member #2)"
        );

        assert_eq!(PromptError::Cancelled.to_string(), "call was canceled");
        assert!(PromptError::Cancelled.is_cancelled());
        assert!(!PromptError::InputExhausted.is_cancelled());
    }

    #[test]
    fn test_serialize_error_messages() {
        let err = SerializeError::Parse {
            input: "abc".to_string(),
            target: "i64",
        };
        assert_eq!(err.to_string(), "'abc' is not a valid i64");
        assert_eq!(SerializeError::Custom("nope".into()).to_string(), "nope");
    }
}
