//! # Prompt Sequences
//!
//! A [`PromptSequence`] shows several prompts one after the other and
//! collects their answers into [`Responses`], keyed by each prompt's result
//! key and kept in declaration order.
//!
//! ## Failure discipline
//!
//! Execution is sequential, not transactional:
//! - a member with an empty key stops the sequence with
//!   [`PromptError::MissingKey`]; members before it have already been shown;
//! - an irrecoverable read error on any member stops the sequence and is
//!   returned as is;
//! - in both cases no partial [`Responses`] are returned.
//!
//! ## Example
//! ```rust,no_run
//! use promptline::{Prompt, PromptSequence};
//!
//! let responses = PromptSequence::new([
//!     Prompt::new("Name").key("name"),
//!     Prompt::new("Age").key("age"),
//! ])
//! .execute()?;
//!
//! println!("Hello {}!", responses.get("name").unwrap());
//! # Ok::<(), promptline::PromptError>(())
//! ```
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::{
    answer::Answer,
    error::{PromptError, Result},
    prompt::Prompt,
};

/// Ordered list of prompts executed in series.
#[derive(Debug, Clone, Default)]
pub struct PromptSequence {
    prompts: Vec<Prompt>,
}

impl PromptSequence {
    pub fn new<I>(prompts: I) -> Self
    where
        I: IntoIterator<Item = Prompt>,
    {
        Self {
            prompts: prompts.into_iter().collect(),
        }
    }

    /// Appends a prompt at the end of the sequence.
    #[must_use]
    pub fn then(mut self, prompt: Prompt) -> Self {
        self.prompts.push(prompt);
        self
    }

    pub fn push(&mut self, prompt: Prompt) {
        self.prompts.push(prompt);
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prompt> {
        self.prompts.iter()
    }

    /// Runs every prompt in order and returns all answers.
    ///
    /// Blocks until every prompt has been answered.
    pub fn execute(&self) -> Result<Responses> {
        let mut responses = Responses::with_capacity(self.prompts.len());

        for (index, prompt) in self.prompts.iter().enumerate() {
            let key = prompt.result_key();
            if key.is_empty() {
                warn!(index, message = %prompt.message(), "prompt in sequence has no result key");
                return Err(PromptError::MissingKey { index });
            }

            let answer = prompt.execute().inspect_err(|err| {
                debug!(index, key, error = %err, "sequence aborted");
            })?;
            responses.insert(key, answer);
        }

        Ok(responses)
    }
}

impl FromIterator<Prompt> for PromptSequence {
    fn from_iter<T: IntoIterator<Item = Prompt>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Answers of a [`PromptSequence`], in the order the prompts were declared.
///
/// A key maps to `None` when its prompt allowed an empty answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Responses {
    entries: Vec<(String, Option<Answer>)>,
}

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Records `answer` under `key`. A repeated key keeps its original
    /// position and takes the newest answer.
    pub fn insert(&mut self, key: impl Into<String>, answer: Option<Answer>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = answer,
            None => self.entries.push((key, answer)),
        }
    }

    /// The answer stored under `key`. `None` both for unknown keys and for
    /// absent answers; use [`contains_key`](Self::contains_key) to tell them apart.
    pub fn get(&self, key: &str) -> Option<&Answer> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, answer)| answer.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Answer>)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), a.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_map(self) -> HashMap<String, Option<Answer>> {
        self.entries.into_iter().collect()
    }
}

impl IntoIterator for Responses {
    type Item = (String, Option<Answer>);
    type IntoIter = std::vec::IntoIter<(String, Option<Answer>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(feature = "serde")]
impl Serialize for Responses {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, answer) in &self.entries {
            map.serialize_entry(key, answer)?;
        }
        map.end()
    }
}
