//! # Output Serializers
//!
//! A serializer converts the accepted raw text of a prompt into a typed
//! [`Answer`]. Serializers are plain shared closures so they can be attached
//! to any number of prompts and moved onto a background execution path.
//!
//! A serializer has three possible outcomes:
//! - `Ok(Some(answer))`: the prompt returns `answer`.
//! - `Ok(None)`: no value could be produced; the input is treated as invalid.
//! - `Err(_)`: the input is treated as invalid (or, for the default text, a
//!   diagnostic is printed).
//!
//! ## Example
//! ```rust,no_run
//! use promptline::{Answer, Prompt, SerializeError, serialization};
//!
//! let age = Prompt::new("Age").serializer(serialization::unsigned());
//!
//! // Custom conversion
//! let upper = Prompt::new("Code").serializer(serialization::serializer(|s| {
//!     if s.is_ascii() {
//!         Ok(Some(Answer::Text(s.to_ascii_uppercase())))
//!     } else {
//!         Err(SerializeError::Custom("ascii only".to_string()))
//!     }
//! }));
//! ```
use std::{net::IpAddr, str::FromStr, sync::Arc};

use crate::{answer::Answer, error::SerializeError};

/// Shared raw-text to [`Answer`] conversion.
pub type Serializer =
    Arc<dyn Fn(&str) -> Result<Option<Answer>, SerializeError> + Send + Sync + 'static>;

/// Wraps a closure into a [`Serializer`].
pub fn serializer<F>(f: F) -> Serializer
where
    F: Fn(&str) -> Result<Option<Answer>, SerializeError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Builds a serializer from any [`FromStr`] type.
///
/// `target` names the type in the resulting [`SerializeError::Parse`].
pub fn parsed<T, F>(target: &'static str, wrap: F) -> Serializer
where
    T: FromStr + 'static,
    F: Fn(T) -> Answer + Send + Sync + 'static,
{
    serializer(move |input| match input.parse::<T>() {
        Ok(value) => Ok(Some(wrap(value))),
        Err(_) => Err(SerializeError::Parse {
            input: input.to_string(),
            target,
        }),
    })
}

/// Identity conversion. This is what a prompt does when no serializer is set.
pub fn text() -> Serializer {
    serializer(|input| Ok(Some(Answer::Text(input.to_string()))))
}

pub fn boolean() -> Serializer {
    parsed::<bool, _>("bool", Answer::Bool)
}

pub fn integer() -> Serializer {
    parsed::<i64, _>("i64", Answer::Integer)
}

pub fn unsigned() -> Serializer {
    parsed::<u64, _>("u64", Answer::Unsigned)
}

pub fn float() -> Serializer {
    parsed::<f64, _>("f64", Answer::Float)
}

/// Parses IPv4 and IPv6 addresses.
pub fn ip() -> Serializer {
    parsed::<IpAddr, _>("ip address", Answer::Ip)
}
