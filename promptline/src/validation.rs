//! # Input Validation
//!
//! This module provides the validation layer used by every [`Prompt`](crate::Prompt).
//! A [`Validator`] is a shared predicate over the raw (already trimmed) input;
//! when a prompt has both a validator and a regex pattern, both must accept.
//!
//! ## Features
//! - Closure validators via [`validator`]
//! - Logical-AND composition with [`chain`] (short-circuits on the first rejection)
//! - Ready-made checks: [`min_len`], [`max_len`], [`ip_address`],
//!   [`alpha_numeric`], [`letters_only`], [`numbers_only`], [`single_digit`]
//! - Declarative filters with human-readable failure reasons via [`Rule`]
//!
//! ## Examples
//!
//! ### Compose validators
//! ```rust,no_run
//! use promptline::{Prompt, validation};
//!
//! let name = Prompt::new("Full Name").validator(validation::chain([
//!     validation::min_len(2),
//!     validation::max_len(32),
//! ]));
//! ```
//!
//! ### Rules
//! ```rust,no_run
//! use promptline::{Prompt, validation::{self, Rule, ValueKind}};
//!
//! let threads = Prompt::new("Threads (1-16)").validator(validation::rules(vec![
//!     Rule::IsType(ValueKind::Byte),
//!     Rule::IsBetween(1, 16),
//! ]));
//! ```
use std::{
    fmt::Display,
    net::IpAddr,
    str::FromStr,
    sync::{Arc, LazyLock},
};

use regex::Regex;
use thiserror::Error;
use tracing::trace;

static LETTERS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]*$").expect("static pattern"));
static NUMBERS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]*[0-9]+$").expect("static pattern"));
static ALPHA_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]*$").expect("static pattern"));
static SINGLE_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]$").expect("static pattern"));

/// Shared predicate over raw input text.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync + 'static>;

/// Wraps a closure into a [`Validator`].
pub fn validator<F>(f: F) -> Validator
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Combines validators with a logical AND.
///
/// Validators run in order and the first rejection stops the chain.
/// An empty chain accepts everything.
pub fn chain<I>(validators: I) -> Validator
where
    I: IntoIterator<Item = Validator>,
{
    let validators: Vec<Validator> = validators.into_iter().collect();
    Arc::new(move |input: &str| validators.iter().all(|v| v(input)))
}

/// Accepts input with at least `min` characters.
pub fn min_len(min: usize) -> Validator {
    validator(move |input| input.chars().count() >= min)
}

/// Accepts input with at most `max` characters.
pub fn max_len(max: usize) -> Validator {
    validator(move |input| input.chars().count() <= max)
}

/// Accepts IPv4 and IPv6 addresses.
pub fn ip_address() -> Validator {
    validator(|input| input.parse::<IpAddr>().is_ok())
}

pub fn alpha_numeric() -> Validator {
    validator(|input| ALPHA_NUMERIC.is_match(input))
}

pub fn letters_only() -> Validator {
    validator(|input| LETTERS_ONLY.is_match(input))
}

pub fn numbers_only() -> Validator {
    validator(|input| NUMBERS_ONLY.is_match(input))
}

pub fn single_digit() -> Validator {
    validator(|input| SINGLE_DIGIT.is_match(input))
}

/// Turns a list of [`Rule`]s into a [`Validator`].
///
/// The failure reason of the first rejecting rule is emitted as a trace event.
pub fn rules(rules: Vec<Rule>) -> Validator {
    validator(move |input| match Rule::check_all(input, &rules) {
        Ok(()) => true,
        Err(reason) => {
            trace!(%reason, "input rejected by rule");
            false
        }
    })
}

/// A declarative validation filter.
///
/// - `MatchString`: the input must equal a specific string.
/// - `MatchStrings`: the input must equal one of the given options.
/// - `IsType`: the input must parse as a [`ValueKind`].
/// - `IsBetween`: the input must be an integer within the inclusive range `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    MatchString(String),
    MatchStrings(Vec<String>),
    IsType(ValueKind),
    IsBetween(i64, i64),
}

/// Why a [`Rule`] rejected its input.
///
/// Messages never quote the input, so a reason is safe to log for masked prompts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("expected {0}")]
    WrongKind(ValueKind),
    #[error("expected exactly '{0}'")]
    Mismatch(String),
    #[error("expected one of: {}", .0.join(", "))]
    NotAnOption(Vec<String>),
    #[error("expected a number from {min} to {max}")]
    OutOfRange { min: i64, max: i64 },
}

impl Rule {
    /// Checks a single rule against the input.
    pub fn check(&self, input: &str) -> Result<(), RuleError> {
        match self {
            Rule::IsType(kind) if kind.accepts(input) => Ok(()),
            Rule::IsType(kind) => Err(RuleError::WrongKind(*kind)),
            Rule::MatchString(expected) if input == expected => Ok(()),
            Rule::MatchString(expected) => Err(RuleError::Mismatch(expected.clone())),
            Rule::MatchStrings(options) if options.iter().any(|o| o == input) => Ok(()),
            Rule::MatchStrings(options) => Err(RuleError::NotAnOption(options.clone())),
            Rule::IsBetween(min, max) => match input.parse::<i64>() {
                Ok(n) if (*min..=*max).contains(&n) => Ok(()),
                Ok(_) => Err(RuleError::OutOfRange {
                    min: *min,
                    max: *max,
                }),
                Err(_) => Err(RuleError::WrongKind(ValueKind::Integer)),
            },
        }
    }

    /// Runs every rule in order and returns the first failure.
    pub fn check_all(input: &str, rules: &[Rule]) -> Result<(), RuleError> {
        rules.iter().try_for_each(|rule| rule.check(input))
    }
}

/// Kind of value an input must parse as, used with [`Rule::IsType`].
///
/// The kinds line up with the built-in serializers, so a rule can vet input
/// before a serializer of the same kind converts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    /// Any `i64`.
    Integer,
    /// Any `u64`.
    Unsigned,
    /// Unsigned integer that fits in a byte.
    Byte,
    /// TCP/UDP port number.
    Port,
    Float,
    Ip,
}

impl ValueKind {
    fn accepts(self, input: &str) -> bool {
        match self {
            ValueKind::Bool => parses_as::<bool>(input),
            ValueKind::Integer => parses_as::<i64>(input),
            ValueKind::Unsigned => parses_as::<u64>(input),
            ValueKind::Byte => parses_as::<u8>(input),
            ValueKind::Port => parses_as::<u16>(input),
            ValueKind::Float => parses_as::<f64>(input),
            ValueKind::Ip => parses_as::<IpAddr>(input),
        }
    }
}

fn parses_as<T: FromStr>(input: &str) -> bool {
    input.parse::<T>().is_ok()
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValueKind::Bool => "true or false",
            ValueKind::Integer => "a whole number",
            ValueKind::Unsigned => "a non-negative whole number",
            ValueKind::Byte => "a number from 0 to 255",
            ValueKind::Port => "a port number",
            ValueKind::Float => "a number",
            ValueKind::Ip => "an ip address",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_requires_every_validator() {
        let v = chain([
            validator(|s| s.contains("test")),
            validator(|s| s.contains("bob")),
        ]);
        assert!(!v("hello"));
        assert!(!v("test"));
        assert!(!v("bob"));
        assert!(v("bob likes to test"));
    }

    #[test]
    fn test_empty_chain_accepts() {
        let v = chain(Vec::new());
        assert!(v(""));
        assert!(v("anything"));
    }

    #[test]
    fn test_len_validators_count_chars() {
        let v = chain([min_len(2), max_len(4)]);
        assert!(!v("a"));
        assert!(v("ab"));
        assert!(v("ñañá"));
        assert!(!v("abcde"));
    }

    #[test]
    fn test_ip_address_validator() {
        let v = ip_address();
        assert!(v("10.0.0.1"));
        assert!(v("2001:4860:4860::8888"));
        assert!(!v("10.0.0"));
        assert!(!v("localhost"));
    }

    #[test]
    fn test_character_class_validators() {
        assert!(letters_only()("Bobby"));
        assert!(!letters_only()("Bobby1"));
        assert!(alpha_numeric()("Bobby1"));
        assert!(!alpha_numeric()("Bobby 1"));
        assert!(numbers_only()("0"));
        assert!(numbers_only()("150"));
        assert!(!numbers_only()(""));
        assert!(!numbers_only()("-1"));
        assert!(single_digit()("7"));
        assert!(!single_digit()("77"));
    }

    #[test]
    fn test_rule_match_string() {
        let rule = Rule::MatchString("hello".to_string());
        assert!(rule.check("hello").is_ok());
        assert_eq!(
            rule.check("world").unwrap_err().to_string(),
            "expected exactly 'hello'"
        );
    }

    #[test]
    fn test_rule_match_strings() {
        let rule = Rule::MatchStrings(vec!["A".to_string(), "B".to_string()]);
        assert!(rule.check("A").is_ok());
        assert!(rule.check("B").is_ok());
        assert_eq!(rule.check("C").unwrap_err().to_string(), "expected one of: A, B");
    }

    #[test]
    fn test_rule_is_type() {
        let byte = Rule::IsType(ValueKind::Byte);
        assert!(byte.check("42").is_ok());
        assert!(byte.check("-42").is_err());
        assert_eq!(byte.check("256"), Err(RuleError::WrongKind(ValueKind::Byte)));

        assert!(Rule::IsType(ValueKind::Bool).check("maybe").is_err());
        assert!(Rule::IsType(ValueKind::Port).check("8080").is_ok());
        assert!(Rule::IsType(ValueKind::Port).check("70000").is_err());
        assert!(Rule::IsType(ValueKind::Float).check("2.5").is_ok());
        assert!(Rule::IsType(ValueKind::Ip).check("::1").is_ok());
        assert!(Rule::IsType(ValueKind::Unsigned).check("-1").is_err());
    }

    #[test]
    fn test_rule_is_between() {
        let rule = Rule::IsBetween(10, 20);
        assert!(rule.check("10").is_ok());
        assert!(rule.check("20").is_ok());
        assert_eq!(
            rule.check("25").unwrap_err(),
            RuleError::OutOfRange { min: 10, max: 20 }
        );
        assert_eq!(
            rule.check("ten").unwrap_err(),
            RuleError::WrongKind(ValueKind::Integer)
        );
    }

    #[test]
    fn test_rule_errors_never_quote_input() {
        let rules = [
            Rule::MatchString("yes".to_string()),
            Rule::IsType(ValueKind::Port),
            Rule::IsBetween(0, 9),
        ];
        for rule in &rules {
            let reason = rule.check("s3cr3t").unwrap_err().to_string();
            assert!(!reason.contains("s3cr3t"), "{reason}");
        }
    }

    #[test]
    fn test_check_all_stops_at_first_failure() {
        let filters = vec![
            Rule::IsType(ValueKind::Byte),
            Rule::IsType(ValueKind::Bool),
        ];
        assert_eq!(
            Rule::check_all("true", &filters).unwrap_err().to_string(),
            "expected a number from 0 to 255"
        );
    }

    #[test]
    fn test_rules_validator() {
        let v = rules(vec![
            Rule::IsType(ValueKind::Unsigned),
            Rule::IsBetween(1, 16),
        ]);
        assert!(v("8"));
        assert!(!v("0"));
        assert!(!v("eight"));
    }
}
