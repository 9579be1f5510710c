//! # Answers
//!
//! Typed values produced by a prompt once its raw input has been accepted
//! and serialized. An absent value (the `allow_nil` outcome) is represented
//! as `Option<Answer>::None` everywhere in the crate, never as an empty
//! [`Answer::Text`].
use std::{fmt::Display, net::IpAddr};

#[cfg(feature = "serde")]
use serde::Serialize;

/// The serialized value of a prompt.
///
/// Without a serializer every accepted input becomes [`Answer::Text`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum Answer {
    Text(String),
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Ip(IpAddr),
}

impl Answer {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as `i64`, widening [`Answer::Unsigned`] when it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Unsigned(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Unsigned(n) => Some(*n),
            Self::Integer(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_ip(&self) -> Option<IpAddr> {
        match self {
            Self::Ip(ip) => Some(*ip),
            _ => None,
        }
    }
}

impl Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Unsigned(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Ip(ip) => write!(f, "{}", ip),
        }
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_answer_accessors() {
        assert_eq!(Answer::from("Bobby").as_str(), Some("Bobby"));
        assert_eq!(Answer::Bool(true).as_bool(), Some(true));
        assert_eq!(Answer::Integer(-3).as_i64(), Some(-3));
        assert_eq!(Answer::Integer(-3).as_u64(), None);
        assert_eq!(Answer::Unsigned(7).as_i64(), Some(7));
        assert_eq!(Answer::Unsigned(u64::MAX).as_i64(), None);
        assert_eq!(Answer::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Answer::Text("1".into()).as_i64(), None);

        let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(Answer::Ip(ip).as_ip(), Some(ip));
    }

    #[test]
    fn test_answer_display() {
        assert_eq!(Answer::from("Sarah").to_string(), "Sarah");
        assert_eq!(Answer::Integer(42).to_string(), "42");
        assert_eq!(
            Answer::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST)).to_string(),
            "127.0.0.1"
        );
    }
}
