//! Dynamically typed values with permissive numeric coercion.
//!
//! [`Value`] is the payload type for atomic references that hold
//! loosely typed data — counters that start out null, cache entries
//! that may be text or numbers. The numeric view ([`Value::as_number`])
//! follows the coercion rules of dynamically typed hosts: anything
//! non-numeric becomes NaN rather than an error.
//!
//! No IO, no async — plain data only.

use serde::{Deserialize, Serialize};

/// A dynamically typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// The uninitialized state.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value.
    ///
    /// `Null` is zero, booleans are 0/1, text parses as a number when it
    /// can (blank text is zero) and is NaN otherwise. Never fails.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(flag) => f64::from(u8::from(*flag)),
            Self::Number(number) => *number,
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// Whether the value is an actual number (not merely coercible).
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_coerces_to_zero() {
        assert_eq!(Value::Null.as_number(), 0.0);
    }

    #[test]
    fn bools_coerce_to_zero_and_one() {
        assert_eq!(Value::Bool(false).as_number(), 0.0);
        assert_eq!(Value::Bool(true).as_number(), 1.0);
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(Value::Number(42.5).as_number(), 42.5);
        assert!(Value::Number(f64::NAN).as_number().is_nan());
    }

    #[test]
    fn numeric_text_parses() {
        assert_eq!(Value::from("5").as_number(), 5.0);
        assert_eq!(Value::from("  -2.5 ").as_number(), -2.5);
    }

    #[test]
    fn blank_text_is_zero() {
        assert_eq!(Value::from("").as_number(), 0.0);
        assert_eq!(Value::from("   ").as_number(), 0.0);
    }

    #[test]
    fn non_numeric_text_is_nan() {
        assert!(Value::from("abc").as_number().is_nan());
        assert!(Value::from("12px").as_number().is_nan());
    }

    #[test]
    fn default_is_null() {
        assert!(Value::default().is_null());
    }

    #[test]
    fn serde_round_trip() {
        let values = vec![
            Value::Null,
            Value::Bool(true),
            Value::Number(3.25),
            Value::from("hello"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
