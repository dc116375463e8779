//! Closed JSON-like value tree for entity values and resolutions.
//!
//! Providers attach arbitrarily shaped structured values to entities (a
//! canonical string, a resolution object, a list of candidate readings).
//! Rather than passing a dynamic JSON library type through the comparison
//! engine, those values are held in a closed sum type so subtree containment
//! and scalar extraction are exhaustive matches. Serde conversion to and
//! from the JSON wire form happens at the corpus boundary only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A JSON-like structured value: scalar, ordered list, or string-keyed map.
///
/// Numbers are held as `f64`; corpus values are provider confidence scores
/// and small resolution payloads, well within `f64` range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(f64),
    /// JSON string.
    String(String),
    /// JSON array.
    Array(Vec<Value>),
    /// JSON object. Keys compare ordinally.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the scalar string if this value is a plain string.
    ///
    /// Non-string values yield `None`, which never compares equal in the
    /// matcher's textual rules.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value is JSON `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Compact JSON rendering, used when building test case names.
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "null".to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// Structural "expected is implied by actual" comparison.
///
/// - An absent expected value is no constraint at all.
/// - An absent actual value satisfies nothing.
/// - Maps: every expected key must be present in the actual map with a
///   recursively-containing value; extra actual keys are ignored.
/// - Arrays: every expected element must have at least one actual element
///   that recursively contains it. Order is not asserted, and actual
///   elements may satisfy more than one expected element.
/// - Anything else: exact equality. Mixed structural types never match.
///
/// # Example
///
/// ```
/// use nlu_compare::{contains_subtree, Value};
///
/// let expected: Value = serde_json::from_str(r#"{"unit":"hour"}"#).unwrap();
/// let actual: Value = serde_json::from_str(r#"{"unit":"hour","value":3}"#).unwrap();
/// assert!(contains_subtree(Some(&expected), Some(&actual)));
/// assert!(!contains_subtree(Some(&actual), Some(&expected)));
/// ```
#[must_use]
pub fn contains_subtree(expected: Option<&Value>, actual: Option<&Value>) -> bool {
    let expected = match expected {
        None => return true,
        Some(expected) => expected,
    };
    let actual = match actual {
        None => return false,
        Some(actual) => actual,
    };

    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => expected
            .iter()
            .all(|(key, value)| contains_subtree(Some(value), actual.get(key))),
        (Value::Array(expected), Value::Array(actual)) => expected.iter().all(|expected_item| {
            actual
                .iter()
                .any(|actual_item| contains_subtree(Some(expected_item), Some(actual_item)))
        }),
        (Value::Object(_), _) | (Value::Array(_), _) => false,
        _ => expected == actual,
    }
}
