//! Entity identity matching.
//!
//! Decides whether an expected and an actual entity refer to the same
//! occurrence in an utterance. Providers differ in what they return: some
//! give the matched text plus occurrence index, some only a canonical value
//! string, some only one side or the other. Four textual rules cover those
//! shapes. Deeper structural comparison of values and resolutions is the
//! EntityValue/EntityResolution facets' job, not the matcher's.

use crate::normalize::equals_normalized;
use crate::utterance::Entity;
use crate::value::Value;

/// Whether two entities refer to the same occurrence.
///
/// True iff the entity types are equal and at least one textual rule holds:
///
/// 1. matched texts are loosely equal and the occurrence indices agree;
/// 2. the expected matched text loosely equals the actual entity's string
///    value (providers that omit matched text and return a canonical value);
/// 3. the string values are loosely equal;
/// 4. the expected string value loosely equals the actual matched text
///    (false-positive-only entities where only the actual side has text).
///
/// A non-string structured value has no string value and never satisfies
/// rules 2-4. Occurrence index equality in rule 1 is exact.
#[must_use]
pub fn is_entity_match(expected: &Entity, actual: &Entity) -> bool {
    if expected.entity_type != actual.entity_type {
        return false;
    }

    let expected_text = expected.match_text.as_deref();
    let actual_text = actual.match_text.as_deref();
    let expected_value = string_value(expected.entity_value.as_ref());
    let actual_value = string_value(actual.entity_value.as_ref());

    (text_eq(expected_text, actual_text) && expected.match_index == actual.match_index)
        || text_eq(expected_text, actual_value)
        || text_eq(expected_value, actual_value)
        || text_eq(expected_value, actual_text)
}

/// Loose equality where an absent side never matches.
fn text_eq(x: Option<&str>, y: Option<&str>) -> bool {
    matches!((x, y), (Some(x), Some(y)) if equals_normalized(x, y))
}

fn string_value(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}
