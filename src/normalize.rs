//! Loose text equality for utterance and entity comparison.
//!
//! NLU providers echo text back with differing whitespace, punctuation, and
//! casing. Comparing raw strings would flag those as mispredictions, so all
//! textual comparisons in this crate go through [`normalize`]: whitespace
//! runs collapse to a single space, characters that are neither word
//! characters nor spaces are dropped, and the result is trimmed. Equality is
//! then case-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w ]").expect("non-word pattern"));

/// Normalize a string for loose comparison.
///
/// Collapses whitespace runs to a single space, strips characters that are
/// neither word characters nor spaces, and trims. Idempotent: normalizing an
/// already-normalized string is a no-op.
///
/// # Example
///
/// ```
/// use nlu_compare::normalize;
///
/// assert_eq!(normalize("  What's  the\ttime? "), "Whats the time");
/// ```
#[must_use]
pub fn normalize(s: &str) -> String {
    let collapsed = WHITESPACE.replace_all(s, " ");
    let stripped = NON_WORD.replace_all(&collapsed, "");
    // Stripping punctuation can leave adjacent spaces behind ("a . b"), so
    // collapse once more before trimming.
    let recollapsed = WHITESPACE.replace_all(&stripped, " ");
    recollapsed.trim().to_string()
}

/// Loose, case-insensitive equality over normalized strings.
#[must_use]
pub fn equals_normalized(x: &str, y: &str) -> bool {
    normalize(x).to_lowercase() == normalize(y).to_lowercase()
}

/// Option-aware variant of [`equals_normalized`].
///
/// Two absent strings compare equal; absent never equals present.
#[must_use]
pub fn equals_normalized_opt(x: Option<&str>, y: Option<&str>) -> bool {
    match (x, y) {
        (None, None) => true,
        (Some(x), Some(y)) => equals_normalized(x, y),
        _ => false,
    }
}
