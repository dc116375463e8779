//! Entity position codec.
//!
//! Providers serialize an entity occurrence in one of two ways:
//!
//! - a character span: `startPos`/`endPos` offsets into the utterance text;
//! - an occurrence-indexed pair: the matched substring plus the zero-based
//!   index of *which* occurrence of that substring the entity denotes.
//!
//! The second form exists because some providers return only the matched
//! text, never offsets. This module is the single place the two
//! representations are reconciled. Both directions use the same ordinal,
//! case-sensitive, left-to-right occurrence enumeration, which makes the
//! pair a true inverse: for every valid span,
//! `MatchPosition::from_span(s, e, text).start_char_index(text) == s`.
//!
//! All offsets are character offsets, not byte offsets; `endPos` is
//! inclusive, matching the corpus wire format.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Occurrence-indexed position of a matched substring within an utterance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPosition {
    /// The matched substring, taken verbatim from the utterance.
    pub match_text: String,
    /// Zero-based index of which occurrence of `match_text` this is,
    /// counting left to right.
    pub match_index: usize,
}

impl MatchPosition {
    /// Encode an inclusive character span as an occurrence-indexed position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] unless
    /// `start_pos <= end_pos < utterance.chars().count()`.
    ///
    /// # Example
    ///
    /// ```
    /// use nlu_compare::MatchPosition;
    ///
    /// let position = MatchPosition::from_span(8, 10, "the cat the cat").unwrap();
    /// assert_eq!(position.match_text, "the");
    /// assert_eq!(position.match_index, 1);
    /// ```
    pub fn from_span(start_pos: usize, end_pos: usize, utterance: &str) -> Result<Self> {
        let chars: Vec<char> = utterance.chars().collect();
        if start_pos > end_pos || end_pos >= chars.len() {
            return Err(Error::InvalidRange {
                start_pos: start_pos as i64,
                end_pos: end_pos as i64,
                utterance: utterance.to_string(),
            });
        }

        let needle = &chars[start_pos..=end_pos];
        // Count occurrences strictly before start_pos. The needle is taken
        // verbatim from the utterance at start_pos, so the scan always
        // terminates there.
        let mut match_index = 0;
        let mut pos = 0;
        while let Some(found) = find_from(&chars, needle, pos) {
            if found >= start_pos {
                break;
            }
            match_index += 1;
            pos = found + 1;
        }

        Ok(MatchPosition {
            match_text: needle.iter().collect(),
            match_index,
        })
    }

    /// Decode this position back to the start character offset of the
    /// occurrence it denotes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntityNotFound`] if the utterance contains fewer
    /// than `match_index + 1` occurrences of `match_text`.
    pub fn start_char_index(&self, utterance: &str) -> Result<usize> {
        start_char_index(&self.match_text, self.match_index, utterance)
    }
}

/// Find the start character offset of the `(match_index + 1)`-th occurrence
/// of `match_text` in `utterance`, scanning left to right.
///
/// # Errors
///
/// Returns [`Error::EntityNotFound`] if not enough occurrences exist. An
/// empty `match_text` never resolves.
pub fn start_char_index(match_text: &str, match_index: usize, utterance: &str) -> Result<usize> {
    let chars: Vec<char> = utterance.chars().collect();
    let needle: Vec<char> = match_text.chars().collect();

    if !needle.is_empty() {
        let mut seen = 0;
        let mut pos = 0;
        while let Some(found) = find_from(&chars, &needle, pos) {
            if seen == match_index {
                return Ok(found);
            }
            seen += 1;
            pos = found + 1;
        }
    }

    Err(Error::EntityNotFound {
        match_text: match_text.to_string(),
        match_index,
        utterance: utterance.to_string(),
    })
}

/// First occurrence of `needle` in `haystack` at or after `from`, by
/// ordinal, case-sensitive comparison of character slices.
fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&pos| &haystack[pos..pos + needle.len()] == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_first_occurrence() {
        let position = MatchPosition::from_span(0, 2, "the cat the cat").unwrap();
        assert_eq!(position.match_text, "the");
        assert_eq!(position.match_index, 0);
    }

    #[test]
    fn encodes_repeated_occurrence() {
        let position = MatchPosition::from_span(12, 14, "the cat the cat").unwrap();
        assert_eq!(position.match_text, "cat");
        assert_eq!(position.match_index, 1);
    }

    #[test]
    fn occurrence_counting_is_case_sensitive() {
        // "The" at 0 does not count as an occurrence of "the".
        let position = MatchPosition::from_span(8, 10, "The cat the cat").unwrap();
        assert_eq!(position.match_text, "the");
        assert_eq!(position.match_index, 0);
    }

    #[test]
    fn rejects_invalid_ranges() {
        assert!(matches!(
            MatchPosition::from_span(3, 2, "hello"),
            Err(Error::InvalidRange { start_pos: 3, end_pos: 2, .. })
        ));
        assert!(matches!(
            MatchPosition::from_span(0, 5, "hello"),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn decodes_indexed_occurrence() {
        assert_eq!(start_char_index("the", 0, "the cat the cat").unwrap(), 0);
        assert_eq!(start_char_index("the", 1, "the cat the cat").unwrap(), 8);
    }

    #[test]
    fn decode_fails_when_occurrence_missing() {
        assert!(matches!(
            start_char_index("the", 2, "the cat the cat"),
            Err(Error::EntityNotFound { match_index: 2, .. })
        ));
        assert!(matches!(
            start_char_index("dog", 0, "the cat"),
            Err(Error::EntityNotFound { .. })
        ));
    }

    #[test]
    fn empty_match_text_never_resolves() {
        assert!(start_char_index("", 0, "the cat").is_err());
    }

    #[test]
    fn spans_are_character_offsets() {
        // "café" is 4 chars but 5 bytes; offsets count chars.
        let position = MatchPosition::from_span(4, 7, "the café café").unwrap();
        assert_eq!(position.match_text, "café");
        assert_eq!(position.match_index, 0);
        assert_eq!(position.start_char_index("the café café").unwrap(), 4);
    }

    #[test]
    fn overlapping_repeats_round_trip() {
        let text = "aaa";
        let position = MatchPosition::from_span(1, 2, text).unwrap();
        assert_eq!(position.match_text, "aa");
        assert_eq!(position.start_char_index(text).unwrap(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn text_and_span() -> impl Strategy<Value = (String, usize, usize)> {
        // A narrow alphabet makes repeated and overlapping substrings common.
        "[ab ]{1,16}".prop_flat_map(|text| {
            let len = text.chars().count();
            (Just(text), 0..len).prop_flat_map(move |(text, start)| {
                (Just(text), Just(start), start..len)
            })
        })
    }

    proptest! {
        #[test]
        fn span_round_trips((text, start, end) in text_and_span()) {
            let position = MatchPosition::from_span(start, end, &text).unwrap();
            prop_assert_eq!(position.start_char_index(&text).unwrap(), start);
        }

        #[test]
        fn match_text_is_the_spanned_substring((text, start, end) in text_and_span()) {
            let position = MatchPosition::from_span(start, end, &text).unwrap();
            let expected: String = text.chars().skip(start).take(end - start + 1).collect();
            prop_assert_eq!(position.match_text, expected);
        }
    }
}
