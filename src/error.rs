//! Error types for nlu-compare.

use thiserror::Error;

/// Result type for nlu-compare operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for nlu-compare operations.
///
/// Classification itself never fails; an entity that does not line up is a
/// `FalseNegative`/`FalsePositive` outcome, not an error. Errors are reserved
/// for caller misuse (mismatched corpora) and corrupt corpus data (invalid
/// spans, unresolvable occurrences), and abort the run before any partial
/// statistics are produced.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Expected and actual corpora have different lengths.
    #[error("expected the same number of utterances in the expected and actual sources, found {expected} and {actual}")]
    CorpusLengthMismatch {
        /// Number of utterances in the expected corpus.
        expected: usize,
        /// Number of utterances in the actual corpus.
        actual: usize,
    },

    /// A character span violates the bounds of its utterance.
    #[error("invalid start position '{start_pos}' or end position '{end_pos}' for utterance '{utterance}'")]
    InvalidRange {
        /// Start character offset (inclusive).
        start_pos: i64,
        /// End character offset (inclusive).
        end_pos: i64,
        /// The utterance text the span was taken against.
        utterance: String,
    },

    /// The requested occurrence of a matched substring does not exist.
    #[error("unable to find occurrence {match_index} of '{match_text}' in utterance '{utterance}'")]
    EntityNotFound {
        /// Matched substring that was searched for.
        match_text: String,
        /// Zero-based occurrence index that was requested.
        match_index: usize,
        /// The utterance text that was searched.
        utterance: String,
    },

    /// IO error while reading a corpus file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
