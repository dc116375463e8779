//! # nlu-compare
//!
//! Confusion-matrix accuracy evaluation for NLU model predictions.
//!
//! Given two parallel corpora of labeled utterances — a ground-truth
//! corpus and one produced by a model under test — the engine classifies
//! every aligned pair into per-facet outcomes and aggregates them into
//! precision/recall/F1 statistics:
//!
//! - **Text**: loose transcription equality (whitespace, punctuation, and
//!   case collapsed).
//! - **Intent**: intent name equality, with `"None"` as the no-intent
//!   sentinel.
//! - **Entity**: entity presence, matched by type plus occurrence-indexed
//!   text or canonical value.
//! - **EntityValue** / **EntityResolution**: structural subtree containment
//!   of the expected value within an actual one.
//!
//! ## Quick start
//!
//! ```rust
//! use nlu_compare::{compare_corpora, Entity, LabeledUtterance};
//!
//! let expected = vec![LabeledUtterance::new(
//!     Some("play something by the beatles"),
//!     Some("PlayMusic"),
//!     Some(vec![Entity::new("artist", Some("the beatles"), 0)]),
//! )];
//! let actual = expected.clone();
//!
//! let results = compare_corpora(&expected, &actual).unwrap();
//! let statistics = results.statistics();
//! assert_eq!(statistics.intent.true_positive, 1);
//! assert_eq!(statistics.by_entity_type["artist"].true_positive, 1);
//! assert!((statistics.entity.f1() - 1.0).abs() < 1e-10);
//! ```
//!
//! ## Design
//!
//! - The engine is a pure, synchronous computation: no network, no shared
//!   mutable state, no partial reports. Corpus loading lives at the edge in
//!   [`load_utterances`].
//! - Utterance pairs are independent; enable the `parallel` feature to fan
//!   the comparison across threads with rayon. Aggregation is an unordered
//!   reduction, so the result is identical either way.
//! - Structured entity values are held in a closed [`Value`] sum type so
//!   subtree containment and scalar extraction are exhaustive matches.
//! - Occurrence counting (which repetition of a matched substring an entity
//!   denotes) is ordinal and case-sensitive in both codec directions, which
//!   makes span encoding and decoding exact inverses.

#![warn(missing_docs)]

mod compare;
mod corpus;
mod error;
mod matcher;
mod matrix;
mod normalize;
mod offset;
mod report;
mod statistics;
mod test_case;
mod utterance;
mod value;

pub use compare::{
    compare_corpora, compare_corpora_with_options, compare_pair, CompareOptions, CompareResults,
};
pub use corpus::load_utterances;
pub use error::{Error, Result};
pub use matcher::is_entity_match;
pub use matrix::ConfusionMatrix;
pub use normalize::{equals_normalized, equals_normalized_opt, normalize};
pub use offset::{start_char_index, MatchPosition};
pub use report::render_statistics;
pub use statistics::NluStatistics;
pub use test_case::{ResultKind, TargetKind, TestCase};
pub use utterance::{Entity, LabeledUtterance};
pub use value::{contains_subtree, Value};
