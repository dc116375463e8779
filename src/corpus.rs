//! Corpus loading at the serialization boundary.
//!
//! The engine itself performs no I/O; this module is the one place a JSON
//! corpus file becomes a list of [`LabeledUtterance`]s. Span-form entities
//! are converted through the position codec entity by entity during
//! deserialization, so a corrupt span aborts the load before any
//! comparison begins.

use crate::utterance::LabeledUtterance;
use crate::Result;
use std::fs;
use std::path::Path;

/// Load a JSON array of labeled utterances from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a JSON array of
/// utterances, or contains an entity span that does not fit its utterance.
pub fn load_utterances(path: impl AsRef<Path>) -> Result<Vec<LabeledUtterance>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let utterances: Vec<LabeledUtterance> = serde_json::from_str(&contents)?;
    log::debug!("loaded {} utterances from {}", utterances.len(), path.display());
    Ok(utterances)
}
