//! Labeled utterance and entity value types.
//!
//! These are the inputs to the comparison engine: immutable value objects,
//! one [`LabeledUtterance`] per line of a corpus, each carrying zero or more
//! labeled [`Entity`] spans. The engine never mutates them.
//!
//! On the wire an entity appears either in occurrence-indexed form
//! (`matchText` + `matchIndex`) or in span form (`startPos` + `endPos`,
//! with `entity` as an accepted alias for `entityType`). The span form is
//! converted through the position codec during deserialization, so the rest
//! of the crate only ever sees occurrence-indexed entities.

use crate::offset::MatchPosition;
use crate::value::Value;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};

/// One labeled span in an utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Entity type name, e.g. `"PlaylistName"`.
    pub entity_type: String,
    /// Matched substring of the utterance text, if the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_text: Option<String>,
    /// Zero-based occurrence index of `match_text` within the utterance.
    pub match_index: usize,
    /// Structured entity value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_value: Option<Value>,
    /// Structured entity resolution, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_resolution: Option<Value>,
    /// Provider confidence score, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Entity {
    /// Create an entity with a type, optional matched text, and occurrence
    /// index. Value, resolution, and score start absent.
    #[must_use]
    pub fn new(entity_type: &str, match_text: Option<&str>, match_index: usize) -> Self {
        Entity {
            entity_type: entity_type.to_string(),
            match_text: match_text.map(str::to_string),
            match_index,
            entity_value: None,
            entity_resolution: None,
            score: None,
        }
    }

    /// Attach a structured entity value.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.entity_value = Some(value);
        self
    }

    /// Attach a structured entity resolution.
    #[must_use]
    pub fn with_resolution(mut self, resolution: Value) -> Self {
        self.entity_resolution = Some(resolution);
        self
    }

    /// Attach a provider confidence score.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Start character offset of this entity in `text`, for providers that
    /// require span offsets.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EntityNotFound`] if the entity has no matched
    /// text or the requested occurrence does not exist in `text`.
    pub fn start_char_index(&self, text: &str) -> Result<usize> {
        crate::offset::start_char_index(
            self.match_text.as_deref().unwrap_or_default(),
            self.match_index,
            text,
        )
    }
}

/// One labeled example: text, intent, and entities.
///
/// Expected and actual corpora are parallel lists of these; position `i` in
/// each refers to the same conceptual example.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledUtterance {
    /// Utterance text, if known.
    pub text: Option<String>,
    /// Intent name, if labeled. `"None"` is the no-intent sentinel.
    pub intent: Option<String>,
    /// Labeled entities, if any.
    pub entities: Option<Vec<Entity>>,
}

impl LabeledUtterance {
    /// Create a labeled utterance.
    #[must_use]
    pub fn new(text: Option<&str>, intent: Option<&str>, entities: Option<Vec<Entity>>) -> Self {
        LabeledUtterance {
            text: text.map(str::to_string),
            intent: intent.map(str::to_string),
            entities,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUtterance {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    entities: Option<Vec<RawEntity>>,
}

/// Wire-form entity accepting both the occurrence-indexed and the span
/// representation. Unrecognized provider fields are ignored here; anything
/// the engine compares must arrive in `entityValue`/`entityResolution`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntity {
    #[serde(default, alias = "entity")]
    entity_type: Option<String>,
    #[serde(default)]
    match_text: Option<String>,
    #[serde(default)]
    match_index: Option<usize>,
    #[serde(default)]
    start_pos: Option<i64>,
    #[serde(default)]
    end_pos: Option<i64>,
    #[serde(default)]
    entity_value: Option<Value>,
    #[serde(default)]
    entity_resolution: Option<Value>,
    #[serde(default)]
    score: Option<f64>,
}

impl RawUtterance {
    fn into_utterance(self) -> Result<LabeledUtterance> {
        let text = self.text;
        let entities = self
            .entities
            .map(|raw| {
                raw.into_iter()
                    .map(|entity| entity.into_entity(text.as_deref().unwrap_or_default()))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(LabeledUtterance {
            text,
            intent: self.intent,
            entities,
        })
    }
}

impl RawEntity {
    fn into_entity(self, utterance: &str) -> Result<Entity> {
        let (match_text, match_index) = match (self.match_text, self.start_pos, self.end_pos) {
            // Occurrence-indexed form wins when both are present.
            (Some(match_text), _, _) => (Some(match_text), self.match_index.unwrap_or(0)),
            (None, Some(start_pos), Some(end_pos)) => {
                if start_pos < 0 || end_pos < 0 {
                    return Err(crate::Error::InvalidRange {
                        start_pos,
                        end_pos,
                        utterance: utterance.to_string(),
                    });
                }
                let position =
                    MatchPosition::from_span(start_pos as usize, end_pos as usize, utterance)?;
                (Some(position.match_text), position.match_index)
            }
            _ => (None, self.match_index.unwrap_or(0)),
        };

        Ok(Entity {
            entity_type: self.entity_type.unwrap_or_default(),
            match_text,
            match_index,
            entity_value: self.entity_value,
            entity_resolution: self.entity_resolution,
            score: self.score,
        })
    }
}

impl<'de> Deserialize<'de> for LabeledUtterance {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawUtterance::deserialize(deserializer)?
            .into_utterance()
            .map_err(serde::de::Error::custom)
    }
}
