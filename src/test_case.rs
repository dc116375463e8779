//! Classified comparison outcomes.
//!
//! Each outcome is one confusion-matrix observation: a result kind, the
//! facet it belongs to, an optional group key for per-category aggregation,
//! and a stable human-readable test name. Outcomes double as pass/fail test
//! cases for report consumers: true kinds pass, false kinds fail.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confusion matrix bucket for one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    /// Expected and actual agree on a present label.
    TruePositive,
    /// Expected and actual agree on an absent label.
    TrueNegative,
    /// Actual reports a label the expected corpus does not have.
    FalsePositive,
    /// Actual misses a label the expected corpus has.
    FalseNegative,
}

impl ResultKind {
    /// True kinds map to passing test cases, false kinds to failing ones.
    #[must_use]
    pub fn is_pass(self) -> bool {
        matches!(self, ResultKind::TruePositive | ResultKind::TrueNegative)
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultKind::TruePositive => "TruePositive",
            ResultKind::TrueNegative => "TrueNegative",
            ResultKind::FalsePositive => "FalsePositive",
            ResultKind::FalseNegative => "FalseNegative",
        };
        f.write_str(name)
    }
}

/// Comparison facet an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// Transcribed utterance text.
    Text,
    /// Intent classification.
    Intent,
    /// Entity presence.
    Entity,
    /// Structured entity value.
    EntityValue,
    /// Structured entity resolution.
    EntityResolution,
}

impl TargetKind {
    /// Report category name. The value and resolution facets file under the
    /// entity category.
    #[must_use]
    pub fn category(self) -> &'static str {
        match self {
            TargetKind::Text => "Text",
            TargetKind::Intent => "Intent",
            TargetKind::Entity | TargetKind::EntityValue | TargetKind::EntityResolution => "Entity",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::Text => "Text",
            TargetKind::Intent => "Intent",
            TargetKind::Entity => "Entity",
            TargetKind::EntityValue => "EntityValue",
            TargetKind::EntityResolution => "EntityResolution",
        };
        f.write_str(name)
    }
}

/// One classified comparison outcome.
///
/// Immutable once produced. `test_name` is a stable, de-duplicatable
/// identifier built from the result kind, the facet, and the values being
/// compared, e.g. `TruePositiveIntent('PlayMusic', 'play the beatles')`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Identifier of the utterance pair, the corpus position by default.
    pub utterance_id: String,
    /// Confusion matrix bucket.
    pub result_kind: ResultKind,
    /// Facet the outcome belongs to.
    pub target_kind: TargetKind,
    /// Group key for per-category aggregation: the intent name or entity
    /// type. Absent for the text facet and for true negatives.
    pub group: Option<String>,
    /// Provider confidence of the entity involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Stable human-readable test identifier.
    pub test_name: String,
    /// Explanation of the classification.
    pub because: String,
    /// Report categories: facet, result kind, and group when present.
    pub categories: Vec<String>,
}

impl TestCase {
    pub(crate) fn new(
        utterance_id: &str,
        result_kind: ResultKind,
        target_kind: TargetKind,
        group: Option<String>,
        score: Option<f64>,
        args: &[&str],
        because: String,
        test_label: Option<&str>,
    ) -> Self {
        let prefix = test_label.map(|label| format!("[{label}] ")).unwrap_or_default();
        let test_name = format!("{prefix}{result_kind}{target_kind}('{}')", args.join("', '"));

        let mut categories = vec![target_kind.category().to_string(), result_kind.to_string()];
        if let Some(group) = &group {
            categories.push(group.clone());
        }

        TestCase {
            utterance_id: utterance_id.to_string(),
            result_kind,
            target_kind,
            group,
            score,
            test_name,
            because,
            categories,
        }
    }

    /// Whether this outcome maps to a passing test case.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.result_kind.is_pass()
    }
}
