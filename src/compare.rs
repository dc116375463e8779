//! Comparison engine: classify aligned utterance pairs into outcomes.
//!
//! The engine walks the two corpora position by position and emits one
//! outcome per facet per entity per utterance pair. Pairs are independent
//! of one another, so with the `parallel` feature the walk fans out across
//! threads and the per-pair outcome lists are concatenated; aggregation
//! downstream is an unordered reduction, so outcome order never matters.

use crate::matcher::is_entity_match;
use crate::normalize::equals_normalized_opt;
use crate::statistics::NluStatistics;
use crate::test_case::{ResultKind, TargetKind, TestCase};
use crate::utterance::{Entity, LabeledUtterance};
use crate::value::{contains_subtree, Value};
use crate::{Error, Result};

/// Options for a comparison run.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Whether to produce text facet outcomes. On by default; turn off when
    /// the actual corpus was produced from transcribed speech and text
    /// mismatches are expected noise.
    pub compare_text: bool,
    /// Optional label prefixed to every generated test name, for telling
    /// runs apart in merged reports.
    pub test_label: Option<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            compare_text: true,
            test_label: None,
        }
    }
}

/// A completed comparison: the outcome list plus statistics on demand.
#[derive(Debug, Clone)]
pub struct CompareResults {
    test_cases: Vec<TestCase>,
}

impl CompareResults {
    /// The classified outcomes, one per facet per entity per utterance pair.
    #[must_use]
    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Consume the results, yielding the outcome list.
    #[must_use]
    pub fn into_test_cases(self) -> Vec<TestCase> {
        self.test_cases
    }

    /// Aggregate the outcomes into per-facet and per-group confusion
    /// matrices. Pure projection of the outcome list.
    #[must_use]
    pub fn statistics(&self) -> NluStatistics {
        NluStatistics::from_test_cases(&self.test_cases)
    }
}

/// Compare two parallel corpora with default options.
///
/// # Errors
///
/// Returns [`Error::CorpusLengthMismatch`] if the corpora differ in length;
/// the engine cannot align examples positionally otherwise.
///
/// # Example
///
/// ```
/// use nlu_compare::{compare_corpora, LabeledUtterance};
///
/// let expected = vec![LabeledUtterance::new(Some("foo"), Some("DayTime"), None)];
/// let actual = vec![LabeledUtterance::new(Some("foo"), Some("DayTime"), None)];
///
/// let results = compare_corpora(&expected, &actual).unwrap();
/// assert!(results.test_cases().iter().all(|case| case.is_pass()));
/// ```
pub fn compare_corpora(
    expected: &[LabeledUtterance],
    actual: &[LabeledUtterance],
) -> Result<CompareResults> {
    compare_corpora_with_options(expected, actual, &CompareOptions::default())
}

/// Compare two parallel corpora.
///
/// # Errors
///
/// Returns [`Error::CorpusLengthMismatch`] if the corpora differ in length.
pub fn compare_corpora_with_options(
    expected: &[LabeledUtterance],
    actual: &[LabeledUtterance],
    options: &CompareOptions,
) -> Result<CompareResults> {
    if expected.len() != actual.len() {
        return Err(Error::CorpusLengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    log::debug!("comparing {} utterance pairs", expected.len());

    #[cfg(feature = "parallel")]
    let test_cases = {
        use rayon::prelude::*;
        expected
            .par_iter()
            .zip(actual.par_iter())
            .enumerate()
            .flat_map(|(index, (expected, actual))| {
                compare_pair(&index.to_string(), expected, actual, options)
            })
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let test_cases = expected
        .iter()
        .zip(actual.iter())
        .enumerate()
        .flat_map(|(index, (expected, actual))| {
            compare_pair(&index.to_string(), expected, actual, options)
        })
        .collect();

    Ok(CompareResults { test_cases })
}

/// Classify a single aligned utterance pair. Never returns an empty list:
/// the text (unless disabled) and intent facets always contribute one
/// outcome each, and the entity facet contributes at least a true negative.
#[must_use]
pub fn compare_pair(
    utterance_id: &str,
    expected: &LabeledUtterance,
    actual: &LabeledUtterance,
    options: &CompareOptions,
) -> Vec<TestCase> {
    let label = options.test_label.as_deref();
    let mut cases = Vec::new();
    if options.compare_text {
        cases.push(text_test_case(utterance_id, expected, actual, label));
    }
    cases.push(intent_test_case(utterance_id, expected, actual, label));
    entity_test_cases(utterance_id, expected, actual, label, &mut cases);
    cases
}

fn text_test_case(
    utterance_id: &str,
    expected: &LabeledUtterance,
    actual: &LabeledUtterance,
    label: Option<&str>,
) -> TestCase {
    let expected_text = expected.text.as_deref();
    let actual_text = actual.text.as_deref();

    if expected_text.is_none() && actual_text.is_none() {
        return TestCase::new(
            utterance_id,
            ResultKind::TrueNegative,
            TargetKind::Text,
            None,
            None,
            &[],
            "Both utterances are 'null'.".to_string(),
            label,
        );
    }

    if actual_text.is_none() {
        let expected_text = expected_text.unwrap_or_default();
        return TestCase::new(
            utterance_id,
            ResultKind::FalseNegative,
            TargetKind::Text,
            None,
            None,
            &[expected_text],
            format!("Actual text is 'null', expected '{expected_text}'."),
            label,
        );
    }

    if equals_normalized_opt(expected_text, actual_text) {
        let expected_text = expected_text.unwrap_or_default();
        return TestCase::new(
            utterance_id,
            ResultKind::TruePositive,
            TargetKind::Text,
            None,
            None,
            &[expected_text],
            "Utterances have matching text.".to_string(),
            label,
        );
    }

    let expected_text = expected_text.unwrap_or_default();
    let actual_text = actual_text.unwrap_or_default();
    TestCase::new(
        utterance_id,
        ResultKind::FalsePositive,
        TargetKind::Text,
        None,
        None,
        &[expected_text, actual_text],
        format!("Expected text '{expected_text}', actual text '{actual_text}'."),
        label,
    )
}

fn is_none_intent(intent: Option<&str>) -> bool {
    intent.map_or(true, |intent| intent == "None")
}

fn intent_test_case(
    utterance_id: &str,
    expected_utterance: &LabeledUtterance,
    actual_utterance: &LabeledUtterance,
    label: Option<&str>,
) -> TestCase {
    let text = expected_utterance.text.as_deref().unwrap_or_default();
    let expected = expected_utterance.intent.as_deref();
    let actual = actual_utterance.intent.as_deref();

    if is_none_intent(actual) {
        if is_none_intent(expected) {
            return TestCase::new(
                utterance_id,
                ResultKind::TrueNegative,
                TargetKind::Intent,
                None,
                None,
                &[text],
                "Both intents are 'None'.".to_string(),
                label,
            );
        }

        let expected = expected.unwrap_or_default();
        return TestCase::new(
            utterance_id,
            ResultKind::FalseNegative,
            TargetKind::Intent,
            Some(expected.to_string()),
            None,
            &[expected, text],
            format!("Actual intent is 'None', expected '{expected}'."),
            label,
        );
    }

    if expected == actual {
        let expected = expected.unwrap_or_default();
        return TestCase::new(
            utterance_id,
            ResultKind::TruePositive,
            TargetKind::Intent,
            Some(expected.to_string()),
            None,
            &[expected, text],
            "Utterances have matching intent.".to_string(),
            label,
        );
    }

    // A spurious prediction against a None expectation is grouped under the
    // actual intent; otherwise under the intent that was missed.
    let group = if is_none_intent(expected) { actual } else { expected };
    let expected = expected.unwrap_or_default();
    let actual = actual.unwrap_or_default();
    TestCase::new(
        utterance_id,
        ResultKind::FalsePositive,
        TargetKind::Intent,
        group.map(str::to_string),
        None,
        &[expected, actual, text],
        format!("Expected intent '{expected}', actual intent '{actual}'."),
        label,
    )
}

/// Display form of an entity for test names: the matched text when present,
/// else the compact JSON of its value.
fn entity_display(entity: &Entity) -> String {
    match (&entity.match_text, &entity.entity_value) {
        (Some(text), _) => text.clone(),
        (None, Some(value)) => value.to_compact_string(),
        (None, None) => "null".to_string(),
    }
}

fn entity_test_cases(
    utterance_id: &str,
    expected_utterance: &LabeledUtterance,
    actual_utterance: &LabeledUtterance,
    label: Option<&str>,
    cases: &mut Vec<TestCase>,
) {
    let text = expected_utterance.text.as_deref().unwrap_or_default();
    let expected = expected_utterance.entities.as_deref().unwrap_or_default();
    let actual = actual_utterance.entities.as_deref().unwrap_or_default();

    if expected.is_empty() && actual.is_empty() {
        cases.push(TestCase::new(
            utterance_id,
            ResultKind::TrueNegative,
            TargetKind::Entity,
            None,
            None,
            &[text],
            "Neither utterance has entities.".to_string(),
            label,
        ));
        return;
    }

    for entity in expected {
        let display = entity_display(entity);
        let matched = actual
            .iter()
            .find(|actual_entity| is_entity_match(entity, actual_entity));
        let score = matched.and_then(|matched| matched.score);

        let (kind, because) = match matched {
            Some(_) => (
                ResultKind::TruePositive,
                format!("Both utterances have entity '{display}'."),
            ),
            None => (
                ResultKind::FalseNegative,
                format!("Actual utterance does not have entity matching '{display}'."),
            ),
        };
        cases.push(TestCase::new(
            utterance_id,
            kind,
            TargetKind::Entity,
            Some(entity.entity_type.clone()),
            score,
            &[&entity.entity_type, &display, text],
            because,
            label,
        ));

        if let Some(value) = entity.entity_value.as_ref().filter(|value| !value.is_null()) {
            cases.push(value_test_case(
                utterance_id,
                TargetKind::EntityValue,
                entity,
                value,
                actual,
                |actual_entity| actual_entity.entity_value.as_ref(),
                text,
                score,
                label,
            ));
        }

        if let Some(resolution) = entity
            .entity_resolution
            .as_ref()
            .filter(|resolution| !resolution.is_null())
        {
            cases.push(value_test_case(
                utterance_id,
                TargetKind::EntityResolution,
                entity,
                resolution,
                actual,
                |actual_entity| actual_entity.entity_resolution.as_ref(),
                text,
                score,
                label,
            ));
        }
    }

    for entity in actual {
        let already_expected = expected
            .iter()
            .any(|expected_entity| is_entity_match(expected_entity, entity));
        if !already_expected {
            let display = entity_display(entity);
            cases.push(TestCase::new(
                utterance_id,
                ResultKind::FalsePositive,
                TargetKind::Entity,
                Some(entity.entity_type.clone()),
                entity.score,
                &[&entity.entity_type, &display, text],
                format!("Expected utterance does not have entity matching '{display}'."),
                label,
            ));
        }
    }
}

/// Shared shape of the entity value and entity resolution facets: the
/// expected structured value must be contained in the corresponding value
/// of at least one same-typed actual entity.
#[allow(clippy::too_many_arguments)]
fn value_test_case<'a>(
    utterance_id: &str,
    target_kind: TargetKind,
    entity: &Entity,
    expected_value: &Value,
    actual: &'a [Entity],
    select: impl Fn(&'a Entity) -> Option<&'a Value>,
    text: &str,
    score: Option<f64>,
    label: Option<&str>,
) -> TestCase {
    let formatted = expected_value.to_compact_string();
    let contained = actual
        .iter()
        .filter(|actual_entity| actual_entity.entity_type == entity.entity_type)
        .any(|actual_entity| contains_subtree(Some(expected_value), select(actual_entity)));

    let noun = match target_kind {
        TargetKind::EntityResolution => "entity resolution",
        _ => "entity value",
    };
    let (kind, because) = if contained {
        (
            ResultKind::TruePositive,
            format!("Both utterances have {noun} '{formatted}'."),
        )
    } else {
        (
            ResultKind::FalseNegative,
            format!("Actual utterance does not have {noun} matching '{formatted}'."),
        )
    };

    TestCase::new(
        utterance_id,
        kind,
        target_kind,
        Some(entity.entity_type.clone()),
        score,
        &[&entity.entity_type, &formatted, text],
        because,
        label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> CompareOptions {
        CompareOptions::default()
    }

    fn utterance(text: Option<&str>, intent: Option<&str>) -> LabeledUtterance {
        LabeledUtterance::new(text, intent, None)
    }

    fn kinds_for(cases: &[TestCase], target: TargetKind) -> Vec<ResultKind> {
        cases
            .iter()
            .filter(|case| case.target_kind == target)
            .map(|case| case.result_kind)
            .collect()
    }

    #[test]
    fn matching_pair_is_all_true() {
        let expected = utterance(Some("foo"), Some("DayTime"));
        let actual = utterance(Some("foo"), Some("DayTime"));
        let cases = compare_pair("0", &expected, &actual, &options());

        assert_eq!(kinds_for(&cases, TargetKind::Text), [ResultKind::TruePositive]);
        assert_eq!(kinds_for(&cases, TargetKind::Intent), [ResultKind::TruePositive]);
        assert_eq!(kinds_for(&cases, TargetKind::Entity), [ResultKind::TrueNegative]);
    }

    #[test]
    fn text_facet_covers_all_null_combinations() {
        let null = utterance(None, None);
        let foo = utterance(Some("foo"), None);

        let both_null = compare_pair("0", &null, &null, &options());
        assert_eq!(kinds_for(&both_null, TargetKind::Text), [ResultKind::TrueNegative]);

        let actual_null = compare_pair("0", &foo, &null, &options());
        assert_eq!(kinds_for(&actual_null, TargetKind::Text), [ResultKind::FalseNegative]);

        let expected_null = compare_pair("0", &null, &foo, &options());
        assert_eq!(kinds_for(&expected_null, TargetKind::Text), [ResultKind::FalsePositive]);

        let mismatch = compare_pair("0", &foo, &utterance(Some("bar"), None), &options());
        assert_eq!(kinds_for(&mismatch, TargetKind::Text), [ResultKind::FalsePositive]);
    }

    #[test]
    fn none_intent_prediction_against_expected_intent_is_false_negative() {
        let expected = utterance(Some("foo"), Some("DayTime"));
        let actual = utterance(Some("foo"), Some("None"));
        let cases = compare_pair("0", &expected, &actual, &options());

        let intent = &cases
            .iter()
            .find(|case| case.target_kind == TargetKind::Intent)
            .expect("intent outcome");
        assert_eq!(intent.result_kind, ResultKind::FalseNegative);
        assert_eq!(intent.group.as_deref(), Some("DayTime"));
    }

    #[test]
    fn null_and_none_intents_agree_as_true_negative() {
        let expected = utterance(Some("foo"), None);
        let actual = utterance(Some("foo"), Some("None"));
        let cases = compare_pair("0", &expected, &actual, &options());
        assert_eq!(kinds_for(&cases, TargetKind::Intent), [ResultKind::TrueNegative]);
    }

    #[test]
    fn spurious_intent_is_grouped_under_the_actual_intent() {
        let expected = utterance(Some("foo"), None);
        let actual = utterance(Some("foo"), Some("PlayMusic"));
        let cases = compare_pair("0", &expected, &actual, &options());

        let intent = cases
            .iter()
            .find(|case| case.target_kind == TargetKind::Intent)
            .expect("intent outcome");
        assert_eq!(intent.result_kind, ResultKind::FalsePositive);
        assert_eq!(intent.group.as_deref(), Some("PlayMusic"));
    }

    #[test]
    fn missing_entity_is_false_negative_without_value_outcome() {
        let expected = LabeledUtterance::new(
            Some("matchedText matchedText"),
            None,
            Some(vec![Entity::new("EntityType", Some("matchedText"), 1)]),
        );
        let actual = utterance(Some("matchedText matchedText"), None);
        let cases = compare_pair("0", &expected, &actual, &options());

        let entity_kinds = kinds_for(&cases, TargetKind::Entity);
        assert_eq!(entity_kinds, [ResultKind::FalseNegative]);
        assert!(kinds_for(&cases, TargetKind::EntityValue).is_empty());

        let entity = cases
            .iter()
            .find(|case| case.target_kind == TargetKind::Entity)
            .expect("entity outcome");
        assert_eq!(entity.group.as_deref(), Some("EntityType"));
    }

    #[test]
    fn surplus_actual_entity_is_false_positive() {
        let expected = utterance(Some("play the beatles"), None);
        let actual = LabeledUtterance::new(
            Some("play the beatles"),
            None,
            Some(vec![Entity::new("artist", Some("the beatles"), 0)]),
        );
        let cases = compare_pair("0", &expected, &actual, &options());
        assert_eq!(kinds_for(&cases, TargetKind::Entity), [ResultKind::FalsePositive]);
    }

    #[test]
    fn entity_value_subtree_match_is_true_positive() {
        let value: Value = serde_json::from_str(r#"{"foo":42,"bar":42}"#).unwrap();
        let reordered: Value = serde_json::from_str(r#"{"bar":42,"foo":42}"#).unwrap();

        let expected = LabeledUtterance::new(
            Some("foo"),
            None,
            Some(vec![Entity::new("t", Some("foo"), 0).with_value(value)]),
        );
        let actual = LabeledUtterance::new(
            Some("foo"),
            None,
            Some(vec![Entity::new("t", Some("foo"), 0).with_value(reordered)]),
        );
        let cases = compare_pair("0", &expected, &actual, &options());
        assert_eq!(kinds_for(&cases, TargetKind::Entity), [ResultKind::TruePositive]);
        assert_eq!(kinds_for(&cases, TargetKind::EntityValue), [ResultKind::TruePositive]);
    }

    #[test]
    fn entity_value_mismatch_is_false_negative_alongside_presence_match() {
        let expected_value: Value = serde_json::from_str(r#"{"unit":"hour"}"#).unwrap();
        let actual_value: Value = serde_json::from_str(r#"{"unit":"minute"}"#).unwrap();

        let expected = LabeledUtterance::new(
            Some("in 3 hours"),
            None,
            Some(vec![Entity::new("duration", Some("3 hours"), 0).with_value(expected_value)]),
        );
        let actual = LabeledUtterance::new(
            Some("in 3 hours"),
            None,
            Some(vec![Entity::new("duration", Some("3 hours"), 0).with_value(actual_value)]),
        );
        let cases = compare_pair("0", &expected, &actual, &options());
        assert_eq!(kinds_for(&cases, TargetKind::Entity), [ResultKind::TruePositive]);
        assert_eq!(kinds_for(&cases, TargetKind::EntityValue), [ResultKind::FalseNegative]);
    }

    #[test]
    fn entity_resolution_is_its_own_facet() {
        let resolution: Value = serde_json::from_str(r#"{"seconds":10800}"#).unwrap();
        let richer: Value =
            serde_json::from_str(r#"{"seconds":10800,"display":"3h"}"#).unwrap();

        let expected = LabeledUtterance::new(
            Some("in 3 hours"),
            None,
            Some(vec![
                Entity::new("duration", Some("3 hours"), 0).with_resolution(resolution)
            ]),
        );
        let actual = LabeledUtterance::new(
            Some("in 3 hours"),
            None,
            Some(vec![
                Entity::new("duration", Some("3 hours"), 0).with_resolution(richer)
            ]),
        );
        let cases = compare_pair("0", &expected, &actual, &options());
        assert_eq!(
            kinds_for(&cases, TargetKind::EntityResolution),
            [ResultKind::TruePositive]
        );
        assert!(kinds_for(&cases, TargetKind::EntityValue).is_empty());
    }

    #[test]
    fn matched_entity_score_is_carried_onto_the_outcome() {
        let expected = LabeledUtterance::new(
            Some("play the beatles"),
            None,
            Some(vec![Entity::new("artist", Some("the beatles"), 0)]),
        );
        let actual = LabeledUtterance::new(
            Some("play the beatles"),
            None,
            Some(vec![
                Entity::new("artist", Some("the beatles"), 0).with_score(0.93)
            ]),
        );
        let cases = compare_pair("0", &expected, &actual, &options());
        let entity = cases
            .iter()
            .find(|case| case.target_kind == TargetKind::Entity)
            .expect("entity outcome");
        assert_eq!(entity.score, Some(0.93));
    }

    #[test]
    fn compare_text_can_be_disabled() {
        let expected = utterance(Some("foo"), Some("DayTime"));
        let actual = utterance(Some("bar"), Some("DayTime"));
        let opts = CompareOptions {
            compare_text: false,
            ..CompareOptions::default()
        };
        let cases = compare_pair("0", &expected, &actual, &opts);
        assert!(kinds_for(&cases, TargetKind::Text).is_empty());
        assert!(!cases.is_empty());
    }

    #[test]
    fn corpus_length_mismatch_aborts() {
        let expected = vec![utterance(Some("foo"), None)];
        let result = compare_corpora(&expected, &[]);
        assert!(matches!(
            result,
            Err(Error::CorpusLengthMismatch { expected: 1, actual: 0 })
        ));
    }

    #[test]
    fn utterance_ids_are_corpus_positions() {
        let corpus = vec![utterance(Some("a"), None), utterance(Some("b"), None)];
        let results = compare_corpora(&corpus, &corpus).expect("equal lengths");
        let ids: std::collections::BTreeSet<_> = results
            .test_cases()
            .iter()
            .map(|case| case.utterance_id.as_str())
            .collect();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), ["0", "1"]);
    }
}
