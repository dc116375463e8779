//! Aggregate statistics over comparison outcomes.

use crate::matrix::ConfusionMatrix;
use crate::test_case::{TargetKind, TestCase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate accuracy report: one confusion matrix per facet plus
/// per-group breakdowns for the intent, entity, and entity value facets.
///
/// A pure projection of an outcome list; the grouping is an unordered
/// reduction, so the order outcomes were produced in never matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NluStatistics {
    /// Text facet tally.
    pub text: ConfusionMatrix,
    /// Intent facet tally.
    pub intent: ConfusionMatrix,
    /// Entity presence facet tally.
    pub entity: ConfusionMatrix,
    /// Entity value facet tally.
    pub entity_value: ConfusionMatrix,
    /// Entity resolution facet tally.
    pub entity_resolution: ConfusionMatrix,
    /// Intent facet tallies keyed by intent name.
    pub by_intent: BTreeMap<String, ConfusionMatrix>,
    /// Entity presence tallies keyed by entity type.
    pub by_entity_type: BTreeMap<String, ConfusionMatrix>,
    /// Entity value tallies keyed by entity type.
    pub by_entity_value_type: BTreeMap<String, ConfusionMatrix>,
}

impl NluStatistics {
    /// Tally a list of outcomes by facet and by group key.
    ///
    /// Outcomes without a group contribute to the facet tallies only.
    #[must_use]
    pub fn from_test_cases(test_cases: &[TestCase]) -> Self {
        let mut statistics = NluStatistics::default();

        for case in test_cases {
            let facet = match case.target_kind {
                TargetKind::Text => &mut statistics.text,
                TargetKind::Intent => &mut statistics.intent,
                TargetKind::Entity => &mut statistics.entity,
                TargetKind::EntityValue => &mut statistics.entity_value,
                TargetKind::EntityResolution => &mut statistics.entity_resolution,
            };
            facet.record(case.result_kind);

            let by_group = match case.target_kind {
                TargetKind::Intent => Some(&mut statistics.by_intent),
                TargetKind::Entity => Some(&mut statistics.by_entity_type),
                TargetKind::EntityValue => Some(&mut statistics.by_entity_value_type),
                TargetKind::Text | TargetKind::EntityResolution => None,
            };
            if let (Some(map), Some(group)) = (by_group, &case.group) {
                map.entry(group.clone())
                    .or_default()
                    .record(case.result_kind);
            }
        }

        statistics
    }
}
