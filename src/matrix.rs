//! Confusion matrix and derived accuracy metrics.

use crate::test_case::ResultKind;
use serde::{Deserialize, Serialize};

/// Four-way tally of classification outcomes for one facet or group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfusionMatrix {
    /// Count of true positive outcomes.
    pub true_positive: u64,
    /// Count of true negative outcomes.
    pub true_negative: u64,
    /// Count of false positive outcomes.
    pub false_positive: u64,
    /// Count of false negative outcomes.
    pub false_negative: u64,
}

impl ConfusionMatrix {
    /// Create a matrix from explicit counts.
    #[must_use]
    pub const fn new(
        true_positive: u64,
        true_negative: u64,
        false_positive: u64,
        false_negative: u64,
    ) -> Self {
        ConfusionMatrix {
            true_positive,
            true_negative,
            false_positive,
            false_negative,
        }
    }

    pub(crate) fn record(&mut self, kind: ResultKind) {
        match kind {
            ResultKind::TruePositive => self.true_positive += 1,
            ResultKind::TrueNegative => self.true_negative += 1,
            ResultKind::FalsePositive => self.false_positive += 1,
            ResultKind::FalseNegative => self.false_negative += 1,
        }
    }

    /// Total number of outcomes tallied.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    /// `TP / (TP + FP)`, or 0 when nothing was predicted positive.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// `TP / (TP + FN)`, or 0 when nothing was expected positive.
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// Harmonic mean of precision and recall, or 0 when both are 0.
    #[must_use]
    pub fn f1(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }
}

fn ratio(dividend: u64, divisor: u64) -> f64 {
    if divisor == 0 {
        0.0
    } else {
        dividend as f64 / divisor as f64
    }
}
