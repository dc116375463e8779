//! Plain-text rendering of aggregate statistics.

use crate::matrix::ConfusionMatrix;
use crate::statistics::NluStatistics;

/// Render the intent and entity precision/recall/F1 tables.
///
/// The `*` row is the overall facet tally; one row follows per group, in
/// key order. Values are rounded to four decimal places.
#[must_use]
pub fn render_statistics(statistics: &NluStatistics) -> String {
    let mut out = String::new();

    out.push_str("== Intent results ==\n");
    out.push_str("Intent          | Precision | Recall    | F1        |\n");
    out.push_str("=====================================================\n");
    out.push_str(&render_row("*", &statistics.intent, 15));
    for (intent, matrix) in &statistics.by_intent {
        out.push_str(&render_row(intent, matrix, 15));
    }

    out.push('\n');
    out.push_str("== Entity results ==\n");
    out.push_str("Entity            | Precision | Recall    | F1        |\n");
    out.push_str("=======================================================\n");
    out.push_str(&render_row("*", &statistics.entity, 17));
    for (entity_type, matrix) in &statistics.by_entity_type {
        out.push_str(&render_row(entity_type, matrix, 17));
    }

    out
}

fn render_row(name: &str, matrix: &ConfusionMatrix, width: usize) -> String {
    format!(
        "{:<width$} | {:<9} | {:<9} | {:<9} |\n",
        name,
        round4(matrix.precision()),
        round4(matrix.recall()),
        round4(matrix.f1()),
    )
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
