//! Selection of anchor items that carry enough labeled signal.

use log::info;

use crate::model::{RelationSummary, TrainingItem};

/// Minimum complement edges for an anchor to become a training query.
pub const MIN_COMPLEMENTS: usize = 5;

/// Minimum substitute edges for an anchor to become a training query.
pub const MIN_SUBSTITUTES: usize = 5;

/// Whether a summary meets both selection thresholds.
pub fn qualifies(summary: &RelationSummary) -> bool {
    summary.complement_count >= MIN_COMPLEMENTS && summary.substitute_count >= MIN_SUBSTITUTES
}

/// Keep qualifying summaries and number them 1, 2, 3, ... by ascending
/// `ref_item`.
///
/// The ids are stable keys for downstream consumers, so they depend only on
/// the set of qualifying items and never on input order.
pub fn select_training_items(summaries: Vec<RelationSummary>) -> Vec<TrainingItem> {
    let total = summaries.len();
    let mut selected: Vec<RelationSummary> = summaries.into_iter().filter(qualifies).collect();
    selected.sort_by(|a, b| a.ref_item.cmp(&b.ref_item));

    let items: Vec<TrainingItem> = selected
        .into_iter()
        .zip(1u32..)
        .map(|(summary, id)| TrainingItem {
            synthetic_query_id: id,
            ref_item: summary.ref_item,
            complement_count: summary.complement_count,
            substitute_count: summary.substitute_count,
            irrelevant_count: summary.irrelevant_count,
        })
        .collect();

    info!(
        "selected {} of {total} anchor items (>= {MIN_COMPLEMENTS} complements, >= {MIN_SUBSTITUTES} substitutes)",
        items.len()
    );
    items
}
