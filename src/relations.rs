//! Relationship derivation between items judged under the same query.
//!
//! Every item judged Exact for a query is an *anchor*. Each other usable
//! item judged under that query becomes a target of the anchor, with its
//! label mapped to a [`RelationKind`]. A query with several anchors yields
//! edges from each anchor, including edges between the anchors in both
//! directions; the resulting multiset is kept as is.
//!
//! # Example
//!
//! ```
//! use trec_product::model::{JudgmentExample, RelationKind, RelevanceLabel};
//! use trec_product::relations::derive_edges;
//! use trec_product::universe::ItemUniverse;
//!
//! let universe: ItemUniverse = ["A", "B", "D"].into_iter().collect();
//! let judgments = vec![
//!     JudgmentExample::new("Q1", "desk lamp", "A", RelevanceLabel::Exact, "us"),
//!     JudgmentExample::new("Q1", "desk lamp", "B", RelevanceLabel::Complement, "us"),
//!     JudgmentExample::new("Q1", "desk lamp", "D", RelevanceLabel::Substitute, "us"),
//! ];
//!
//! let edges = derive_edges(&judgments, &universe);
//! assert_eq!(edges.len(), 2);
//! assert_eq!(edges[0].kind, RelationKind::Complement);
//! ```

use ahash::AHashMap;
use log::{debug, info, warn};

use crate::model::{
    JudgmentExample, RelationKind, RelationSummary, RelationshipEdge, RelevanceLabel, US_LOCALE,
};
use crate::universe::ItemUniverse;

/// Judgments from the US locale whose item is in the universe.
pub fn usable_judgments<'a>(
    examples: &'a [JudgmentExample],
    universe: &ItemUniverse,
) -> Vec<&'a JudgmentExample> {
    examples
        .iter()
        .filter(|ex| ex.is_us() && universe.contains(&ex.item_id))
        .collect()
}

/// Partition judgments by query id.
///
/// Groups are returned in ascending query id order; each group keeps the
/// input order of its rows.
pub fn group_by_query<'a>(
    usable: &[&'a JudgmentExample],
) -> Vec<(&'a str, Vec<&'a JudgmentExample>)> {
    let mut groups: AHashMap<&'a str, Vec<&'a JudgmentExample>> = AHashMap::new();
    for &example in usable {
        groups
            .entry(example.query_id.as_str())
            .or_default()
            .push(example);
    }

    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|a, b| a.0.cmp(b.0));
    groups
}

/// Append the edges of one query group to `edges`.
///
/// O(k²) in the group size: every anchor is paired with every row of the
/// group that names a different item.
pub fn pair_group(group: &[&JudgmentExample], edges: &mut Vec<RelationshipEdge>) {
    for anchor in group.iter().filter(|ex| ex.label == RelevanceLabel::Exact) {
        for target in group {
            if target.item_id == anchor.item_id {
                continue;
            }
            edges.push(RelationshipEdge {
                ref_item: anchor.item_id.clone(),
                tgt_item: target.item_id.clone(),
                kind: target.label.relation_kind(),
            });
        }
    }
}

/// Derive the relationship edges for a set of judgments.
///
/// Edges come out grouped by query id (ascending), and within a query in
/// anchor-then-target input order. An empty usable set gives no edges.
pub fn derive_edges(examples: &[JudgmentExample], universe: &ItemUniverse) -> Vec<RelationshipEdge> {
    let usable = usable_judgments(examples, universe);
    derive_edges_from_usable(&usable)
}

/// Derive edges from judgments already filtered by [`usable_judgments`].
pub fn derive_edges_from_usable(usable: &[&JudgmentExample]) -> Vec<RelationshipEdge> {
    if usable.is_empty() {
        warn!("no usable judgments (locale {US_LOCALE:?}, item in universe)");
    }
    let groups = group_by_query(usable);
    debug!("{} usable judgments across {} queries", usable.len(), groups.len());

    let mut edges = Vec::new();
    for (_, group) in &groups {
        pair_group(group, &mut edges);
    }

    info!("derived {} relationship edges", edges.len());
    edges
}

/// Count edges per anchor and kind, sorted by ascending `ref_item`.
pub fn summarize(edges: &[RelationshipEdge]) -> Vec<RelationSummary> {
    let mut by_ref: AHashMap<&str, RelationSummary> = AHashMap::new();
    for edge in edges {
        by_ref
            .entry(edge.ref_item.as_str())
            .or_insert_with(|| RelationSummary::new(edge.ref_item.as_str()))
            .record(edge.kind);
    }

    let mut summaries: Vec<RelationSummary> = by_ref.into_values().collect();
    summaries.sort_by(|a, b| a.ref_item.cmp(&b.ref_item));
    debug!("summarized edges for {} anchor items", summaries.len());
    summaries
}

/// Number of edges of each kind, as (complement, substitute, irrelevant).
pub fn kind_totals(edges: &[RelationshipEdge]) -> (usize, usize, usize) {
    let mut totals = RelationSummary::default();
    for edge in edges {
        totals.record(edge.kind);
    }
    (
        totals.count(RelationKind::Complement),
        totals.count(RelationKind::Substitute),
        totals.count(RelationKind::Irrelevant),
    )
}
