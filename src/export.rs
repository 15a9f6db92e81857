//! Export of the training corpus as TREC-style query and qrel files.
//!
//! For each training item and each exported relation kind (Complement,
//! Substitute) there is one synthetic query numbered `<id><code>`, e.g.
//! `12C`. The two streams are tab-separated lines without a header:
//!
//! ```text
//! queries:  12C<TAB>B07X3Y6B1V
//! qrels:    12C<TAB>0<TAB>B000MOO21W<TAB>1
//! ```
//!
//! Queries sort by (id, kind) and qrels by (id, kind, target item), so the
//! output is byte-identical for identical input.
//!
//! Files are written in place. If a write fails the run aborts and the files
//! it was writing are left truncated; output of a failed run must not be
//! used.

use std::fmt;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::compression::CompressedWriter;
use crate::error::Result;
use crate::model::{RelationKind, RelationshipEdge, TrainingItem};

/// Iteration field of every qrel line.
pub const QREL_ITERATION: u32 = 0;

/// Relevance grade of every qrel line; only matching-kind edges are written.
pub const QREL_RELEVANCE: u32 = 1;

/// One line of the query stream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryRecord {
    pub synthetic_query_id: u32,
    pub kind: RelationKind,
    pub ref_item: String,
}

impl fmt::Display for QueryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}\t{}",
            self.synthetic_query_id,
            self.kind.code(),
            self.ref_item
        )
    }
}

/// One line of the qrel stream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QrelRecord {
    pub synthetic_query_id: u32,
    pub kind: RelationKind,
    pub tgt_item: String,
}

impl fmt::Display for QrelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}\t{QREL_ITERATION}\t{}\t{QREL_RELEVANCE}",
            self.synthetic_query_id,
            self.kind.code(),
            self.tgt_item
        )
    }
}

/// Sorted, de-duplicated contents of both output streams.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingCorpus {
    pub queries: Vec<QueryRecord>,
    pub qrels: Vec<QrelRecord>,
}

impl TrainingCorpus {
    /// Join training items to their edges and build both streams.
    ///
    /// Queries are derived from the qrels, so the two streams always name
    /// the same set of (id, kind) pairs.
    pub fn build(items: &[TrainingItem], edges: &[RelationshipEdge]) -> Self {
        let by_ref: AHashMap<&str, &TrainingItem> =
            items.iter().map(|item| (item.ref_item.as_str(), item)).collect();

        let mut qrels: Vec<QrelRecord> = edges
            .iter()
            .filter(|edge| edge.kind.is_exported())
            .filter_map(|edge| {
                by_ref.get(edge.ref_item.as_str()).map(|item| QrelRecord {
                    synthetic_query_id: item.synthetic_query_id,
                    kind: edge.kind,
                    tgt_item: edge.tgt_item.clone(),
                })
            })
            .collect();
        qrels.sort();
        qrels.dedup();

        let by_id: AHashMap<u32, &str> = items
            .iter()
            .map(|item| (item.synthetic_query_id, item.ref_item.as_str()))
            .collect();
        let mut queries: Vec<QueryRecord> = Vec::new();
        for qrel in &qrels {
            let is_new = queries.last().is_none_or(|last| {
                (last.synthetic_query_id, last.kind) != (qrel.synthetic_query_id, qrel.kind)
            });
            if is_new {
                if let Some(ref_item) = by_id.get(&qrel.synthetic_query_id) {
                    queries.push(QueryRecord {
                        synthetic_query_id: qrel.synthetic_query_id,
                        kind: qrel.kind,
                        ref_item: (*ref_item).to_string(),
                    });
                }
            }
        }

        debug!(
            "built {} queries and {} qrels from {} training items",
            queries.len(),
            qrels.len(),
            items.len()
        );
        TrainingCorpus { queries, qrels }
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty() && self.qrels.is_empty()
    }
}

/// Where and how much was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub queries_path: PathBuf,
    pub qrels_path: PathBuf,
    pub query_lines: usize,
    pub qrel_lines: usize,
}

fn write_stream<T: fmt::Display>(path: &Path, records: &[T]) -> Result<usize> {
    let mut writer = CompressedWriter::create(path)?;
    for record in records {
        writer.write_line(&record.to_string())?;
    }
    debug!("finishing {}", writer.path().display());
    writer.finish()?;
    Ok(records.len())
}

/// Write the query and qrel streams.
///
/// Each file is created (parent directories included), written and finished
/// before the next one is opened. Any failure is a
/// [`TrecError::ExportWrite`](crate::error::TrecError::ExportWrite).
pub fn write_corpus(corpus: &TrainingCorpus, queries_path: &Path, qrels_path: &Path) -> Result<ExportSummary> {
    if corpus.is_empty() {
        warn!("no training items qualified; writing empty query and qrel files");
    }
    info!("writing {} queries to {}", corpus.queries.len(), queries_path.display());
    let query_lines = write_stream(queries_path, &corpus.queries)?;

    info!("writing {} qrels to {}", corpus.qrels.len(), qrels_path.display());
    let qrel_lines = write_stream(qrels_path, &corpus.qrels)?;

    Ok(ExportSummary {
        queries_path: queries_path.to_path_buf(),
        qrels_path: qrels_path.to_path_buf(),
        query_lines,
        qrel_lines,
    })
}

/// Build the corpus for `items` and write it out.
pub fn export(
    items: &[TrainingItem],
    edges: &[RelationshipEdge],
    queries_path: &Path,
    qrels_path: &Path,
) -> Result<ExportSummary> {
    let corpus = TrainingCorpus::build(items, edges);
    write_corpus(&corpus, queries_path, qrels_path)
}
