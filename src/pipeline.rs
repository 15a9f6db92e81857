//! End-to-end derivation of the training corpus.
//!
//! The stages run one after the other, each handing its owned output to the
//! next:
//!
//! 1. load the item universe and the judgment dataset;
//! 2. derive relationship edges and summarize them per anchor;
//! 3. select training items and assign synthetic query ids;
//! 4. write the query and qrel files.
//!
//! Nothing is written until every input has been read and derived, so an
//! input error never leaves output behind.
//!
//! # Examples
//!
//! ```no_run
//! use trec_product::pipeline::{run_pipeline, PipelineConfig};
//!
//! let mut config = PipelineConfig::default();
//! config.examples = "shopping_queries_dataset_examples.parquet".into();
//! config.queries_out = "out/queries.tsv.zst".into();
//! config.qrels_out = "out/qrels.tsv.zst".into();
//!
//! let report = run_pipeline(&config).unwrap();
//! println!("{} training queries", report.training_items);
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrecError};
use crate::export::{self, TrainingCorpus};
use crate::judgments::load_judgments;
use crate::relations::{derive_edges_from_usable, kind_totals, summarize, usable_judgments};
use crate::selection::select_training_items;
use crate::universe::{CORPUS_ID_COLUMN, ItemUniverse, REFERENCE_ID_COLUMN, UniverseSource};

/// Default location of the ESCI judgment dataset.
pub const DEFAULT_EXAMPLES: &str =
    "esci-data/shopping_queries_dataset/shopping_queries_dataset_examples.parquet";

/// Default reference list of known ASINs.
pub const DEFAULT_REFERENCE: &str = "ucsd-asins.parquet";

/// Default query output file.
pub const DEFAULT_QUERIES_OUT: &str = "esci-training-queries.tsv.zst";

/// Default qrel output file.
pub const DEFAULT_QRELS_OUT: &str = "esci-training-qrels.tsv.zst";

/// Paths and column names used by a pipeline run.
///
/// Omitted fields take their defaults when loaded from JSON:
///
/// ```
/// use trec_product::pipeline::PipelineConfig;
///
/// let config: PipelineConfig =
///     serde_json::from_str(r#"{"corpus": "product-corpus.json.zst"}"#).unwrap();
/// assert_eq!(config.corpus_column, "id");
/// assert_eq!(config.reference_column, "asin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Judgment dataset.
    pub examples: PathBuf,
    /// Product corpus defining the item universe; overrides `reference`.
    pub corpus: Option<PathBuf>,
    /// Identifier column of the corpus.
    pub corpus_column: String,
    /// Reference list defining the item universe when no corpus is given.
    pub reference: PathBuf,
    /// Identifier column of the reference list.
    pub reference_column: String,
    /// Query stream output.
    pub queries_out: PathBuf,
    /// Qrel stream output.
    pub qrels_out: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            examples: PathBuf::from(DEFAULT_EXAMPLES),
            corpus: None,
            corpus_column: CORPUS_ID_COLUMN.to_string(),
            reference: PathBuf::from(DEFAULT_REFERENCE),
            reference_column: REFERENCE_ID_COLUMN.to_string(),
            queries_out: PathBuf::from(DEFAULT_QUERIES_OUT),
            qrels_out: PathBuf::from(DEFAULT_QRELS_OUT),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TrecError::missing_path(path, &e))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| TrecError::config(format!("{}: {e}", path.display())))
    }

    /// The universe source this configuration selects.
    pub fn universe_source(&self) -> UniverseSource<'_> {
        UniverseSource::select(
            self.corpus.as_deref(),
            &self.corpus_column,
            &self.reference,
            &self.reference_column,
        )
    }
}

/// Counts gathered over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub universe_items: usize,
    pub judgments_loaded: usize,
    pub usable_judgments: usize,
    pub edges: usize,
    pub complement_edges: usize,
    pub substitute_edges: usize,
    pub irrelevant_edges: usize,
    pub anchor_items: usize,
    pub training_items: usize,
    pub query_lines: usize,
    pub qrel_lines: usize,
    pub queries_path: PathBuf,
    pub qrels_path: PathBuf,
    pub duration_ms: u64,
}

/// Run the whole derivation described by `config`.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    let start = Instant::now();

    let universe = ItemUniverse::load_from(config.universe_source())?;
    let judgments = load_judgments(&config.examples)?;

    let usable = usable_judgments(&judgments, &universe);
    info!("{} of {} judgments are usable", usable.len(), judgments.len());
    let edges = derive_edges_from_usable(&usable);
    let (complement_edges, substitute_edges, irrelevant_edges) = kind_totals(&edges);

    let summaries = summarize(&edges);
    let anchor_items = summaries.len();
    let items = select_training_items(summaries);

    let corpus = TrainingCorpus::build(&items, &edges);
    let written = export::write_corpus(&corpus, &config.queries_out, &config.qrels_out)?;

    let report = PipelineReport {
        universe_items: universe.len(),
        judgments_loaded: judgments.len(),
        usable_judgments: usable.len(),
        edges: edges.len(),
        complement_edges,
        substitute_edges,
        irrelevant_edges,
        anchor_items,
        training_items: items.len(),
        query_lines: written.query_lines,
        qrel_lines: written.qrel_lines,
        queries_path: written.queries_path,
        qrels_path: written.qrels_path,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "wrote {} queries and {} qrels for {} training items in {} ms",
        report.query_lines, report.qrel_lines, report.training_items, report.duration_ms
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.corpus, None);
        assert_eq!(config.reference_column, "asin");
        assert_eq!(config.queries_out, PathBuf::from(DEFAULT_QUERIES_OUT));
        assert!(matches!(config.universe_source(), UniverseSource::Reference { .. }));
        assert_eq!(
            TableFormat::from_path(&config.examples).unwrap(),
            TableFormat::Parquet
        );
        assert_eq!(
            TableFormat::from_path(&config.reference).unwrap(),
            TableFormat::Parquet
        );
    }

    #[test]
    fn test_corpus_selects_corpus_source() {
        let config = PipelineConfig {
            corpus: Some(PathBuf::from("product-corpus.json.zst")),
            ..Default::default()
        };
        let source = config.universe_source();
        assert!(matches!(source, UniverseSource::Corpus { .. }));
        assert_eq!(source.column(), "id");
    }

    #[test]
    fn test_config_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.json");
        fs::write(&path, r#"{"examples": "ex.jsonl", "qrels_out": "q.tsv"}"#).unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.examples, PathBuf::from("ex.jsonl"));
        assert_eq!(config.qrels_out, PathBuf::from("q.tsv"));
        assert_eq!(config.reference, PathBuf::from(DEFAULT_REFERENCE));
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.json");
        fs::write(&path, r#"{"min_complements": 3}"#).unwrap();

        let err = PipelineConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, TrecError::Config(_)));
    }

    #[test]
    fn test_missing_examples_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("asins.csv");
        fs::write(&reference, "asin\nA\n").unwrap();

        let config = PipelineConfig {
            examples: dir.path().join("absent.csv"),
            reference,
            queries_out: dir.path().join("queries.tsv"),
            qrels_out: dir.path().join("qrels.tsv"),
            ..Default::default()
        };

        let err = run_pipeline(&config).unwrap_err();
        assert!(matches!(err, TrecError::MissingInput(_)));
        assert!(!config.queries_out.exists());
        assert!(!config.qrels_out.exists());
    }
}
