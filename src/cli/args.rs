//! Command line argument parsing for the esci-training CLI using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::PipelineConfig;

/// Derive training queries and qrels from ESCI relevance judgments.
///
/// Output files are written in place. If the run fails, the files it was
/// writing may be left incomplete and must not be used.
#[derive(Parser, Debug, Clone)]
#[command(name = "esci-training")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct EsciTrainingArgs {
    /// Verbosity level (-v for progress, -vv for debug detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Format of the run report printed on stdout
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Pipeline configuration file (JSON); flags below override it
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Product corpus defining the item universe [default: use the
    /// reference list]
    #[arg(short, long, value_name = "CORPUS")]
    pub corpus: Option<PathBuf>,

    /// Identifier column of the corpus [default: id]
    #[arg(long, value_name = "COLUMN")]
    pub corpus_column: Option<String>,

    /// Reference list of known items [default: ucsd-asins.parquet]
    #[arg(long, value_name = "FILE")]
    pub reference: Option<PathBuf>,

    /// Identifier column of the reference list [default: asin]
    #[arg(long, value_name = "COLUMN")]
    pub reference_column: Option<String>,

    /// Judgment dataset [default:
    /// esci-data/shopping_queries_dataset/shopping_queries_dataset_examples.parquet]
    #[arg(short, long, value_name = "FILE")]
    pub examples: Option<PathBuf>,

    /// Query output file [default: esci-training-queries.tsv.zst]
    #[arg(long, value_name = "FILE")]
    pub queries_out: Option<PathBuf>,

    /// Qrel output file [default: esci-training-qrels.tsv.zst]
    #[arg(long, value_name = "FILE")]
    pub qrels_out: Option<PathBuf>,
}

impl EsciTrainingArgs {
    /// Get the effective verbosity level (0=quiet, 1=normal, 2=verbose, 3+=debug)
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Build the pipeline configuration: defaults, then the config file if
    /// given, then explicit flags.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(corpus) = &self.corpus {
            config.corpus = Some(corpus.clone());
        }
        if let Some(column) = &self.corpus_column {
            config.corpus_column = column.clone();
        }
        if let Some(reference) = &self.reference {
            config.reference = reference.clone();
        }
        if let Some(column) = &self.reference_column {
            config.reference_column = column.clone();
        }
        if let Some(examples) = &self.examples {
            config.examples = examples.clone();
        }
        if let Some(path) = &self.queries_out {
            config.queries_out = path.clone();
        }
        if let Some(path) = &self.qrels_out {
            config.qrels_out = path.clone();
        }

        Ok(config)
    }
}

/// Output formats for the run report
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
