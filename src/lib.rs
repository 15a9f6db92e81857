//! # trec-product
//!
//! Derives a TREC-style training corpus from ESCI shopping-query relevance
//! judgments.
//!
//! Items judged Exact for a query become anchors; other items judged under
//! the same query become complement, substitute or irrelevant relations of
//! the anchor. Anchors with enough complement and substitute relations are
//! numbered as synthetic queries and written out as a query file and a qrel
//! file.
//!
//! ## Modules
//!
//! - [`universe`]: the set of valid item identifiers
//! - [`judgments`]: loading the judgment dataset
//! - [`relations`]: edge derivation and per-anchor summaries
//! - [`selection`]: threshold filter and synthetic query ids
//! - [`export`]: query and qrel streams
//! - [`pipeline`]: configuration and the end-to-end run

pub mod cli;
pub mod compression;
pub mod error;
pub mod export;
pub mod judgments;
pub mod model;
pub mod pipeline;
pub mod relations;
pub mod selection;
pub mod table;
pub mod universe;

pub mod prelude {
    pub use crate::error::{Result, TrecError};
    pub use crate::export::{QrelRecord, QueryRecord, TrainingCorpus};
    pub use crate::model::{
        JudgmentExample, RelationKind, RelationSummary, RelationshipEdge, RelevanceLabel,
        TrainingItem,
    };
    pub use crate::pipeline::{PipelineConfig, PipelineReport, run_pipeline};
    pub use crate::universe::ItemUniverse;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
