//! Error types for the trec-product pipeline.
//!
//! Every stage reports failures through the [`TrecError`] enum. None of them
//! are recovered locally: a failing stage aborts the run, because the query
//! and qrel files have to stay consistent with each other.
//!
//! # Examples
//!
//! ```
//! use trec_product::error::{TrecError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(TrecError::data_load("column `query_id` not found"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::Path;

use thiserror::Error;

/// The main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum TrecError {
    /// A required input file is absent or cannot be opened.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// An input file was opened but does not have the expected shape
    /// (unknown format, absent column, empty value, bad label).
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// Writing the query or qrel stream failed.
    #[error("Export write error: {0}")]
    ExportWrite(String),

    /// The pipeline configuration file is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors not attributed to a specific stage
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with TrecError.
pub type Result<T> = std::result::Result<T, TrecError>;

impl TrecError {
    /// Create a new missing input error.
    pub fn missing_input<S: Into<String>>(msg: S) -> Self {
        TrecError::MissingInput(msg.into())
    }

    /// Create a missing input error for a path that could not be opened.
    pub fn missing_path(path: &Path, err: &io::Error) -> Self {
        TrecError::MissingInput(format!("{}: {err}", path.display()))
    }

    /// Create a new data load error.
    pub fn data_load<S: Into<String>>(msg: S) -> Self {
        TrecError::DataLoad(msg.into())
    }

    /// Create a new export write error.
    pub fn export_write<S: Into<String>>(msg: S) -> Self {
        TrecError::ExportWrite(msg.into())
    }

    /// Create an export write error for a failed operation on an output path.
    pub fn write_failed(path: &Path, err: &io::Error) -> Self {
        TrecError::ExportWrite(format!("{}: {err}", path.display()))
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        TrecError::Config(msg.into())
    }
}
