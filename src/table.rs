//! Column-oriented reading of tabular input files.
//!
//! Inputs are addressed by column name so that the same loader works for a
//! Parquet file, a delimited export or a JSON Lines dump of the same
//! dataset. The format is taken from the file extension once any
//! compression suffix is removed.

use std::io::BufRead;
use std::path::Path;

use crate::compression::{self, Compression};
use crate::error::{Result, TrecError};

pub mod columnar;
pub mod delimited;
pub mod jsonl;

use columnar::ParquetReader;
use delimited::DelimitedReader;
use jsonl::JsonLinesReader;

/// Values of the requested columns for one input row, in request order.
pub type Row = Vec<String>;

/// A reader that projects named columns out of a tabular stream.
///
/// # Example
///
/// ```no_run
/// use trec_product::table::read_columns;
///
/// for row in read_columns("ucsd-asins.parquet", &["asin"]).unwrap() {
///     println!("{}", row[0]);
/// }
/// ```
pub trait TableReader {
    /// Read every row of `input`, returning the `columns` values of each.
    ///
    /// `source` names the input in error messages. A column absent from the
    /// input, or a row without a value for it, fails the whole read.
    fn read_columns(
        &self,
        input: Box<dyn BufRead>,
        source: &str,
        columns: &[&str],
    ) -> Result<Vec<Row>>;
}

/// Supported tabular encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Parquet,
    Csv,
    Tsv,
    JsonLines,
}

impl TableFormat {
    /// Detect the format of a (possibly compressed) file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = Compression::content_path(path);
        let ext = content
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("parquet") | Some("pq") => Ok(TableFormat::Parquet),
            Some("csv") => Ok(TableFormat::Csv),
            Some("tsv") | Some("tab") => Ok(TableFormat::Tsv),
            Some("jsonl") | Some("ndjson") | Some("json") => Ok(TableFormat::JsonLines),
            _ => Err(TrecError::data_load(format!(
                "{}: unsupported table format (expected .parquet, .csv, .tsv, .jsonl or .json, optionally .gz/.zst)",
                path.display()
            ))),
        }
    }

    /// The reader implementation for this format.
    pub fn reader(self) -> Box<dyn TableReader> {
        match self {
            TableFormat::Parquet => Box::new(ParquetReader::new()),
            TableFormat::Csv => Box::new(DelimitedReader::new()),
            TableFormat::Tsv => Box::new(DelimitedReader::new().with_delimiter(b'\t')),
            TableFormat::JsonLines => Box::new(JsonLinesReader::new()),
        }
    }
}

/// Open `path` and read the named columns of every row.
pub fn read_columns<P: AsRef<Path>>(path: P, columns: &[&str]) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let input = compression::open_reader(path)?;
    let format = TableFormat::from_path(path)?;
    format
        .reader()
        .read_columns(input, &path.display().to_string(), columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_detection() {
        assert_eq!(TableFormat::from_path("a.csv").unwrap(), TableFormat::Csv);
        assert_eq!(TableFormat::from_path("a.csv.zst").unwrap(), TableFormat::Csv);
        assert_eq!(TableFormat::from_path("a.TSV.gz").unwrap(), TableFormat::Tsv);
        assert_eq!(
            TableFormat::from_path("product-corpus.json.zst").unwrap(),
            TableFormat::JsonLines
        );
        assert_eq!(TableFormat::from_path("a.ndjson").unwrap(), TableFormat::JsonLines);
        assert_eq!(
            TableFormat::from_path("shopping_queries_dataset_examples.parquet").unwrap(),
            TableFormat::Parquet
        );
    }

    #[test]
    fn test_unsupported_format() {
        let err = TableFormat::from_path("examples.xlsx").unwrap_err();
        assert!(matches!(err, TrecError::DataLoad(_)));
        assert!(TableFormat::from_path("examples").is_err());
    }

    #[test]
    fn test_read_columns_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.tsv");
        fs::write(&path, "category\tasin\nElectronics\tB01\nSports\tB02\n").unwrap();

        let rows = read_columns(&path, &["asin"]).unwrap();
        assert_eq!(rows, vec![vec!["B01".to_string()], vec!["B02".to_string()]]);
    }

    #[test]
    fn test_missing_file_is_missing_input() {
        let dir = TempDir::new().unwrap();
        let result = read_columns(dir.path().join("absent.parquet"), &["asin"]);
        assert!(matches!(result, Err(TrecError::MissingInput(_))));
    }
}
