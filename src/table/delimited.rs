//! Delimited text (CSV/TSV) table reader.
//!
//! The first row is the header naming the columns:
//! ```csv
//! query_id,query,product_id,esci_label,product_locale
//! 1,revent 80 cfm,B000MOO21W,I,us
//! ```

use std::io::BufRead;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{Result, TrecError};
use crate::table::{Row, TableReader};

/// A table reader for comma- or tab-delimited text with a header row.
#[derive(Debug, Clone)]
pub struct DelimitedReader {
    /// Field delimiter (default: ',')
    delimiter: u8,
    /// Whether to trim whitespace around fields
    trim: bool,
}

impl Default for DelimitedReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DelimitedReader {
    /// Create a new reader with comma delimiter.
    pub fn new() -> Self {
        DelimitedReader {
            delimiter: b',',
            trim: true,
        }
    }

    /// Set a custom single-byte delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace from fields.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

/// Positions of the requested columns within the header.
fn column_positions(headers: &StringRecord, source: &str, columns: &[&str]) -> Result<Vec<usize>> {
    columns
        .iter()
        .map(|column| {
            headers.iter().position(|h| h == *column).ok_or_else(|| {
                TrecError::data_load(format!(
                    "{source}: column `{column}` not found (available: {})",
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })
        })
        .collect()
}

impl TableReader for DelimitedReader {
    fn read_columns(
        &self,
        input: Box<dyn BufRead>,
        source: &str,
        columns: &[&str],
    ) -> Result<Vec<Row>> {
        let trim = if self.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        };
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(trim)
            .from_reader(input);

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                return Err(TrecError::data_load(format!(
                    "{source}: failed to read header: {e}"
                )));
            }
        };
        // No header line at all: an empty table.
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        let positions = column_positions(&headers, source, columns)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .map_err(|e| TrecError::data_load(format!("{source}: malformed record: {e}")))?;
            let mut row = Vec::with_capacity(positions.len());
            for (&pos, column) in positions.iter().zip(columns) {
                // Record lengths are checked against the header by the csv reader.
                let value = record.get(pos).ok_or_else(|| {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    TrecError::data_load(format!(
                        "{source}: line {line}: missing value for column `{column}`"
                    ))
                })?;
                row.push(value.to_string());
            }
            rows.push(row);
        }

        Ok(rows)
    }
}
