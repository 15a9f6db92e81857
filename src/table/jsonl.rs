//! JSONL table reader.
//!
//! Each line holds one JSON object; the requested keys are the columns:
//! ```jsonl
//! {"id": "B0001", "title": "Desk lamp", "brand": "Acme"}
//! {"id": "B0002", "title": "Lamp shade", "brand": null}
//! ```
//!
//! Strings are taken as is, numbers and booleans by their JSON text. A
//! `null` or absent key is a missing value.

use std::io::BufRead;

use serde_json::Value;

use crate::error::{Result, TrecError};
use crate::table::{Row, TableReader};

/// A table reader for JSON Lines input.
#[derive(Debug, Clone, Default)]
pub struct JsonLinesReader;

impl JsonLinesReader {
    pub fn new() -> Self {
        JsonLinesReader
    }

    fn cell(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl TableReader for JsonLinesReader {
    fn read_columns(
        &self,
        input: Box<dyn BufRead>,
        source: &str,
        columns: &[&str],
    ) -> Result<Vec<Row>> {
        let mut rows = Vec::new();

        for (line_num, line) in input.lines().enumerate() {
            let line = line.map_err(|e| TrecError::data_load(format!("{source}: {e}")))?;
            if line.trim().is_empty() {
                continue;
            }
            let line_no = line_num + 1;

            let value: Value = serde_json::from_str(&line).map_err(|e| {
                TrecError::data_load(format!("{source}: line {line_no}: invalid JSON: {e}"))
            })?;
            let Value::Object(map) = value else {
                return Err(TrecError::data_load(format!(
                    "{source}: line {line_no}: expected a JSON object"
                )));
            };

            let mut row = Vec::with_capacity(columns.len());
            for column in columns {
                let cell = map.get(*column).and_then(Self::cell).ok_or_else(|| {
                    TrecError::data_load(format!(
                        "{source}: line {line_no}: missing value for column `{column}`"
                    ))
                })?;
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(rows)
    }
}
