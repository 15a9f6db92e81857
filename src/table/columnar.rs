//! Parquet table reader.
//!
//! The ESCI release and the reference ASIN list are Parquet files. Only the
//! requested top-level columns are decoded; each value is turned into its
//! text form so that ids stored as integers compare like ids read from a
//! delimited export.

use std::io::{BufRead, Read};
use std::sync::Arc;

use bytes::Bytes;
use log::debug;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use parquet::schema::types::Type;

use crate::error::{Result, TrecError};
use crate::table::{Row, TableReader};

/// A table reader for Parquet files.
#[derive(Debug, Clone, Default)]
pub struct ParquetReader;

impl ParquetReader {
    pub fn new() -> Self {
        ParquetReader
    }
}

/// Text value of a scalar field; `None` for nulls and nested values.
fn field_text(field: &Field) -> Option<String> {
    match field {
        Field::Null | Field::Group(_) | Field::ListInternal(_) | Field::MapInternal(_) => None,
        Field::Str(value) => Some(value.clone()),
        Field::Bytes(value) => value.as_utf8().ok().map(str::to_string),
        other => Some(other.to_string()),
    }
}

impl TableReader for ParquetReader {
    fn read_columns(
        &self,
        mut input: Box<dyn BufRead>,
        source: &str,
        columns: &[&str],
    ) -> Result<Vec<Row>> {
        // The footer sits at the end of the file, so the whole stream is needed.
        let mut buf = Vec::new();
        input
            .read_to_end(&mut buf)
            .map_err(|e| TrecError::data_load(format!("{source}: failed to read: {e}")))?;
        if buf.is_empty() {
            return Ok(Vec::new());
        }

        let reader = SerializedFileReader::new(Bytes::from(buf))
            .map_err(|e| TrecError::data_load(format!("{source}: invalid parquet file: {e}")))?;
        let schema = reader.metadata().file_metadata().schema();
        let fields = schema.get_fields();

        let mut projected: Vec<Arc<Type>> = Vec::with_capacity(columns.len());
        for column in columns {
            let field = fields.iter().find(|f| f.name() == *column).ok_or_else(|| {
                TrecError::data_load(format!(
                    "{source}: column `{column}` not found (available: {})",
                    fields.iter().map(|f| f.name()).collect::<Vec<_>>().join(", ")
                ))
            })?;
            if !projected.iter().any(|f| f.name() == *column) {
                projected.push(Arc::clone(field));
            }
        }
        let projection = Type::group_type_builder(schema.name())
            .with_fields(projected)
            .build()
            .map_err(|e| TrecError::data_load(format!("{source}: invalid projection: {e}")))?;

        let num_rows = reader.metadata().file_metadata().num_rows();
        debug!(
            "{source}: {num_rows} rows in {} row groups",
            reader.num_row_groups()
        );

        let iter = reader
            .get_row_iter(Some(projection))
            .map_err(|e| TrecError::data_load(format!("{source}: failed to read rows: {e}")))?;

        let mut rows = Vec::with_capacity(usize::try_from(num_rows).unwrap_or_default());
        for (index, record) in iter.enumerate() {
            let record = record.map_err(|e| {
                TrecError::data_load(format!("{source}: row {}: {e}", index + 1))
            })?;

            let mut values: Vec<Option<String>> = vec![None; columns.len()];
            for (name, field) in record.get_column_iter() {
                for (slot, column) in values.iter_mut().zip(columns) {
                    if name.as_str() == *column {
                        *slot = field_text(field);
                    }
                }
            }

            let row = values
                .into_iter()
                .zip(columns)
                .map(|(value, column)| {
                    value.ok_or_else(|| {
                        TrecError::data_load(format!(
                            "{source}: row {}: missing value for column `{column}`",
                            index + 1
                        ))
                    })
                })
                .collect::<Result<Row>>()?;
            rows.push(row);
        }

        Ok(rows)
    }
}
