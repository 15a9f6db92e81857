//! Loading of the ESCI judgment dataset.

use std::path::Path;

use log::info;

use crate::error::{Result, TrecError};
use crate::model::{JudgmentExample, RelevanceLabel};
use crate::table::read_columns;

/// Columns read from the judgment dataset, in row order.
pub const JUDGMENT_COLUMNS: [&str; 5] = [
    "query_id",
    "query",
    "product_id",
    "esci_label",
    "product_locale",
];

/// Read every judgment row. No filtering happens here.
///
/// An absent file is a [`TrecError::MissingInput`]; a missing column, an
/// empty query or product id, or an unknown label is a
/// [`TrecError::DataLoad`] for the whole file.
pub fn load_judgments<P: AsRef<Path>>(path: P) -> Result<Vec<JudgmentExample>> {
    let path = path.as_ref();
    info!("loading judgments from {}", path.display());

    let rows = read_columns(path, &JUDGMENT_COLUMNS)?;
    let mut examples = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let [query_id, query_text, item_id, label, locale]: [String; 5] =
            row.try_into().map_err(|_| {
                TrecError::data_load(format!("{}: row {}: wrong column count", path.display(), i + 1))
            })?;

        if query_id.is_empty() || item_id.is_empty() {
            return Err(TrecError::data_load(format!(
                "{}: row {}: empty query_id or product_id",
                path.display(),
                i + 1
            )));
        }
        let label = RelevanceLabel::from_code(&label).ok_or_else(|| {
            TrecError::data_load(format!(
                "{}: row {}: unknown relevance label {label:?}",
                path.display(),
                i + 1
            ))
        })?;

        examples.push(JudgmentExample {
            query_id,
            query_text,
            item_id,
            label,
            locale,
        });
    }

    info!("loaded {} judgment examples", examples.len());
    Ok(examples)
}
