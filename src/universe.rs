//! The universe of valid item identifiers.
//!
//! Only items in the universe may appear in derived relationships. The
//! universe comes either from an exported product corpus (its `id` column)
//! or from a precomputed reference list of known ASINs.

use std::path::Path;

use ahash::AHashSet;
use log::{debug, info};

use crate::error::{Result, TrecError};
use crate::table::read_columns;

/// Identifier column of an exported product corpus.
pub const CORPUS_ID_COLUMN: &str = "id";

/// Identifier column of the reference ASIN list.
pub const REFERENCE_ID_COLUMN: &str = "asin";

/// Where the universe is read from.
#[derive(Debug, Clone, Copy)]
pub enum UniverseSource<'a> {
    /// An external corpus file and its identifier column.
    Corpus { path: &'a Path, column: &'a str },
    /// A precomputed reference list and its identifier column.
    Reference { path: &'a Path, column: &'a str },
}

impl<'a> UniverseSource<'a> {
    /// Pick the corpus when one is given, the reference list otherwise.
    pub fn select(
        corpus: Option<&'a Path>,
        corpus_column: &'a str,
        reference: &'a Path,
        reference_column: &'a str,
    ) -> Self {
        match corpus {
            Some(path) => UniverseSource::Corpus {
                path,
                column: corpus_column,
            },
            None => UniverseSource::Reference {
                path: reference,
                column: reference_column,
            },
        }
    }

    pub fn path(&self) -> &'a Path {
        match *self {
            UniverseSource::Corpus { path, .. } | UniverseSource::Reference { path, .. } => path,
        }
    }

    pub fn column(&self) -> &'a str {
        match *self {
            UniverseSource::Corpus { column, .. } | UniverseSource::Reference { column, .. } => {
                column
            }
        }
    }
}

/// Deduplicated set of valid item identifiers with O(1) membership.
#[derive(Debug, Clone, Default)]
pub struct ItemUniverse {
    items: AHashSet<String>,
}

impl ItemUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the universe from the corpus if given, else from the reference
    /// list, using the default identifier columns.
    pub fn load(corpus: Option<&Path>, reference: &Path) -> Result<Self> {
        Self::load_from(UniverseSource::select(
            corpus,
            CORPUS_ID_COLUMN,
            reference,
            REFERENCE_ID_COLUMN,
        ))
    }

    /// Load the universe from an explicit source.
    pub fn load_from(source: UniverseSource<'_>) -> Result<Self> {
        let kind = match source {
            UniverseSource::Corpus { .. } => "corpus",
            UniverseSource::Reference { .. } => "reference list",
        };
        info!("loading item universe from {kind} {}", source.path().display());

        let rows = read_columns(source.path(), &[source.column()])?;
        let row_count = rows.len();

        let mut universe = ItemUniverse::new();
        for (i, row) in rows.into_iter().enumerate() {
            let Some(id) = row.into_iter().next().filter(|id| !id.is_empty()) else {
                return Err(TrecError::data_load(format!(
                    "{}: row {}: empty item identifier",
                    source.path().display(),
                    i + 1
                )));
            };
            universe.insert(id);
        }

        debug!("read {row_count} identifier rows");
        info!("item universe has {} items", universe.len());
        Ok(universe)
    }

    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        self.items.insert(item.into())
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifiers in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ItemUniverse {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ItemUniverse {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}
