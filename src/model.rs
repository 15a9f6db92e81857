//! Record types flowing between the pipeline stages.
//!
//! Judgments are the raw input; edges, summaries and training items are
//! derived from them and never mutated once built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrecError};

/// Locale whose judgments are used for derivation.
pub const US_LOCALE: &str = "us";

/// Human relevance label attached to a (query, item) judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelevanceLabel {
    Exact,
    Substitute,
    Complement,
    Irrelevant,
}

impl RelevanceLabel {
    /// Single-letter code used by the judgment dataset.
    pub fn code(self) -> char {
        match self {
            RelevanceLabel::Exact => 'E',
            RelevanceLabel::Substitute => 'S',
            RelevanceLabel::Complement => 'C',
            RelevanceLabel::Irrelevant => 'I',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "E" => Some(RelevanceLabel::Exact),
            "S" => Some(RelevanceLabel::Substitute),
            "C" => Some(RelevanceLabel::Complement),
            "I" => Some(RelevanceLabel::Irrelevant),
            _ => None,
        }
    }

    /// Relation kind a target item with this label has towards an anchor.
    ///
    /// Two distinct items cannot both be the best match for one query, so a
    /// second exact match is treated as a substitute for the anchor.
    pub fn relation_kind(self) -> RelationKind {
        match self {
            RelevanceLabel::Exact | RelevanceLabel::Substitute => RelationKind::Substitute,
            RelevanceLabel::Complement => RelationKind::Complement,
            RelevanceLabel::Irrelevant => RelationKind::Irrelevant,
        }
    }
}

impl fmt::Display for RelevanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for RelevanceLabel {
    type Err = TrecError;

    fn from_str(s: &str) -> Result<Self> {
        RelevanceLabel::from_code(s).ok_or_else(|| {
            TrecError::data_load(format!(
                "unknown relevance label {s:?} (expected one of E, S, C, I)"
            ))
        })
    }
}

/// Kind of relationship between a target item and an anchor item.
///
/// Variants are declared in code order so the derived ordering matches the
/// ordering of exported query numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    Complement,
    Irrelevant,
    Substitute,
}

impl RelationKind {
    /// Single-letter code appended to synthetic query numbers.
    pub fn code(self) -> char {
        match self {
            RelationKind::Complement => 'C',
            RelationKind::Irrelevant => 'I',
            RelationKind::Substitute => 'S',
        }
    }

    /// Whether edges of this kind are written to the training corpus.
    pub fn is_exported(self) -> bool {
        matches!(self, RelationKind::Complement | RelationKind::Substitute)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One row of the judgment dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentExample {
    pub query_id: String,
    pub query_text: String,
    pub item_id: String,
    pub label: RelevanceLabel,
    pub locale: String,
}

impl JudgmentExample {
    pub fn new(
        query_id: impl Into<String>,
        query_text: impl Into<String>,
        item_id: impl Into<String>,
        label: RelevanceLabel,
        locale: impl Into<String>,
    ) -> Self {
        JudgmentExample {
            query_id: query_id.into(),
            query_text: query_text.into(),
            item_id: item_id.into(),
            label,
            locale: locale.into(),
        }
    }

    pub fn is_us(&self) -> bool {
        self.locale == US_LOCALE
    }
}

/// Directed edge: `tgt_item` relates to `ref_item` through a shared query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub ref_item: String,
    pub tgt_item: String,
    pub kind: RelationKind,
}

/// Per-anchor count of outgoing edges by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSummary {
    pub ref_item: String,
    pub complement_count: usize,
    pub substitute_count: usize,
    pub irrelevant_count: usize,
}

impl RelationSummary {
    pub fn new(ref_item: impl Into<String>) -> Self {
        RelationSummary {
            ref_item: ref_item.into(),
            ..Default::default()
        }
    }

    pub fn count(&self, kind: RelationKind) -> usize {
        match kind {
            RelationKind::Complement => self.complement_count,
            RelationKind::Irrelevant => self.irrelevant_count,
            RelationKind::Substitute => self.substitute_count,
        }
    }

    pub(crate) fn record(&mut self, kind: RelationKind) {
        match kind {
            RelationKind::Complement => self.complement_count += 1,
            RelationKind::Irrelevant => self.irrelevant_count += 1,
            RelationKind::Substitute => self.substitute_count += 1,
        }
    }
}

/// A summary selected for the training corpus, with its synthetic query id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingItem {
    pub synthetic_query_id: u32,
    pub ref_item: String,
    pub complement_count: usize,
    pub substitute_count: usize,
    pub irrelevant_count: usize,
}

impl TrainingItem {
    /// Query number token for one relation kind, e.g. `17C`.
    pub fn query_number(&self, kind: RelationKind) -> String {
        format!("{}{}", self.synthetic_query_id, kind.code())
    }
}
