use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DocId = u32;

/// One unit of input text. `normalized_text` is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub external_id: String,
    pub raw_text: String,
    pub normalized_text: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenOccurrence {
    pub document_id: DocId,
    pub term: String,
    pub count: u32,
}

/// Polarity of one document under one lexicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentScore {
    pub document_id: DocId,
    pub lexicon: String,
    pub polarity: i64,
    /// Number of token occurrences that matched the lexicon.
    pub matched: u32,
    /// Category label -> occurrence count. Numeric lexicons report the
    /// `positive` / `negative` sign of each matched magnitude.
    pub components: BTreeMap<String, u32>,
}

impl DocumentScore {
    pub fn is_zero_match(&self) -> bool { self.matched == 0 }
}

/// Documents of one polarity sign, concatenated and counted as a single
/// pseudo-document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonBucket {
    pub label: String,
    pub documents: usize,
    pub term_frequency: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDifference {
    pub term: String,
    pub count_pos: u32,
    pub count_neg: u32,
    pub difference: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: u32,
}
