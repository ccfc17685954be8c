use crate::lexicon::{Category, Lexicon, PolarityUnit};
use crate::tokenizer::token_occurrences;
use crate::{DocId, Document, DocumentScore, TokenOccurrence};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether documents without a single lexicon match appear in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroScores {
    /// Every document gets a score row, zero when nothing matched.
    #[default]
    Keep,
    /// Only documents with at least one match (inner-join output).
    Drop,
}

/// Joins a document's occurrences against `lexicon` (inner join: terms absent
/// from the lexicon contribute nothing) and aggregates per the lexicon shape.
pub fn score(document_id: DocId, tokens: &[TokenOccurrence], lexicon: &Lexicon) -> DocumentScore {
    let mut polarity: i64 = 0;
    let mut matched: u32 = 0;
    let mut components: BTreeMap<String, u32> = BTreeMap::new();
    for occ in tokens {
        let Some(unit) = lexicon.get(&occ.term) else { continue };
        matched = matched.saturating_add(occ.count);
        let label = match unit {
            // Only positive/negative move the polarity; the finer categories
            // are reported as counts.
            PolarityUnit::Category(c) => {
                polarity = polarity.saturating_add(c.sign() * i64::from(occ.count));
                c.as_str()
            }
            PolarityUnit::Magnitude(m) => {
                polarity = polarity.saturating_add(m.saturating_mul(i64::from(occ.count)));
                magnitude_label(m)
            }
        };
        let n = components.entry(label.to_string()).or_insert(0);
        *n = n.saturating_add(occ.count);
    }
    DocumentScore { document_id, lexicon: lexicon.name().to_string(), polarity, matched, components }
}

fn magnitude_label(m: i64) -> &'static str {
    match m.signum() {
        1 => Category::Positive.as_str(),
        -1 => Category::Negative.as_str(),
        _ => "neutral",
    }
}

pub fn score_document(doc: &Document, lexicon: &Lexicon) -> DocumentScore {
    let tokens = token_occurrences(doc.id, &doc.normalized_text);
    score(doc.id, &tokens, lexicon)
}

/// Scores every document, in input order.
pub fn score_documents(docs: &[Document], lexicon: &Lexicon, zero: ZeroScores) -> Vec<DocumentScore> {
    docs.iter()
        .map(|d| score_document(d, lexicon))
        .filter(|s| zero == ZeroScores::Keep || !s.is_zero_match())
        .collect()
}

const NEGATORS: &[&str] = &["not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "without", "hardly"];
const AMPLIFIERS: &[&str] = &["very", "really", "extremely", "absolutely", "totally", "highly", "so", "super", "incredibly", "massively"];
const DEAMPLIFIERS: &[&str] = &["slightly", "somewhat", "barely", "marginally", "partly"];

/// Whole-document heuristic that reads the token sequence, unlike [`score`]
/// which only sees counts. A negator flips the next sentiment word inside the
/// window, amplifiers and de-amplifiers scale it, and the sum is damped by
/// the square root of the token count.
#[derive(Debug, Clone)]
pub struct ValenceScorer<'a> {
    lexicon: &'a Lexicon,
    negation_window: usize,
}

impl<'a> ValenceScorer<'a> {
    pub const NAME: &'static str = "valence";

    pub fn new(lexicon: &'a Lexicon) -> Self { Self { lexicon, negation_window: 3 } }

    pub fn with_negation_window(mut self, window: usize) -> Self {
        self.negation_window = window;
        self
    }

    fn value(&self, term: &str) -> f64 {
        match self.lexicon.get(term) {
            Some(PolarityUnit::Magnitude(m)) => m as f64,
            Some(PolarityUnit::Category(c)) => c.sign() as f64,
            None => 0.0,
        }
    }

    /// `text` must still contain its stop-words, otherwise negators are gone.
    pub fn score_text(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return 0.0;
        }
        let mut total = 0.0;
        let mut modifier = 1.0;
        let mut negation_left = 0usize;
        for tok in &tokens {
            if NEGATORS.contains(tok) {
                negation_left = self.negation_window;
                continue;
            }
            if AMPLIFIERS.contains(tok) {
                modifier = 1.5;
                continue;
            }
            if DEAMPLIFIERS.contains(tok) {
                modifier = 0.5;
                continue;
            }
            let value = self.value(tok);
            if value != 0.0 {
                let mut v = value * modifier;
                if negation_left > 0 {
                    v = -v;
                    negation_left = 0;
                }
                total += v;
                modifier = 1.0;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
        }
        total / (tokens.len() as f64).sqrt()
    }
}
