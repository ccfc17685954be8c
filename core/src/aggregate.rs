//! Frequency tables, polarity buckets and the ranked bucket-difference table.

use crate::lexicon::{Lexicon, PolarityUnit};
use crate::tokenizer::{term_frequency, token_occurrences};
use crate::{ComparisonBucket, DocId, Document, DocumentScore, TermCount, TermDifference};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

pub const POSITIVE: &str = "positive";
pub const NEGATIVE: &str = "negative";

/// Descending count, ties by term. Keeps at most `k` rows.
pub fn rank_terms<I>(counts: I, k: usize) -> Vec<TermCount>
where
    I: IntoIterator<Item = (String, u32)>,
{
    let mut rows: Vec<TermCount> = counts.into_iter().map(|(term, count)| TermCount { term, count }).collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    rows.truncate(k);
    rows
}

/// Corpus-wide term counts (word-cloud input).
pub fn term_frequencies(docs: &[Document], k: usize) -> Vec<TermCount> {
    let mut tf: HashMap<String, u32> = HashMap::new();
    for doc in docs {
        for occ in token_occurrences(doc.id, &doc.normalized_text) {
            *tf.entry(occ.term).or_insert(0) += occ.count;
        }
    }
    rank_terms(tf, k)
}

/// For each category of `lexicon` (sign for numeric lexicons), the matched
/// terms with their corpus counts, ranked.
pub fn category_terms(docs: &[Document], lexicon: &Lexicon, k: usize) -> BTreeMap<String, Vec<TermCount>> {
    let mut by_label: BTreeMap<String, HashMap<String, u32>> = BTreeMap::new();
    for doc in docs {
        for occ in token_occurrences(doc.id, &doc.normalized_text) {
            let label = match lexicon.get(&occ.term) {
                Some(PolarityUnit::Category(c)) => c.as_str(),
                Some(PolarityUnit::Magnitude(m)) if m > 0 => POSITIVE,
                Some(PolarityUnit::Magnitude(m)) if m < 0 => NEGATIVE,
                _ => continue,
            };
            *by_label.entry(label.to_string()).or_default().entry(occ.term).or_insert(0) += occ.count;
        }
    }
    by_label.into_iter().map(|(label, tf)| (label, rank_terms(tf, k))).collect()
}

pub fn polarity_map(scores: &[DocumentScore]) -> HashMap<DocId, f64> {
    scores.iter().map(|s| (s.document_id, s.polarity as f64)).collect()
}

/// Splits documents by the sign of their reference polarity and counts terms
/// of each side as one concatenated pseudo-document. Zero and missing
/// polarities belong to neither bucket.
pub fn build_buckets<F>(docs: &[Document], polarity_of: F) -> (ComparisonBucket, ComparisonBucket)
where
    F: Fn(DocId) -> Option<f64>,
{
    let mut pos_text: Vec<&str> = Vec::new();
    let mut neg_text: Vec<&str> = Vec::new();
    for doc in docs {
        match polarity_of(doc.id) {
            Some(p) if p > 0.0 => pos_text.push(&doc.normalized_text),
            Some(p) if p < 0.0 => neg_text.push(&doc.normalized_text),
            _ => {}
        }
    }
    let bucket = |label: &str, texts: Vec<&str>| ComparisonBucket {
        label: label.to_string(),
        documents: texts.len(),
        term_frequency: term_frequency(&texts.join(" ")),
    };
    (bucket(POSITIVE, pos_text), bucket(NEGATIVE, neg_text))
}

/// Shared-term difference table, sorted by descending difference with ties
/// broken alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceTable {
    rows: Vec<TermDifference>,
}

impl DifferenceTable {
    /// Inner join of the two buckets: a term present in only one bucket is
    /// left out of the table.
    pub fn join(pos: &ComparisonBucket, neg: &ComparisonBucket) -> Self {
        let mut rows: Vec<TermDifference> = pos
            .term_frequency
            .iter()
            .filter_map(|(term, &count_pos)| {
                neg.term_frequency.get(term).map(|&count_neg| TermDifference {
                    term: term.clone(),
                    count_pos,
                    count_neg,
                    difference: i64::from(count_pos) - i64::from(count_neg),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.difference.cmp(&a.difference).then_with(|| a.term.cmp(&b.term)));
        Self { rows }
    }

    pub fn rows(&self) -> &[TermDifference] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Most positive-leaning terms.
    pub fn top(&self, k: usize) -> Vec<TermDifference> {
        self.rows.iter().take(k).cloned().collect()
    }

    /// Most negative-leaning terms, ascending difference, ties alphabetical.
    pub fn bottom(&self, k: usize) -> Vec<TermDifference> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| a.difference.cmp(&b.difference).then_with(|| a.term.cmp(&b.term)));
        rows.truncate(k);
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconSummary {
    pub lexicon: String,
    pub documents: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub total_polarity: i64,
    pub mean_polarity: f64,
}

pub fn summarize(lexicon: &str, scores: &[DocumentScore]) -> LexiconSummary {
    let mut summary = LexiconSummary {
        lexicon: lexicon.to_string(),
        documents: scores.len(),
        positive: 0,
        negative: 0,
        neutral: 0,
        total_polarity: 0,
        mean_polarity: 0.0,
    };
    for s in scores {
        match s.polarity.cmp(&0) {
            Ordering::Greater => summary.positive += 1,
            Ordering::Less => summary.negative += 1,
            Ordering::Equal => summary.neutral += 1,
        }
        summary.total_polarity = summary.total_polarity.saturating_add(s.polarity);
    }
    if !scores.is_empty() {
        summary.mean_polarity = summary.total_polarity as f64 / scores.len() as f64;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_breaks_ties_alphabetically() {
        let ranked = rank_terms(vec![("b".to_string(), 2), ("a".to_string(), 2), ("c".to_string(), 5)], 2);
        assert_eq!(ranked.iter().map(|t| t.term.as_str()).collect::<Vec<_>>(), vec!["c", "a"]);
    }
}
