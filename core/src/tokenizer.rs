use crate::{DocId, TokenOccurrence};
use std::collections::BTreeMap;

/// Splits already-normalized text on whitespace into `(doc_id, term)` pairs.
///
/// The iterator borrows `text` and holds no other state, so cloning it (or
/// calling again) replays the same sequence.
pub fn tokenize(doc_id: DocId, text: &str) -> impl Iterator<Item = (DocId, &str)> + Clone {
    text.split_whitespace()
        .filter(|t| !t.is_empty())
        .map(move |t| (doc_id, t))
}

/// Term -> occurrence count for one piece of normalized text.
pub fn term_frequency(text: &str) -> BTreeMap<String, u32> {
    let mut tf: BTreeMap<String, u32> = BTreeMap::new();
    for (_, term) in tokenize(0, text) {
        *tf.entry(term.to_string()).or_insert(0) += 1;
    }
    tf
}

/// Collapses the token stream of one document into occurrences, ordered by
/// term.
pub fn token_occurrences(doc_id: DocId, text: &str) -> Vec<TokenOccurrence> {
    term_frequency(text)
        .into_iter()
        .map(|(term, count)| TokenOccurrence { document_id: doc_id, term, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_repeated_terms() {
        let occ = token_occurrences(7, "oil up oil  down");
        assert_eq!(occ.len(), 3);
        assert_eq!(occ[1], TokenOccurrence { document_id: 7, term: "oil".into(), count: 2 });
    }
}
