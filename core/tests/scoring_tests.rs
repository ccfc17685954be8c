use sentiment_core::lexicon::{Category, DuplicatePolicy, Lexicon, LexiconEntry, LexiconStore, PolarityUnit, Shape};
use sentiment_core::score::score;
use sentiment_core::tokenizer::token_occurrences;
use sentiment_core::{Error, TokenOccurrence};

fn categorical(words: &[(&str, Category)]) -> Lexicon {
    let entries = words.iter().map(|(w, c)| LexiconEntry::new(*w, PolarityUnit::Category(*c)));
    Lexicon::from_entries("cat", Shape::Categorical, entries, DuplicatePolicy::Reject).unwrap()
}

#[test]
fn numeric_score_is_linear_over_concatenation() {
    let store = LexiconStore::bundled().unwrap();
    let afinn = store.load("afinn").unwrap();
    let pairs = [
        ("good bad good", "great bad"),
        ("crisis panic", "win win superb"),
        ("nothing matches here", "terrible"),
    ];
    for (a, b) in pairs {
        let joined = format!("{a} {b}");
        let sa = score(0, &token_occurrences(0, a), afinn).polarity;
        let sb = score(1, &token_occurrences(1, b), afinn).polarity;
        let sab = score(2, &token_occurrences(2, &joined), afinn).polarity;
        assert_eq!(sa + sb, sab, "{a:?} + {b:?}");
    }
}

#[test]
fn categorical_polarity_is_positive_minus_negative() {
    let lex = categorical(&[
        ("gain", Category::Positive),
        ("strong", Category::Positive),
        ("loss", Category::Negative),
        ("may", Category::Uncertainty),
        ("court", Category::Litigious),
    ]);
    let token_sets: &[&[(&str, u32)]] = &[
        &[("gain", 3), ("loss", 1)],
        &[("loss", 4), ("may", 2), ("court", 1)],
        &[("strong", 1), ("gain", 1), ("unrelated", 9)],
        &[],
    ];
    for set in token_sets {
        let tokens: Vec<TokenOccurrence> = set
            .iter()
            .map(|(t, c)| TokenOccurrence { document_id: 0, term: t.to_string(), count: *c })
            .collect();
        let s = score(0, &tokens, &lex);
        let pos = *s.components.get("positive").unwrap_or(&0) as i64;
        let neg = *s.components.get("negative").unwrap_or(&0) as i64;
        assert_eq!(s.polarity, pos - neg);
    }
}

#[test]
fn finer_categories_are_counted_but_unsigned() {
    let lex = categorical(&[("may", Category::Uncertainty), ("loss", Category::Negative)]);
    let s = score(0, &token_occurrences(0, "may may loss"), &lex);
    assert_eq!(s.polarity, -1);
    assert_eq!(s.components.get("uncertainty"), Some(&2));
    assert_eq!(s.matched, 3);
}

#[test]
fn lookup_miss_contributes_zero() {
    let store = LexiconStore::bundled().unwrap();
    for name in ["bing", "loughran", "afinn"] {
        let lex = store.load(name).unwrap();
        assert_eq!(lex.get("zzzunknownzzz"), None);
        let s = score(5, &token_occurrences(5, "zzzunknownzzz qqq"), lex);
        assert_eq!((s.polarity, s.matched), (0, 0));
        assert!(s.components.is_empty());
    }
}

#[test]
fn duplicate_terms_last_write_wins() {
    let entries = vec![
        LexiconEntry::new("x", PolarityUnit::Category(Category::Positive)),
        LexiconEntry::new("x", PolarityUnit::Category(Category::Negative)),
    ];
    let lex = Lexicon::from_entries("dup", Shape::Categorical, entries.clone(), DuplicatePolicy::LastWriteWins).unwrap();
    assert_eq!(lex.get("x"), Some(PolarityUnit::Category(Category::Negative)));

    let err = Lexicon::from_entries("dup", Shape::Categorical, entries, DuplicatePolicy::Reject).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn unknown_lexicon_is_configuration_error() {
    let store = LexiconStore::bundled().unwrap();
    assert!(matches!(store.load("nrc"), Err(Error::Configuration(_))));
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["afinn", "bing", "loughran"]);
}

#[test]
fn mixed_shapes_are_rejected() {
    let entries = vec![LexiconEntry::new("good", PolarityUnit::Magnitude(3))];
    let err = Lexicon::from_entries("m", Shape::Categorical, entries, DuplicatePolicy::LastWriteWins).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}
