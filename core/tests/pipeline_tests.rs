use sentiment_core::aggregate::{build_buckets, DifferenceTable};
use sentiment_core::config::PipelineConfig;
use sentiment_core::ingest::{read_csv, read_jsonl, InputRecord};
use sentiment_core::lexicon::{Category, DuplicatePolicy, Lexicon, LexiconEntry, LexiconStore, PolarityUnit, Shape};
use sentiment_core::normalize::NormalizerOptions;
use sentiment_core::pipeline::Pipeline;
use sentiment_core::score::ZeroScores;
use sentiment_core::{ComparisonBucket, Document, Error, TermDifference};
use std::collections::BTreeMap;

fn toy_store() -> LexiconStore {
    let entries = vec![
        LexiconEntry::new("good", PolarityUnit::Category(Category::Positive)),
        LexiconEntry::new("great", PolarityUnit::Category(Category::Positive)),
        LexiconEntry::new("bad", PolarityUnit::Category(Category::Negative)),
        LexiconEntry::new("terrible", PolarityUnit::Category(Category::Negative)),
    ];
    let mut store = LexiconStore::new();
    store.register(Lexicon::from_entries("toy", Shape::Categorical, entries, DuplicatePolicy::Reject).unwrap());
    store
}

fn toy_config(exclude: &[&str]) -> PipelineConfig {
    PipelineConfig {
        lexicons: vec!["toy".into()],
        reference: "toy".into(),
        valence_lexicon: "toy".into(),
        normalizer: NormalizerOptions { exclude_terms: exclude.iter().map(|t| t.to_string()).collect(), ..Default::default() },
        ..Default::default()
    }
}

fn records(texts: &[&str]) -> Vec<sentiment_core::Result<InputRecord>> {
    texts.iter().enumerate().map(|(i, t)| Ok(InputRecord::new(i.to_string(), *t))).collect()
}

fn doc(id: u32, text: &str) -> Document {
    Document { id, external_id: id.to_string(), raw_text: text.into(), normalized_text: text.into(), created_at: None }
}

#[test]
fn scores_two_documents_with_opposite_polarity() {
    let pipeline = Pipeline::with_store(toy_config(&["oil"]), toy_store()).unwrap();
    let report = pipeline.run(records(&["good great oil rises", "bad terrible oil falls"])).unwrap();
    let polarities: Vec<i64> = report.scores_for("toy").unwrap().iter().map(|s| s.polarity).collect();
    assert_eq!(polarities, vec![2, -2]);
    assert_eq!(report.documents[0].normalized_text, "good great rises");
    assert_eq!(report.dropped, 0);
}

#[test]
fn empty_input_yields_empty_report() {
    let pipeline = Pipeline::with_store(toy_config(&[]), toy_store()).unwrap();
    let report = pipeline.run(Vec::new()).unwrap();
    assert!(report.documents.is_empty());
    assert!(report.scores_for("toy").unwrap().is_empty());
    assert_eq!(report.dropped, 0);
    assert!(report.errors.is_empty());
    assert!(report.comparison.is_none());
}

#[test]
fn difference_table_keeps_only_shared_terms() {
    let bucket = |label: &str, tf: &[(&str, u32)]| ComparisonBucket {
        label: label.into(),
        documents: 1,
        term_frequency: tf.iter().map(|(t, c)| (t.to_string(), *c)).collect::<BTreeMap<_, _>>(),
    };
    let pos = bucket("positive", &[("up", 3), ("rise", 1)]);
    let neg = bucket("negative", &[("up", 1), ("down", 2)]);
    let table = DifferenceTable::join(&pos, &neg);
    assert_eq!(
        table.rows(),
        &[TermDifference { term: "up".into(), count_pos: 3, count_neg: 1, difference: 2 }]
    );
}

#[test]
fn buckets_follow_reference_sign() {
    let docs = vec![doc(0, "up up up rise"), doc(1, "up down down"), doc(2, "up sideways")];
    let polarity = |id: u32| match id {
        0 => Some(1.0),
        1 => Some(-2.0),
        _ => Some(0.0),
    };
    let (pos, neg) = build_buckets(&docs, polarity);
    assert_eq!((pos.documents, neg.documents), (1, 1));
    assert_eq!(pos.term_frequency.get("up"), Some(&3));
    let table = DifferenceTable::join(&pos, &neg);
    assert_eq!(table.top(10).len(), 1);
    assert_eq!(table.top(10)[0].difference, 2);
}

#[test]
fn ranking_ties_are_alphabetical() {
    let mut pos = ComparisonBucket::default();
    let mut neg = ComparisonBucket::default();
    for (t, p, n) in [("zeta", 2, 1), ("alpha", 2, 1), ("mid", 5, 1), ("low", 1, 4)] {
        pos.term_frequency.insert(t.to_string(), p);
        neg.term_frequency.insert(t.to_string(), n);
    }
    let table = DifferenceTable::join(&pos, &neg);
    let top: Vec<String> = table.top(3).into_iter().map(|r| r.term).collect();
    assert_eq!(top, vec!["mid", "alpha", "zeta"]);
    let bottom: Vec<String> = table.bottom(2).into_iter().map(|r| r.term).collect();
    assert_eq!(bottom, vec!["low", "alpha"]);
}

#[test]
fn malformed_records_are_counted_not_fatal() {
    let pipeline = Pipeline::with_store(toy_config(&[]), toy_store()).unwrap();
    let input = vec![
        Ok(InputRecord::new("a", "good day")),
        Ok(InputRecord { id: Some("b".into()), text: None, created_at: None }),
        Err(Error::validation(3, "broken row")),
        Ok(InputRecord { id: None, text: Some("bad day".into()), created_at: None }),
    ];
    let report = pipeline.run(input).unwrap();
    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.dropped, 2);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().all(|e| matches!(e, Error::Validation { .. })));
    assert_eq!(report.documents[1].external_id, "4");
}

#[test]
fn zero_match_documents_follow_policy() {
    let texts = ["good news", "nothing to see"];
    let keep = Pipeline::with_store(toy_config(&[]), toy_store()).unwrap();
    assert_eq!(keep.run(records(&texts)).unwrap().scores_for("toy").unwrap().len(), 2);

    let sparse_cfg = PipelineConfig { zero_scores: ZeroScores::Drop, ..toy_config(&[]) };
    let sparse = Pipeline::with_store(sparse_cfg, toy_store()).unwrap();
    let report = sparse.run(records(&texts)).unwrap();
    let scores = report.scores_for("toy").unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].polarity, 1);
}

#[test]
fn unknown_lexicon_fails_before_running() {
    let cfg = PipelineConfig { lexicons: vec!["nope".into()], ..toy_config(&[]) };
    assert!(matches!(Pipeline::with_store(cfg, toy_store()), Err(Error::Configuration(_))));
}

#[test]
fn valence_reference_sees_negation() {
    let cfg = PipelineConfig { reference: "valence".into(), ..toy_config(&[]) };
    let pipeline = Pipeline::with_store(cfg, toy_store()).unwrap();
    let report = pipeline.run(records(&["prices not good", "prices good"])).unwrap();
    assert!(report.valence[0].score < 0.0);
    assert!(report.valence[1].score > 0.0);
    // the lexicon score never sees "not", it is a stop-word
    assert_eq!(report.scores_for("toy").unwrap()[0].polarity, 1);
    let cmp = report.comparison.unwrap();
    assert_eq!((cmp.positive_documents, cmp.negative_documents), (1, 1));
    assert_eq!(cmp.top[0].term, "good");
}

#[test]
fn bundled_defaults_run_end_to_end() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let report = pipeline.run(records(&["Great rally, strong gains!", "Terrible crash, bad losses"])).unwrap();
    assert_eq!(report.lexicons.len(), 3);
    for lex in &report.lexicons {
        assert!(lex.scores[0].polarity > 0, "{}", lex.lexicon);
        assert!(lex.scores[1].polarity < 0, "{}", lex.lexicon);
    }
    let loughran = report.lexicons.iter().find(|l| l.lexicon == "loughran").unwrap();
    assert_eq!(loughran.summary.positive, 1);
    assert!(loughran.category_terms["positive"].iter().any(|t| t.term == "gains"));
}

#[test]
fn readers_replace_bad_bytes_and_skip_blank_lines() {
    let csv_bytes: &[u8] = b"id,text,extra\n1,\"good \xff day\",x\n2,,y\n";
    let rows = read_csv(csv_bytes).unwrap();
    assert_eq!(rows.len(), 2);
    let first = rows[0].as_ref().unwrap();
    assert_eq!(first.text.as_deref(), Some("good \u{FFFD} day"));
    assert_eq!(rows[1].as_ref().unwrap().text.as_deref(), Some(""));

    let jsonl: &[u8] = b"{\"id\":\"a\",\"text\":\"great\"}\n\n{not json}\n{\"text\":\"bad\"}\n";
    let rows = read_jsonl(jsonl).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].is_err());
    assert_eq!(rows[2].as_ref().unwrap().id, None);
}
