//! Batch driver: records -> documents -> per-lexicon scores -> tables.

use crate::aggregate::{build_buckets, category_terms, polarity_map, summarize, term_frequencies, DifferenceTable, LexiconSummary};
use crate::config::PipelineConfig;
use crate::ingest::{ingest, InputRecord};
use crate::lexicon::{Lexicon, LexiconStore, Shape};
use crate::normalize::Normalizer;
use crate::score::{score_documents, ValenceScorer, ZeroScores};
use crate::{DocId, Document, DocumentScore, Error, Result, TermCount, TermDifference};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconReport {
    pub lexicon: String,
    pub shape: Shape,
    pub scores: Vec<DocumentScore>,
    pub summary: LexiconSummary,
    pub category_terms: BTreeMap<String, Vec<TermCount>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValenceScore {
    pub document_id: DocId,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub reference: String,
    pub positive_documents: usize,
    pub negative_documents: usize,
    pub shared_terms: usize,
    pub top: Vec<TermDifference>,
    pub bottom: Vec<TermDifference>,
}

#[derive(Debug, Default)]
pub struct Report {
    pub documents: Vec<Document>,
    pub lexicons: Vec<LexiconReport>,
    pub valence: Vec<ValenceScore>,
    pub term_frequencies: Vec<TermCount>,
    pub comparison: Option<Comparison>,
    pub dropped: usize,
    pub errors: Vec<Error>,
}

impl Report {
    pub fn scores_for(&self, lexicon: &str) -> Option<&[DocumentScore]> {
        self.lexicons.iter().find(|r| r.lexicon == lexicon).map(|r| r.scores.as_slice())
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    store: LexiconStore,
}

impl Pipeline {
    /// Bundled lexicons plus any `extra_lexicons` from the config.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let mut store = LexiconStore::bundled()?;
        for extra in &config.extra_lexicons {
            store.register(Lexicon::from_path(&extra.name, &extra.path, extra.shape, config.duplicates)?);
        }
        Self::with_store(config, store)
    }

    /// Fails up front when any lexicon the config names is missing, so a run
    /// never stops halfway on configuration.
    pub fn with_store(config: PipelineConfig, store: LexiconStore) -> Result<Self> {
        config.validate()?;
        for name in &config.lexicons {
            store.load(name)?;
        }
        store.load(&config.valence_lexicon)?;
        if !config.uses_valence_reference() {
            store.load(&config.reference)?;
        }
        let normalizer = Normalizer::new(&config.normalizer);
        Ok(Self { config, normalizer, store })
    }

    pub fn config(&self) -> &PipelineConfig { &self.config }
    pub fn normalizer(&self) -> &Normalizer { &self.normalizer }
    pub fn store(&self) -> &LexiconStore { &self.store }

    pub fn run<I>(&self, records: I) -> Result<Report>
    where
        I: IntoIterator<Item = Result<InputRecord>>,
    {
        let batch = ingest(records, &self.normalizer);
        let documents = batch.documents;
        let k = self.config.top_k;

        let mut lexicons = Vec::with_capacity(self.config.lexicons.len());
        for name in &self.config.lexicons {
            let lexicon = self.store.load(name)?;
            let scores = score_documents(&documents, lexicon, self.config.zero_scores);
            tracing::debug!(lexicon = name.as_str(), scored = scores.len(), "scored documents");
            lexicons.push(LexiconReport {
                lexicon: name.clone(),
                shape: lexicon.shape(),
                summary: summarize(name, &scores),
                category_terms: category_terms(&documents, lexicon, k),
                scores,
            });
        }

        let valence = self.valence_scores(&documents)?;
        let comparison = self.compare(&documents, &valence)?;

        Ok(Report {
            term_frequencies: term_frequencies(&documents, k),
            documents,
            lexicons,
            valence,
            comparison,
            dropped: batch.dropped,
            errors: batch.errors,
        })
    }

    fn valence_scores(&self, documents: &[Document]) -> Result<Vec<ValenceScore>> {
        let scorer = ValenceScorer::new(self.store.load(&self.config.valence_lexicon)?);
        let keep_all = self.normalizer.keeping_stopwords();
        Ok(documents
            .iter()
            .map(|d| ValenceScore { document_id: d.id, score: scorer.score_text(&keep_all.normalize(&d.raw_text)) })
            .collect())
    }

    fn compare(&self, documents: &[Document], valence: &[ValenceScore]) -> Result<Option<Comparison>> {
        if documents.is_empty() {
            return Ok(None);
        }
        let reference: HashMap<DocId, f64> = if self.config.uses_valence_reference() {
            valence.iter().map(|v| (v.document_id, v.score)).collect()
        } else {
            let lexicon = self.store.load(&self.config.reference)?;
            polarity_map(&score_documents(documents, lexicon, ZeroScores::Keep))
        };
        let (pos, neg) = build_buckets(documents, |id| reference.get(&id).copied());
        let table = DifferenceTable::join(&pos, &neg);
        let k = self.config.top_k;
        Ok(Some(Comparison {
            reference: self.config.reference.clone(),
            positive_documents: pos.documents,
            negative_documents: neg.documents,
            shared_terms: table.len(),
            top: table.top(k),
            bottom: table.bottom(k),
        }))
    }
}
