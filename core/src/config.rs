use crate::lexicon::{DuplicatePolicy, Shape};
use crate::normalize::NormalizerOptions;
use crate::score::{ValenceScorer, ZeroScores};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A lexicon table read from disk in addition to the bundled ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconFile {
    pub name: String,
    pub path: PathBuf,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Lexicons to score with, in report order.
    pub lexicons: Vec<String>,
    pub extra_lexicons: Vec<LexiconFile>,
    #[serde(flatten)]
    pub normalizer: NormalizerOptions,
    /// Lexicon name, or `valence` for the whole-document heuristic, whose
    /// sign splits documents into comparison buckets.
    pub reference: String,
    /// Numeric lexicon the valence heuristic reads.
    pub valence_lexicon: String,
    pub top_k: usize,
    pub zero_scores: ZeroScores,
    pub duplicates: DuplicatePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lexicons: vec!["bing".into(), "loughran".into(), "afinn".into()],
            extra_lexicons: Vec::new(),
            normalizer: NormalizerOptions::default(),
            reference: "bing".into(),
            valence_lexicon: "afinn".into(),
            top_k: 10,
            zero_scores: ZeroScores::Keep,
            duplicates: DuplicatePolicy::LastWriteWins,
        }
    }
}

impl PipelineConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("cannot read config {}: {e}", path.display())))?;
        let cfg: PipelineConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::configuration(format!("invalid config {}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lexicons.is_empty() {
            return Err(Error::configuration("no lexicons selected"));
        }
        if self.top_k == 0 {
            return Err(Error::configuration("top_k must be at least 1"));
        }
        Ok(())
    }

    pub fn uses_valence_reference(&self) -> bool { self.reference == ValenceScorer::NAME }
}
