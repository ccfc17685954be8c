use crate::aggregate::LexiconSummary;
use crate::pipeline::{Comparison, Report};
use crate::{DocId, Result, TermCount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: usize,
    pub dropped: usize,
    pub errors: Vec<String>,
    pub created_at: String,
    pub version: u32,
}

/// One row of `scores.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub document_id: DocId,
    pub external_id: String,
    pub lexicon: String,
    pub polarity: i64,
    pub matched: u32,
    /// Category counts as a JSON object.
    pub components: String,
}

/// One row of `valence.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValenceRow {
    pub document_id: DocId,
    pub external_id: String,
    pub score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryFile {
    pub lexicons: Vec<LexiconSummary>,
    /// lexicon -> category -> ranked terms
    pub category_terms: BTreeMap<String, BTreeMap<String, Vec<TermCount>>>,
    pub term_frequencies: Vec<TermCount>,
    pub comparison: Option<Comparison>,
}

pub struct ReportPaths {
    pub root: PathBuf,
}

impl ReportPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn scores(&self) -> PathBuf { self.root.join("scores.csv") }
    pub fn valence(&self) -> PathBuf { self.root.join("valence.csv") }
    pub fn summary(&self) -> PathBuf { self.root.join("summary.json") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

pub fn save_scores(paths: &ReportPaths, report: &Report) -> Result<()> {
    create_dir_all(&paths.root)?;
    let external: BTreeMap<DocId, &str> = report.documents.iter().map(|d| (d.id, d.external_id.as_str())).collect();
    let mut w = csv::Writer::from_path(paths.scores())?;
    for lex in &report.lexicons {
        for s in &lex.scores {
            w.serialize(ScoreRow {
                document_id: s.document_id,
                external_id: external.get(&s.document_id).copied().unwrap_or_default().to_string(),
                lexicon: s.lexicon.clone(),
                polarity: s.polarity,
                matched: s.matched,
                components: serde_json::to_string(&s.components)?,
            })?;
        }
    }
    w.flush()?;

    let mut w = csv::Writer::from_path(paths.valence())?;
    for v in &report.valence {
        w.serialize(ValenceRow {
            document_id: v.document_id,
            external_id: external.get(&v.document_id).copied().unwrap_or_default().to_string(),
            score: v.score,
        })?;
    }
    w.flush()?;
    Ok(())
}

pub fn load_scores(paths: &ReportPaths) -> Result<Vec<ScoreRow>> {
    let mut rdr = csv::Reader::from_path(paths.scores())?;
    let mut rows: Vec<ScoreRow> = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn save_summary(paths: &ReportPaths, report: &Report) -> Result<()> {
    create_dir_all(&paths.root)?;
    let summary = SummaryFile {
        lexicons: report.lexicons.iter().map(|l| l.summary.clone()).collect(),
        category_terms: report.lexicons.iter().map(|l| (l.lexicon.clone(), l.category_terms.clone())).collect(),
        term_frequencies: report.term_frequencies.clone(),
        comparison: report.comparison.clone(),
    };
    let mut f = File::create(paths.summary())?;
    let json = serde_json::to_string_pretty(&summary)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_summary(paths: &ReportPaths) -> Result<SummaryFile> {
    let mut f = File::open(paths.summary())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}

pub fn save_meta(paths: &ReportPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &ReportPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Writes scores, valence, summary and meta for one run.
pub fn save_report(paths: &ReportPaths, report: &Report, created_at: String) -> Result<()> {
    save_scores(paths, report)?;
    save_summary(paths, report)?;
    let meta = MetaFile {
        num_docs: report.documents.len(),
        dropped: report.dropped,
        errors: report.errors.iter().map(|e| e.to_string()).collect(),
        created_at,
        version: FORMAT_VERSION,
    };
    save_meta(paths, &meta)
}
