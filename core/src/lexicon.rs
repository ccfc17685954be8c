//! Sentiment lexicons: immutable term -> polarity unit tables.
//!
//! Two shapes exist. Categorical lexicons label a term with a [`Category`];
//! numeric lexicons attach a signed integer magnitude. A lookup miss is not
//! an error, the term simply carries no sentiment for that lexicon.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const BUNDLED: &[(&str, Shape, &str)] = &[
    ("bing", Shape::Categorical, include_str!("../lexicons/bing.csv")),
    ("loughran", Shape::Categorical, include_str!("../lexicons/loughran.csv")),
    ("afinn", Shape::Numeric, include_str!("../lexicons/afinn.csv")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Positive,
    Negative,
    Uncertainty,
    Litigious,
    Constraining,
    Superfluous,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Positive => "positive",
            Category::Negative => "negative",
            Category::Uncertainty => "uncertainty",
            Category::Litigious => "litigious",
            Category::Constraining => "constraining",
            Category::Superfluous => "superfluous",
        }
    }

    /// Contribution of one occurrence to the signed polarity.
    pub fn sign(&self) -> i64 {
        match self {
            Category::Positive => 1,
            Category::Negative => -1,
            _ => 0,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Category::Positive),
            "negative" => Ok(Category::Negative),
            "uncertainty" => Ok(Category::Uncertainty),
            "litigious" => Ok(Category::Litigious),
            "constraining" => Ok(Category::Constraining),
            "superfluous" => Ok(Category::Superfluous),
            other => Err(Error::configuration(format!("unknown sentiment category {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarityUnit {
    Category(Category),
    Magnitude(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Categorical,
    Numeric,
}

impl Shape {
    fn parse_unit(&self, raw: &str) -> Result<PolarityUnit> {
        match self {
            Shape::Categorical => Ok(PolarityUnit::Category(raw.parse()?)),
            Shape::Numeric => raw
                .trim()
                .parse::<i64>()
                .map(PolarityUnit::Magnitude)
                .map_err(|_| Error::configuration(format!("non-integer magnitude {raw:?}"))),
        }
    }

    fn accepts(&self, unit: &PolarityUnit) -> bool {
        matches!((self, unit), (Shape::Categorical, PolarityUnit::Category(_)) | (Shape::Numeric, PolarityUnit::Magnitude(_)))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Categorical => "categorical",
            Shape::Numeric => "numeric",
        })
    }
}

/// What happens when a table lists the same term twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later row replaces the earlier one.
    #[default]
    LastWriteWins,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub term: String,
    pub unit: PolarityUnit,
}

impl LexiconEntry {
    pub fn new(term: impl Into<String>, unit: PolarityUnit) -> Self {
        Self { term: term.into(), unit }
    }
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    name: String,
    shape: Shape,
    entries: HashMap<String, PolarityUnit>,
}

impl Lexicon {
    /// Builds a lexicon, keying on the lowercased term. Every entry must match
    /// `shape`; duplicates are handled per `policy`.
    pub fn from_entries<I>(name: &str, shape: Shape, entries: I, policy: DuplicatePolicy) -> Result<Self>
    where
        I: IntoIterator<Item = LexiconEntry>,
    {
        let mut map: HashMap<String, PolarityUnit> = HashMap::new();
        for entry in entries {
            let term = entry.term.trim().to_lowercase();
            if term.is_empty() {
                return Err(Error::configuration(format!("lexicon {name}: empty term")));
            }
            if !shape.accepts(&entry.unit) {
                return Err(Error::configuration(format!("lexicon {name}: {term:?} is not a {shape} entry")));
            }
            if let Some(previous) = map.insert(term.clone(), entry.unit) {
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(Error::configuration(format!("lexicon {name}: duplicate term {term:?}")));
                    }
                    DuplicatePolicy::LastWriteWins => {
                        tracing::debug!(lexicon = name, %term, ?previous, replacement = ?entry.unit, "duplicate lexicon term overwritten");
                    }
                }
            }
        }
        Ok(Self { name: name.to_string(), shape, entries: map })
    }

    /// Reads a two-column table with a header row: term, then a category
    /// label or an integer depending on `shape`.
    pub fn from_csv_reader<R: Read>(name: &str, shape: Shape, reader: R, policy: DuplicatePolicy) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
        let mut entries = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| Error::configuration(format!("lexicon {name}: row {}: {e}", row + 1)))?;
            let (term, raw) = match (record.get(0), record.get(1)) {
                (Some(term), Some(raw)) => (term, raw),
                _ => return Err(Error::configuration(format!("lexicon {name}: row {} needs two columns", row + 1))),
            };
            let unit = shape
                .parse_unit(raw)
                .map_err(|e| Error::configuration(format!("lexicon {name}: row {}: {e}", row + 1)))?;
            entries.push(LexiconEntry::new(term, unit));
        }
        Self::from_entries(name, shape, entries, policy)
    }

    pub fn from_path<P: AsRef<Path>>(name: &str, path: P, shape: Shape, policy: DuplicatePolicy) -> Result<Self> {
        let f = File::open(path.as_ref()).map_err(|e| {
            Error::configuration(format!("lexicon {name}: cannot open {}: {e}", path.as_ref().display()))
        })?;
        Self::from_csv_reader(name, shape, f, policy)
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn shape(&self) -> Shape { self.shape }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, term: &str) -> Option<PolarityUnit> { self.entries.get(term).copied() }
}

/// Named lexicons available to a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct LexiconStore {
    lexicons: BTreeMap<String, Lexicon>,
}

impl LexiconStore {
    pub fn new() -> Self { Self::default() }

    /// Store preloaded with the embedded `bing`, `loughran` and `afinn` tables.
    pub fn bundled() -> Result<Self> {
        let mut store = Self::new();
        for (name, shape, table) in BUNDLED {
            let lexicon = Lexicon::from_csv_reader(name, *shape, table.as_bytes(), DuplicatePolicy::LastWriteWins)?;
            store.register(lexicon);
        }
        Ok(store)
    }

    /// Adds a lexicon; a lexicon of the same name is replaced.
    pub fn register(&mut self, lexicon: Lexicon) {
        tracing::debug!(lexicon = lexicon.name(), entries = lexicon.len(), shape = %lexicon.shape(), "registered lexicon");
        if let Some(old) = self.lexicons.insert(lexicon.name.clone(), lexicon) {
            tracing::warn!(lexicon = old.name(), "lexicon replaced");
        }
    }

    pub fn load(&self, name: &str) -> Result<&Lexicon> {
        self.lexicons
            .get(name)
            .ok_or_else(|| Error::configuration(format!("unknown lexicon {name:?}")))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.lexicons.keys().map(String::as_str) }

    pub fn iter(&self) -> impl Iterator<Item = &Lexicon> { self.lexicons.values() }
}
