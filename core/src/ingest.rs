//! Raw record intake: flat CSV / JSON Lines readers and validation into
//! [`Document`]s. Bad rows are counted and kept as errors, never fatal.

use crate::normalize::Normalizer;
use crate::{DocId, Document, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl InputRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: Some(id.into()), text: Some(text.into()), created_at: None }
    }
}

/// Accepted documents plus what was dropped on the way.
#[derive(Debug, Default)]
pub struct Batch {
    pub documents: Vec<Document>,
    pub dropped: usize,
    pub errors: Vec<Error>,
}

/// Validates and normalizes records in order. Document ids are assigned
/// densely to accepted records; a record without an id uses its 1-based
/// ordinal as external id.
pub fn ingest<I>(records: I, normalizer: &Normalizer) -> Batch
where
    I: IntoIterator<Item = Result<InputRecord>>,
{
    let mut batch = Batch::default();
    let mut next_doc_id: DocId = 0;
    for (idx, record) in records.into_iter().enumerate() {
        let ordinal = idx + 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                // Readers number rows per file; report the batch-wide ordinal.
                let e = match e {
                    Error::Validation { reason, .. } => Error::validation(ordinal, reason),
                    other => other,
                };
                tracing::warn!(record = ordinal, error = %e, "dropping unreadable record");
                batch.dropped += 1;
                batch.errors.push(e);
                continue;
            }
        };
        let text = match record.text {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                tracing::warn!(record = ordinal, "dropping record without text");
                batch.dropped += 1;
                batch.errors.push(Error::validation(ordinal, "missing text"));
                continue;
            }
        };
        let external_id = record
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| ordinal.to_string());
        let normalized_text = normalizer.normalize(&text);
        batch.documents.push(Document {
            id: next_doc_id,
            external_id,
            raw_text: text,
            normalized_text,
            created_at: record.created_at,
        });
        next_doc_id += 1;
    }
    tracing::info!(documents = batch.documents.len(), dropped = batch.dropped, "ingested records");
    batch
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Reads a CSV with a header row. Columns are located by name (`id`, `text`,
/// `created_at`, case-insensitive); other columns are ignored. Invalid UTF-8
/// is replaced rather than rejected.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Result<InputRecord>>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
    let headers = rdr.byte_headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| lossy(h).trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
    };
    let (id_col, text_col, created_col) = (column("id"), column("text"), column("created_at"));
    if text_col.is_none() {
        tracing::warn!("csv input has no text column; every row will be dropped");
    }

    let mut out = Vec::new();
    for (idx, rec) in rdr.byte_records().enumerate() {
        let item = match rec {
            Ok(rec) => {
                let field = |col: Option<usize>| col.and_then(|c| rec.get(c)).map(lossy);
                Ok(InputRecord { id: field(id_col), text: field(text_col), created_at: field(created_col) })
            }
            Err(e) => Err(Error::validation(idx + 1, e.to_string())),
        };
        out.push(item);
    }
    Ok(out)
}

/// Reads one JSON object per line; blank lines are skipped.
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<Result<InputRecord>>> {
    let mut out = Vec::new();
    for line in reader.split(b'\n') {
        let line = lossy(&line?);
        if line.trim().is_empty() {
            continue;
        }
        let ordinal = out.len() + 1;
        out.push(serde_json::from_str::<InputRecord>(&line).map_err(|e| Error::validation(ordinal, e.to_string())));
    }
    Ok(out)
}

/// Dispatches on extension: `.jsonl` is JSON Lines, anything else is CSV.
pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Vec<Result<InputRecord>>> {
    let path = path.as_ref();
    let f = File::open(path)?;
    match path.extension().and_then(|s| s.to_str()) {
        Some("jsonl") => read_jsonl(BufReader::new(f)),
        _ => read_csv(f),
    }
}
