use anyhow::{bail, Context, Result};
use sentiment_core::config::PipelineConfig;
use sentiment_core::ingest::{read_path, InputRecord};
use sentiment_core::persist::{save_report, ReportPaths};
use sentiment_core::pipeline::{Pipeline, Report};
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

/// Flag values that override the config file; `None`/empty means "keep".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub lexicons: Vec<String>,
    pub exclude: Vec<String>,
    pub reference: Option<String>,
    pub top_k: Option<usize>,
    pub sparse: bool,
}

pub fn resolve_config(config_path: Option<&Path>, overrides: &Overrides) -> Result<PipelineConfig> {
    let mut cfg = match config_path {
        Some(p) => PipelineConfig::from_path(p)?,
        None => PipelineConfig::default(),
    };
    if !overrides.lexicons.is_empty() {
        cfg.lexicons = overrides.lexicons.clone();
    }
    cfg.normalizer.exclude_terms.extend(overrides.exclude.iter().cloned());
    if let Some(reference) = &overrides.reference {
        cfg.reference = reference.clone();
    }
    if let Some(k) = overrides.top_k {
        cfg.top_k = k;
    }
    if overrides.sparse {
        cfg.zero_scores = sentiment_core::score::ZeroScores::Drop;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// `.csv` / `.jsonl` files under `input` in path order, or `input` itself.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "csv" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        bail!("input {} does not exist", input.display());
    }
    Ok(files)
}

/// Reads every input file, runs the pipeline and writes the report directory.
pub fn run_batch(input: &Path, output: &Path, config: PipelineConfig) -> Result<Report> {
    let pipeline = Pipeline::new(config)?;
    let mut records: Vec<sentiment_core::Result<InputRecord>> = Vec::new();
    for file in collect_inputs(input)? {
        let rows = read_path(&file).with_context(|| format!("reading {}", file.display()))?;
        tracing::debug!(file = %file.display(), rows = rows.len(), "read input file");
        records.extend(rows);
    }

    let report = pipeline.run(records)?;
    let paths = ReportPaths::new(output);
    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    save_report(&paths, &report, created_at)?;
    tracing::info!(
        output = %output.display(),
        documents = report.documents.len(),
        dropped = report.dropped,
        "report written"
    );
    Ok(report)
}
