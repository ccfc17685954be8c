use anyhow::Result;
use clap::{Parser, Subcommand};
use scorer::{resolve_config, run_batch, Overrides};
use sentiment_core::lexicon::LexiconStore;
use sentiment_core::normalize::{Normalizer, NormalizerOptions};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scorer")]
#[command(about = "Clean short posts and score them against sentiment lexicons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a CSV/JSONL file (or a directory of them) and write a report directory
    Run {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output report directory
        #[arg(long)]
        output: PathBuf,
        /// JSON pipeline config; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Lexicon to score with (repeatable)
        #[arg(long = "lexicon")]
        lexicons: Vec<String>,
        /// Domain term to drop, e.g. the queried hashtag (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// Lexicon name or "valence" used to split comparison buckets
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        top_k: Option<usize>,
        /// Omit documents with no lexicon match from scores.csv
        #[arg(long, default_value_t = false)]
        sparse: bool,
    },
    /// List bundled lexicons
    Lexicons,
    /// Print the normalized form of TEXT
    Normalize {
        text: String,
        #[arg(long)]
        exclude: Vec<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { input, output, config, lexicons, exclude, reference, top_k, sparse } => {
            let overrides = Overrides { lexicons, exclude, reference, top_k, sparse };
            let cfg = resolve_config(config.as_deref(), &overrides)?;
            let report = run_batch(&input, &output, cfg)?;
            for lex in &report.lexicons {
                let s = &lex.summary;
                println!(
                    "{:<10} docs={} pos={} neg={} neutral={} mean={:.3}",
                    s.lexicon, s.documents, s.positive, s.negative, s.neutral, s.mean_polarity
                );
            }
            println!("dropped={}", report.dropped);
            Ok(())
        }
        Commands::Lexicons => {
            let store = LexiconStore::bundled()?;
            for lex in store.iter() {
                println!("{:<10} {:<12} {} terms", lex.name(), lex.shape().to_string(), lex.len());
            }
            Ok(())
        }
        Commands::Normalize { text, exclude } => {
            let normalizer = Normalizer::new(&NormalizerOptions { exclude_terms: exclude, ..Default::default() });
            println!("{}", normalizer.normalize(&text));
            Ok(())
        }
    }
}
