pub mod aggregate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod lexicon;
pub mod normalize;
pub mod persist;
pub mod pipeline;
pub mod score;
pub mod tokenizer;
mod model;

pub use error::{Error, Result};
pub use model::*;
