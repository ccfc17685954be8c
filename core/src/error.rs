use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Unknown lexicon, malformed lexicon table or unusable pipeline settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A single input record that cannot become a document. Batches collect
    /// these instead of aborting.
    #[error("validation error: record {record}: {reason}")]
    Validation { record: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn validation(record: usize, reason: impl Into<String>) -> Self {
        Error::Validation { record, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
