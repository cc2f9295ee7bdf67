use thiserror::Error;

/// Errors raised while loading the track catalog.
///
/// Every variant is fatal at startup: without a catalog there is nothing
/// to index or recommend.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("catalog {source_name} contains no usable tracks")]
    EmptyCatalog { source_name: String },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
