use thiserror::Error;

/// Errors raised by normalization and nearest-neighbor search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A query reached the index slot before any index was installed.
    #[error("index has not been built")]
    IndexNotBuilt,

    #[error("ordinal {ordinal} is outside the index (size {len})")]
    UnknownOrdinal { ordinal: usize, len: usize },

    #[error("cannot {operation} over zero vectors")]
    EmptyInput { operation: &'static str },

    #[error("invalid index parameter: {0}")]
    InvalidParams(String),
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
