//! Error types for the search engine.
//!
//! Every fallible operation of the crate returns [`Result`], whose error side is
//! the [`SearchError`] enum. Empty queries and empty corpora are *not* errors:
//! they produce empty result lists.

use std::io;

use thiserror::Error;

/// The main error type for search engine operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Similarity threshold is negative or not a finite number
    #[error("invalid threshold {0}: must be a finite value >= 0")]
    InvalidThreshold(f64),

    /// Result cap is below one
    #[error("invalid max_results {0}: must be >= 1")]
    InvalidMaxResults(i64),

    /// Request rejected before reaching the engine (e.g. blank query)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The stemmer / term extractor failed on some input text
    #[error("term extraction failed: {0}")]
    Extraction(String),

    /// Configuration could not be interpreted
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors while loading stop words or documents
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    /// Create an extraction error
    pub fn extraction<S: Into<String>>(msg: S) -> Self {
        SearchError::Extraction(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SearchError::Config(msg.into())
    }

    /// Create an invalid request error
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        SearchError::InvalidRequest(msg.into())
    }

    /// Whether the error comes from caller-supplied parameters rather than from
    /// the corpus or a collaborator.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidThreshold(_)
                | SearchError::InvalidMaxResults(_)
                | SearchError::InvalidRequest(_)
        )
    }
}

/// Result type alias for search engine operations.
pub type Result<T> = std::result::Result<T, SearchError>;
