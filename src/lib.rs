/// This crate is an in-memory Document Search Engine using TF-IDF weighting and
/// cosine similarity ranking.
pub mod config;
pub mod engine;
pub mod error;
pub mod service;
pub mod vectorizer;

/// Search Engine
/// The top-level struct of this crate. It owns a built `VectorSpaceIndex`
/// together with the `TermExtractor` the documents went through, and ranks
/// free-text queries against the corpus.
///
/// `SearchEngine<S, E>` has the following generic parameters:
/// - `S`: Stemmer type (e.g., WordSplitter, or any `Fn(&str) -> Vec<String>`)
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTFIDFEngine)
///
/// # Thread Safety
/// Immutable once built. Share it as `Arc<SearchEngine>`; any number of
/// searches may run concurrently.
pub use engine::SearchEngine;

/// Error type and `Result` alias used by every fallible operation
pub use error::{Result, SearchError};

/// Vector Space Index
/// The precomputed TF-IDF matrix (one ordered row per document) and the
/// corpus-wide IDF table.
///
/// # Serialization
/// Supported. The matrix serializes as
/// `{ "doc1": { "term": score, ... }, ... }` in document insertion order.
pub use vectorizer::VectorSpaceIndex;

/// Corpus statistics: document count and number of distinct terms
pub use vectorizer::SearchStatistics;

/// Corpus document frequencies
/// Counts the documents and, per term, the documents containing it.
/// It is used as the base data for IDF (Inverse Document Frequency) calculation.
pub use vectorizer::corpus::Corpus;

/// Term Frequency structure
/// Occurrence counts of the terms of one document (or query) and their total.
/// Used as base data for TF (Term Frequency) calculation.
pub use vectorizer::token::TermFrequency;

/// TF IDF Calculation Engine Trait
/// By implementing this trait, you can plug different TF-IDF calculation strategies
/// into `VectorSpaceIndex<E>` and `SearchEngine<S, E>`.
/// `DefaultTFIDFEngine` computes `tf = count / total` and
/// `idf = ln(N / (1 + df)) + 1`.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Term extraction collaborators
/// - `Stemmer`: text to root forms; closures are stemmers too
/// - `WordSplitter`: default stemmer, splits on non alphanumeric characters
/// - `StopWords`: excluded terms
/// - `TermExtractor`: stemmer + stop words + validity rule
pub use vectorizer::extract::{Stemmer, StopWords, TermExtractor, WordSplitter};

/// Query projected into the TF-IDF space of an index
pub use vectorizer::evaluate::query::QueryVector;

/// Search Hits and Hit Entry structures
/// Data structures for managing search results.
/// - `Hits`: holds a list of search results, sorted by descending score
/// - `HitEntry`: one result, containing the document id, the cosine score and
///   the matching terms
pub use vectorizer::evaluate::scoring::{HitEntry, Hits};

/// Request / response layer that never fails
pub use service::{DocumentResult, SearchRequest, SearchResponse, SearchService};

/// File based configuration
pub use config::SearchConfig;
