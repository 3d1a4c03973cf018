//! Request / response layer in front of the engine.
//!
//! [`SearchService::search`] never fails: any error becomes a
//! [`SearchResponse`] with `success == false` and a readable message, so a
//! presentation layer can always render something.

use std::{sync::Arc, time::Instant};

use log::error;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{SearchEngine, DEFAULT_MAX_RESULTS, DEFAULT_THRESHOLD},
    error::{Result, SearchError},
    vectorizer::{
        evaluate::scoring::HitEntry, extract::Stemmer, tfidf::TFIDFEngine, SearchStatistics,
    },
};

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_max_results() -> i64 {
    DEFAULT_MAX_RESULTS as i64
}

/// A search request as received from a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// signed so that non-positive values reach validation
    #[serde(default = "default_max_results")]
    pub max_results: i64,
}

impl SearchRequest {
    /// Request with the default threshold and result cap
    pub fn new<Q: Into<String>>(query: Q) -> Self {
        Self {
            query: query.into(),
            threshold: DEFAULT_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS as i64,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = max_results;
        self
    }

    /// Check the request and return the result cap as `usize`
    pub fn validate(&self) -> Result<usize> {
        if self.query.trim().is_empty() {
            return Err(SearchError::invalid_request("query must not be blank"));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(SearchError::InvalidThreshold(self.threshold));
        }
        if self.max_results < 1 {
            return Err(SearchError::InvalidMaxResults(self.max_results));
        }
        usize::try_from(self.max_results).map_err(|_| SearchError::InvalidMaxResults(self.max_results))
    }
}

/// One ranked document in a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub document_name: String,
    pub similarity_score: f64,
    pub matching_terms: Vec<String>,
}

impl DocumentResult {
    /// Score with four decimals, e.g. `0.4216`
    pub fn formatted_score(&self) -> String {
        format!("{:.4}", self.similarity_score)
    }

    /// Score as a percentage with one decimal, e.g. `42.2%`
    pub fn score_percentage(&self) -> String {
        format!("{:.1}%", self.similarity_score * 100.0)
    }
}

impl From<HitEntry> for DocumentResult {
    fn from(hit: HitEntry) -> Self {
        Self {
            document_name: hit.document_name,
            similarity_score: hit.similarity_score,
            matching_terms: hit.matching_terms,
        }
    }
}

/// Response to a [`SearchRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<DocumentResult>,
    pub total_results: usize,
    /// seconds
    pub execution_time: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn success<Q: Into<String>>(query: Q, results: Vec<DocumentResult>, execution_time: f64) -> Self {
        Self {
            query: query.into(),
            total_results: results.len(),
            results,
            execution_time,
            success: true,
            message: None,
        }
    }

    /// Typed failure: the query is echoed back with no result
    pub fn error<Q: Into<String>, M: Into<String>>(query: Q, message: M) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
            total_results: 0,
            execution_time: 0.0,
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Shares one engine between every caller
#[derive(Debug)]
pub struct SearchService<S, E>
where
    S: Stemmer,
    E: TFIDFEngine,
{
    engine: Arc<SearchEngine<S, E>>,
}

impl<S, E> Clone for SearchService<S, E>
where
    S: Stemmer,
    E: TFIDFEngine,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S, E> SearchService<S, E>
where
    S: Stemmer,
    E: TFIDFEngine,
{
    pub fn new(engine: Arc<SearchEngine<S, E>>) -> Self {
        Self { engine }
    }

    /// Run a request; failures are folded into the response
    pub fn search(&self, request: &SearchRequest) -> SearchResponse {
        let start = Instant::now();
        match self.try_search(request) {
            Ok(results) => {
                SearchResponse::success(&request.query, results, start.elapsed().as_secs_f64())
            }
            Err(e) => {
                error!("search for \"{}\" failed: {}", request.query, e);
                SearchResponse::error(&request.query, format!("Search failed: {e}"))
            }
        }
    }

    fn try_search(&self, request: &SearchRequest) -> Result<Vec<DocumentResult>> {
        let max_results = request.validate()?;
        let hits = self
            .engine
            .search(&request.query, request.threshold, max_results)?;
        Ok(hits.into_iter().map(DocumentResult::from).collect())
    }

    pub fn statistics(&self) -> SearchStatistics {
        self.engine.statistics()
    }
}
