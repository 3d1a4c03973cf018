//! Search engine facade.
//!
//! [`SearchEngine`] owns a built [`VectorSpaceIndex`] together with the
//! [`TermExtractor`] it was built with, so queries go through exactly the same
//! extraction and validity rule as the documents did. It is immutable once
//! built; wrap it in an `Arc` to hand it to request handlers.

use log::{debug, warn};

use crate::{
    error::Result,
    vectorizer::{
        evaluate::{
            query::QueryVector,
            scoring::{rank, validate_params, Hits},
        },
        extract::{Stemmer, TermExtractor, WordSplitter},
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        SearchStatistics, VectorSpaceIndex,
    },
};

/// Similarity threshold used by [`SearchEngine::search_default`]
pub const DEFAULT_THRESHOLD: f64 = 0.01;
/// Result cap used by [`SearchEngine::search_default`]
pub const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Debug)]
pub struct SearchEngine<S = WordSplitter, E = DefaultTFIDFEngine>
where
    S: Stemmer,
    E: TFIDFEngine,
{
    index: VectorSpaceIndex<E>,
    extractor: TermExtractor<S>,
}

impl<S, E> SearchEngine<S, E>
where
    S: Stemmer,
    E: TFIDFEngine,
{
    /// Extract, count and index every document.
    ///
    /// # Arguments
    /// * `documents` - `(document id, text)` pairs, in insertion order
    /// * `extractor` - used for the documents now and for every query later
    pub fn build<K, T, I>(documents: I, extractor: TermExtractor<S>) -> Result<Self>
    where
        K: Into<String>,
        T: AsRef<str> + Send,
        I: IntoIterator<Item = (K, T)>,
    {
        let index = VectorSpaceIndex::build(documents, &extractor)?;
        Ok(Self { index, extractor })
    }

    /// Rank the documents against a free-text query.
    ///
    /// # Arguments
    /// * `query` - raw query text
    /// * `threshold` - minimum cosine similarity, inclusive, `>= 0`
    /// * `max_results` - result cap, `>= 1`
    ///
    /// # Returns
    /// * `Ok(Hits)` - possibly empty: a query without valid terms or an empty
    ///   corpus are not errors
    /// * `Err(_)` - invalid parameters, or the stemmer failed on the query
    pub fn search(&self, query: &str, threshold: f64, max_results: usize) -> Result<Hits> {
        validate_params(threshold, max_results)?;
        debug!("search for \"{}\"", query);

        if self.index.is_empty() {
            debug!("empty corpus, no result");
            return Ok(Hits::default());
        }

        let Some(query_vec) = self.project_query(query)? else {
            warn!("no valid term found in query \"{}\"", query);
            return Ok(Hits::default());
        };

        let hits = rank(&query_vec, self.index.matrix(), threshold, max_results)?;
        debug!("{} document(s) found", hits.len());
        Ok(hits)
    }

    /// [`search`](Self::search) with threshold `0.01` and at most 5 results
    pub fn search_default(&self, query: &str) -> Result<Hits> {
        self.search(query, DEFAULT_THRESHOLD, DEFAULT_MAX_RESULTS)
    }

    /// Extract the terms of a query and project them.
    /// `Ok(None)` when no valid term remains.
    pub fn project_query(&self, query: &str) -> Result<Option<QueryVector>> {
        let terms = self.extractor.extract(query)?;
        debug!("query terms: {:?}", terms);
        Ok(self.index.project(&terms))
    }

    pub fn statistics(&self) -> SearchStatistics {
        self.index.stats()
    }

    pub fn index(&self) -> &VectorSpaceIndex<E> {
        &self.index
    }

    pub fn extractor(&self) -> &TermExtractor<S> {
        &self.extractor
    }
}
