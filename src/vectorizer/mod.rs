pub mod corpus;
pub mod evaluate;
pub mod extract;
pub mod tfidf;
pub mod token;

use std::{collections::HashSet, fmt, marker::PhantomData};

use indexmap::IndexMap;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    vectorizer::{
        corpus::Corpus,
        evaluate::{
            query::QueryVector,
            scoring::{rank, validate_params, Hits},
        },
        extract::{Stemmer, TermExtractor},
        tfidf::{DefaultTFIDFEngine, IdfTable, TFIDFEngine, TermWeights, TfIdfMatrix},
        token::TermFrequency,
    },
};

/// Number of entries printed per row by the debug preview
const PREVIEW_LEN: usize = 5;

/// Vector Space Index
///
/// The TF-IDF matrix and the IDF table of a corpus. Built once, read-only
/// afterwards, so one instance can be shared by any number of concurrent
/// searches (`&self` everywhere, no interior mutability).
///
/// `VectorSpaceIndex<E>` has one generic parameter:
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTFIDFEngine)
#[derive(Debug, Clone, Serialize)]
pub struct VectorSpaceIndex<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    /// document id -> TF-IDF row, in document insertion order
    pub matrix: TfIdfMatrix,
    /// corpus-wide IDF
    pub idf: IdfTable,
    #[serde(skip)]
    _marker: PhantomData<E>,
}

/// Aggregate corpus statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub total_documents: usize,
    pub total_unique_terms: usize,
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Documents: {}, Unique terms: {}",
            self.total_documents, self.total_unique_terms
        )
    }
}

impl<E> Default for VectorSpaceIndex<E>
where
    E: TFIDFEngine,
{
    fn default() -> Self {
        Self {
            matrix: TfIdfMatrix::new(),
            idf: IdfTable::new(),
            _marker: PhantomData,
        }
    }
}

/// Construction
impl<E> VectorSpaceIndex<E>
where
    E: TFIDFEngine,
{
    /// Build the index from raw document texts.
    ///
    /// Term extraction runs in parallel, one task per document; IDF is computed
    /// once every document has been counted. A repeated document id keeps its
    /// first position and its last text. Any extraction failure fails the
    /// whole build.
    ///
    /// # Arguments
    /// * `documents` - `(document id, text)` pairs, in insertion order
    /// * `extractor` - stemmer + stop words
    pub fn build<S, K, T, I>(documents: I, extractor: &TermExtractor<S>) -> Result<Self>
    where
        S: Stemmer,
        K: Into<String>,
        T: AsRef<str> + Send,
        I: IntoIterator<Item = (K, T)>,
    {
        let documents: IndexMap<String, T> = documents
            .into_iter()
            .map(|(key, text)| (key.into(), text))
            .collect();

        let counted: Vec<(String, TermFrequency)> = documents
            .into_par_iter()
            .map(|(key, text)| -> Result<(String, TermFrequency)> {
                let terms = extractor.extract(text.as_ref())?;
                let freq = TermFrequency::from_terms(&terms);
                debug!(
                    "document '{}': {} terms, {} unique",
                    key,
                    freq.term_sum(),
                    freq.term_num()
                );
                Ok((key, freq))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_frequencies(counted.into_iter().collect()))
    }

    /// Build the index from per-document occurrence counters
    pub fn from_frequencies(freqs: IndexMap<String, TermFrequency>) -> Self {
        let idf = E::idf_table(&Corpus::from_frequencies(freqs.values()));
        let tf_map: IndexMap<String, TermWeights> = freqs
            .iter()
            .map(|(key, freq)| (key.clone(), E::tf_vec(freq)))
            .collect();
        let matrix = E::tf_idf_matrix(&tf_map, &idf);

        let index = Self {
            matrix,
            idf,
            _marker: PhantomData,
        };
        index.log_preview();
        info!("vector space index built ({})", index.stats());
        index
    }

    fn log_preview(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        for (doc, row) in &self.matrix {
            let head: Vec<String> = row
                .iter()
                .take(PREVIEW_LEN)
                .map(|(term, w)| format!("{term}: {w:.8}"))
                .collect();
            let more = if row.len() > PREVIEW_LEN { ", ..." } else { "" };
            debug!("tf-idf '{}': [{}{}]", doc, head.join(", "), more);
        }
        let head: Vec<String> = self
            .idf
            .iter()
            .take(PREVIEW_LEN * 2)
            .map(|(term, idf)| format!("{term}: {idf:.8}"))
            .collect();
        debug!("idf: [{}]", head.join(", "));
    }
}

/// Lookup and statistics
impl<E> VectorSpaceIndex<E>
where
    E: TFIDFEngine,
{
    /// Document count N
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.matrix.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    #[inline]
    pub fn matrix(&self) -> &TfIdfMatrix {
        &self.matrix
    }

    #[inline]
    pub fn idf(&self) -> &IdfTable {
        &self.idf
    }

    /// TF-IDF row of a document
    pub fn row(&self, doc: &str) -> Option<&TermWeights> {
        self.matrix.get(doc)
    }

    /// Document count and number of distinct terms across every row
    pub fn stats(&self) -> SearchStatistics {
        let unique: HashSet<&str> = self
            .matrix
            .values()
            .flat_map(|row| row.keys().map(|term| term.as_str()))
            .collect();
        SearchStatistics {
            total_documents: self.matrix.len(),
            total_unique_terms: unique.len(),
        }
    }
}

/// Query evaluation
impl<E> VectorSpaceIndex<E>
where
    E: TFIDFEngine,
{
    /// Project already-extracted query terms into this index's space.
    /// `None` when there is no term or the index is empty.
    pub fn project<T>(&self, terms: &[T]) -> Option<QueryVector>
    where
        T: AsRef<str>,
    {
        QueryVector::project::<E, T>(terms, &self.idf)
    }

    /// Rank documents against already-extracted query terms.
    ///
    /// Parameters are validated first; an empty index or an empty query gives
    /// an empty `Hits`.
    pub fn search_terms<T>(&self, terms: &[T], threshold: f64, max_results: usize) -> Result<Hits>
    where
        T: AsRef<str>,
    {
        validate_params(threshold, max_results)?;
        if self.is_empty() {
            return Ok(Hits::default());
        }
        match self.project(terms) {
            Some(query) => rank(&query, &self.matrix, threshold, max_results),
            None => Ok(Hits::default()),
        }
    }
}
