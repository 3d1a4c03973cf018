use serde::Serialize;

use crate::vectorizer::{
    tfidf::{IdfTable, TFIDFEngine, TermWeights},
    token::TermFrequency,
};

/// A query projected into the TF-IDF space of an index.
///
/// Built per search call and never stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryVector {
    pub weights: TermWeights,
}

impl QueryVector {
    /// Project already-extracted query terms.
    ///
    /// # Arguments
    /// * `terms` - valid query terms, in query order
    /// * `idf` - IDF table of the index
    ///
    /// # Returns
    /// * `None` - no valid term, or the table covers no document
    /// * `Some(QueryVector)` - TF of the query weighted by the global IDF;
    ///   terms unknown to the corpus get `E::fallback_idf`
    pub fn project<E, T>(terms: &[T], idf: &IdfTable) -> Option<Self>
    where
        E: TFIDFEngine,
        T: AsRef<str>,
    {
        let freq = TermFrequency::from_terms(terms);
        if freq.is_empty() || idf.doc_num == 0 {
            return None;
        }
        let weights = E::tf_vec(&freq)
            .into_iter()
            .map(|(term, tf)| {
                let idf = E::query_idf(idf, &term);
                (term, tf * idf)
            })
            .collect();
        Some(Self { weights })
    }

    /// Query terms in first-occurrence order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(|term| term.as_str())
    }

    #[inline]
    pub fn weight(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::tfidf::DefaultTFIDFEngine;

    fn idf_table() -> IdfTable {
        let mut idf = IdfTable::new();
        idf.doc_num = 3;
        idf.idf.insert("rust".to_string(), (3.0f64 / 2.0).ln() + 1.0);
        idf.idf.insert("search".to_string(), 1.0);
        idf
    }

    #[test]
    fn empty_terms_signal_empty_query() {
        let projected = QueryVector::project::<DefaultTFIDFEngine, &str>(&[], &idf_table());
        assert!(projected.is_none());
    }

    #[test]
    fn empty_table_projects_nothing() {
        let projected = QueryVector::project::<DefaultTFIDFEngine, _>(&["rust"], &IdfTable::new());
        assert!(projected.is_none());
    }

    #[test]
    fn known_terms_use_corpus_idf() {
        let idf = idf_table();
        let q = QueryVector::project::<DefaultTFIDFEngine, _>(&["rust", "search", "rust"], &idf)
            .unwrap();
        let rust = q.weight("rust").unwrap();
        let search = q.weight("search").unwrap();
        assert!((rust - (2.0 / 3.0) * idf.get("rust").unwrap()).abs() < 1e-12);
        assert!((search - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(q.terms().collect::<Vec<_>>(), vec!["rust", "search"]);
    }

    #[test]
    fn unknown_terms_use_fallback_idf() {
        let q = QueryVector::project::<DefaultTFIDFEngine, _>(&["unseen"], &idf_table()).unwrap();
        let expected = (3.0f64).ln() + 1.0;
        assert!((q.weight("unseen").unwrap() - expected).abs() < 1e-12);
    }
}
