use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::{corpus::Corpus, token::TermFrequency};

/// Sparse weight vector: term -> weight, in first-occurrence order.
/// Terms absent from the map have weight zero.
pub type TermWeights = IndexMap<String, f64>;

/// TF-IDF matrix: document id -> weight row, in document insertion order.
pub type TfIdfMatrix = IndexMap<String, TermWeights>;

/// IDF table computed once over the whole corpus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdfTable {
    /// IDF per term; the domain is the union of all document terms
    pub idf: HashMap<String, f64>,
    /// number of documents the table was computed over
    pub doc_num: u64,
}

impl IdfTable {
    pub fn new() -> Self {
        Self {
            idf: HashMap::new(),
            doc_num: 0,
        }
    }

    #[inline]
    pub fn get(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.idf.iter().map(|(term, &idf)| (term.as_str(), idf))
    }
}

/// TF-IDF calculation engine
///
/// Only `idf_calc` and `fallback_idf` carry weighting decisions; the other
/// methods have default implementations built on top of them.
pub trait TFIDFEngine {
    /// IDF of a term
    /// # Arguments
    /// * `doc_num` - total document count N
    /// * `doc_freq` - number of documents containing the term
    fn idf_calc(doc_num: u64, doc_freq: u64) -> f64;

    /// IDF given to query terms the corpus has never seen
    fn fallback_idf(doc_num: u64) -> f64;

    /// TF vector of one document: every count divided by the total count.
    /// A document without terms yields an empty vector.
    fn tf_vec(freq: &TermFrequency) -> TermWeights {
        let total = freq.term_sum() as f64;
        if freq.term_sum() == 0 {
            return TermWeights::new();
        }
        freq.iter()
            .map(|(term, count)| (term.to_string(), count as f64 / total))
            .collect()
    }

    /// IDF table over every term of the corpus
    fn idf_table(corpus: &Corpus) -> IdfTable {
        let doc_num = corpus.get_doc_num();
        IdfTable {
            idf: corpus
                .iter()
                .map(|(term, doc_freq)| (term.to_string(), Self::idf_calc(doc_num, doc_freq)))
                .collect(),
            doc_num,
        }
    }

    /// IDF table built straight from per-document occurrence counters
    fn idf_from_frequencies(freqs: &IndexMap<String, TermFrequency>) -> IdfTable {
        Self::idf_table(&Corpus::from_frequencies(freqs.values()))
    }

    /// Weight one TF vector by the global IDF; a term missing from the table
    /// gets weight 0.0
    fn tf_idf_vec(tf: &TermWeights, idf: &IdfTable) -> TermWeights {
        tf.iter()
            .map(|(term, &tf)| (term.clone(), tf * idf.get(term).unwrap_or(0.0)))
            .collect()
    }

    /// TF-IDF matrix over every document TF vector
    fn tf_idf_matrix(tf_map: &IndexMap<String, TermWeights>, idf: &IdfTable) -> TfIdfMatrix {
        tf_map
            .iter()
            .map(|(doc, tf)| (doc.clone(), Self::tf_idf_vec(tf, idf)))
            .collect()
    }

    /// IDF weight applied to one query term. Terms unknown to the corpus (or
    /// carrying a zero IDF) use `fallback_idf`.
    fn query_idf(idf: &IdfTable, term: &str) -> f64 {
        match idf.get(term) {
            Some(value) if value != 0.0 => value,
            _ => Self::fallback_idf(idf.doc_num),
        }
    }
}

/// Default TF-IDF engine
///
/// `tf = count / total`, `idf = ln(N / (1 + df)) + 1`.
/// Every IDF is positive, including for a term found in every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    pub fn new() -> Self {
        DefaultTFIDFEngine
    }
}

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
        (doc_num as f64 / (1.0 + doc_freq as f64)).ln() + 1.0
    }

    /// `ln(N) + 1`, i.e. the IDF of a term found in no document without the
    /// denominator smoothing
    #[inline]
    fn fallback_idf(doc_num: u64) -> f64 {
        (doc_num as f64).ln() + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn book_corpus() -> IndexMap<String, TermFrequency> {
        let mut docs = IndexMap::new();
        docs.insert(
            "doc1".to_string(),
            TermFrequency::from_terms(&[
                "كتاب", "قرأ", "كتاب", "درس", "كتاب", "علم", "مدرس", "طالب", "قلم", "ورق",
            ]),
        );
        docs.insert(
            "doc2".to_string(),
            TermFrequency::from_terms(&["بحر", "سمك", "ماء"]),
        );
        docs.insert(
            "doc3".to_string(),
            TermFrequency::from_terms(&["جبل", "ثلج", "طالب"]),
        );
        docs
    }

    #[test]
    fn tf_sums_to_one() {
        for (_, freq) in book_corpus() {
            let tf = DefaultTFIDFEngine::tf_vec(&freq);
            let sum: f64 = tf.values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum was {sum}");
            assert!(tf.values().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn tf_of_empty_document_is_empty() {
        let tf = DefaultTFIDFEngine::tf_vec(&TermFrequency::new());
        assert!(tf.is_empty());
    }

    #[test]
    fn book_scenario_values() {
        let docs = book_corpus();
        let tf = DefaultTFIDFEngine::tf_vec(&docs["doc1"]);
        assert!((tf["كتاب"] - 0.3).abs() < EPS);

        let idf = DefaultTFIDFEngine::idf_from_frequencies(&docs);
        assert_eq!(idf.doc_num, 3);
        let book_idf = idf.get("كتاب").unwrap();
        assert!((book_idf - ((3.0f64 / 2.0).ln() + 1.0)).abs() < EPS);
        assert!((book_idf - 1.405).abs() < 1e-3);

        let tf_map: IndexMap<String, TermWeights> = docs
            .iter()
            .map(|(k, f)| (k.clone(), DefaultTFIDFEngine::tf_vec(f)))
            .collect();
        let matrix = DefaultTFIDFEngine::tf_idf_matrix(&tf_map, &idf);
        assert!((matrix["doc1"]["كتاب"] - 0.4216).abs() < 1e-4);
        assert!(!matrix["doc2"].contains_key("كتاب"));
        assert_eq!(
            matrix.keys().collect::<Vec<_>>(),
            vec!["doc1", "doc2", "doc3"]
        );
    }

    #[test]
    fn idf_is_positive_and_non_increasing_in_df() {
        let n = 10;
        let mut prev = f64::INFINITY;
        for df in 1..=n {
            let idf = DefaultTFIDFEngine::idf_calc(n, df);
            assert!(idf > 0.0, "idf({df}) = {idf}");
            assert!(idf <= prev);
            prev = idf;
        }
    }

    #[test]
    fn idf_domain_is_the_union_of_document_terms() {
        let docs = book_corpus();
        let idf = DefaultTFIDFEngine::idf_from_frequencies(&docs);
        assert_eq!(idf.len(), 13);
        assert!(idf.get("طالب").unwrap() < idf.get("جبل").unwrap());
    }

    #[test]
    fn missing_idf_entry_weights_zero() {
        let mut tf = TermWeights::new();
        tf.insert("orphan".to_string(), 0.5);
        let weighted = DefaultTFIDFEngine::tf_idf_vec(&tf, &IdfTable::new());
        assert_eq!(weighted["orphan"], 0.0);
    }

    #[test]
    fn query_idf_falls_back_for_unknown_and_zero_terms() {
        let mut idf = IdfTable::new();
        idf.doc_num = 4;
        idf.idf.insert("known".to_string(), 1.25);
        idf.idf.insert("zero".to_string(), 0.0);
        let fallback = (4.0f64).ln() + 1.0;

        assert_eq!(DefaultTFIDFEngine::query_idf(&idf, "known"), 1.25);
        assert!((DefaultTFIDFEngine::query_idf(&idf, "unknown") - fallback).abs() < EPS);
        assert!((DefaultTFIDFEngine::query_idf(&idf, "zero") - fallback).abs() < EPS);
    }

    #[test]
    fn computation_is_reproducible() {
        let docs = book_corpus();
        let a = DefaultTFIDFEngine::idf_from_frequencies(&docs);
        let b = DefaultTFIDFEngine::idf_from_frequencies(&docs);
        for (term, value) in a.iter() {
            assert_eq!(value.to_bits(), b.get(term).unwrap().to_bits());
        }
    }
}
