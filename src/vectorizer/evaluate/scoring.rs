use std::fmt::{self, Debug, Display};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SearchError},
    vectorizer::{
        evaluate::query::QueryVector,
        tfidf::{TermWeights, TfIdfMatrix},
    },
};

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitEntry {
    /// Document id
    pub document_name: String,
    /// Cosine similarity in [0, 1]
    pub similarity_score: f64,
    /// Query terms also present in the document, in query order
    pub matching_terms: Vec<String>,
}

impl Display for HitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Document: {} | Score: {:.4} | Terms: [{}]",
            self.document_name,
            self.similarity_score,
            self.matching_terms.join(", ")
        )
    }
}

/// Structure to store search results
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    /// Create a new Hits instance
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Sort results by descending score.
    /// The sort is stable: equal scores keep their current relative order.
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        self.list.retain(|hit| !hit.similarity_score.is_nan());
        self.list
            .sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        self
    }

    /// Keep only the first `max_results` entries
    pub fn truncate(&mut self, max_results: usize) -> &mut Self {
        self.list.truncate(max_results);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitEntry> {
        self.list.iter()
    }
}

impl IntoIterator for Hits {
    type Item = HitEntry;
    type IntoIter = std::vec::IntoIter<HitEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // one hit per line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(
                    f,
                    "    {:?}: {:.6} {:?}",
                    hit.document_name, hit.similarity_score, hit.matching_terms
                )?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. {}", rank + 1, hit)?;
        }
        Ok(())
    }
}

/// Reject ranking parameters before any computation.
///
/// `threshold` must be finite and `>= 0`, `max_results` at least 1.
pub fn validate_params(threshold: f64, max_results: usize) -> Result<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(SearchError::InvalidThreshold(threshold));
    }
    if max_results < 1 {
        return Err(SearchError::InvalidMaxResults(max_results as i64));
    }
    Ok(())
}

/// Terms present in both vectors, in the order of `query`
pub fn common_terms<'a>(query: &'a TermWeights, doc: &TermWeights) -> Vec<&'a str> {
    query
        .keys()
        .filter(|term| doc.contains_key(term.as_str()))
        .map(|term| term.as_str())
        .collect()
}

/// Euclidean norm over every entry of the vector
#[inline]
pub fn l2_norm(vec: &TermWeights) -> f64 {
    vec.values().map(|v| v * v).sum::<f64>().sqrt()
}

/// Cosine similarity
/// cosθ = A・B / (|A||B|)
///
/// Symmetric in its arguments and 0.0 when the vectors share no term or
/// either norm is zero.
pub fn cosine_similarity(a: &TermWeights, b: &TermWeights) -> f64 {
    let common = common_terms(a, b);
    cosine_over_common(a, b, &common)
}

/// Cosine similarity with the common term set already computed.
/// The dot product is summed in lexicographic term order so that the result
/// does not depend on which vector comes first. Rounding can push the ratio
/// of a vector with itself just above 1, so the result is capped at 1.
fn cosine_over_common(a: &TermWeights, b: &TermWeights, common: &[&str]) -> f64 {
    if common.is_empty() {
        return 0.0;
    }
    let mut ordered = common.to_vec();
    ordered.sort_unstable();
    let dot: f64 = ordered
        .iter()
        .map(|term| a.get(*term).copied().unwrap_or(0.0) * b.get(*term).copied().unwrap_or(0.0))
        .sum();

    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).min(1.0)
}

/// Score every document row against the query and keep the best ones.
///
/// # Arguments
/// * `query` - projected query
/// * `matrix` - TF-IDF matrix of the index
/// * `threshold` - minimum similarity, inclusive
/// * `max_results` - result cap
///
/// # Returns
/// * `Hits` - sorted by descending similarity; equal scores keep the document
///   insertion order
pub fn rank(
    query: &QueryVector,
    matrix: &TfIdfMatrix,
    threshold: f64,
    max_results: usize,
) -> Result<Hits> {
    validate_params(threshold, max_results)?;

    let list: Vec<HitEntry> = matrix
        .par_iter()
        .filter_map(|(doc_name, doc)| {
            let common = common_terms(&query.weights, doc);
            if common.is_empty() {
                return None;
            }
            let similarity = cosine_over_common(&query.weights, doc, &common);
            if similarity < threshold {
                return None;
            }
            Some(HitEntry {
                document_name: doc_name.clone(),
                similarity_score: similarity,
                matching_terms: common.into_iter().map(str::to_string).collect(),
            })
        })
        .collect();

    let mut hits = Hits::new(list);
    hits.sort_by_score_desc().truncate(max_results);
    Ok(hits)
}
