use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::vectorizer::token::TermFrequency;

/// Keeps the document count and, for every term, the number of documents that
/// contain it at least once (document frequency).
///
/// This is the base data for IDF calculation. It does not store document text
/// or ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents added
    pub doc_num: u64,
    /// document frequency per term
    pub term_counts: HashMap<Box<str>, u64>,
}

impl Corpus {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            term_counts: HashMap::new(),
        }
    }

    /// Build a corpus from per-document occurrence counters
    pub fn from_frequencies<'a, I>(freqs: I) -> Self
    where
        I: IntoIterator<Item = &'a TermFrequency>,
    {
        let mut corpus = Self::new();
        for freq in freqs {
            corpus.add_doc(freq);
        }
        corpus
    }

    /// Add one document's distinct terms to the corpus
    ///
    /// Every term of `terms` must be distinct; duplicates would inflate the
    /// document frequency.
    pub fn add_set<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for term in terms {
            match self.term_counts.get_mut(term.as_ref()) {
                Some(count) => *count += 1,
                None => {
                    self.term_counts.insert(term.as_ref().into(), 1);
                }
            }
        }
    }

    /// Add one document from its occurrence counter
    #[inline]
    pub fn add_doc(&mut self, freq: &TermFrequency) {
        self.add_set(&freq.term_set_ref_str());
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the document frequency of a term
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// Iterate `(term, document frequency)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_counts.iter().map(|(term, &count)| (term.as_ref(), count))
    }
}
