use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Root-form extraction
///
/// Turns raw text into a sequence of normalized root forms. Morphological
/// analyzers plug in here; any `Fn(&str) -> Vec<String>` closure is a stemmer
/// that never fails.
pub trait Stemmer: Send + Sync {
    fn stem(&self, text: &str) -> Result<Vec<String>>;
}

impl<F> Stemmer for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    #[inline]
    fn stem(&self, text: &str) -> Result<Vec<String>> {
        Ok(self(text))
    }
}

/// Default stemmer: splits on every character that is neither a letter nor a
/// digit and lowercases the pieces. No root reduction is performed.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordSplitter;

impl Stemmer for WordSplitter {
    fn stem(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(|word| word.to_lowercase())
            .collect())
    }
}

/// Stop word set (membership test only)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Parse a stop word list with one word per line.
    /// Lines are trimmed and blank lines are skipped.
    pub fn from_lines(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S> FromIterator<S> for StopWords
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Term validity rule shared by document indexing and query projection.
///
/// A term is kept when it is not blank, not a stop word, not made only of
/// ASCII digits and longer than one character.
#[inline]
pub fn is_valid_term(term: &str, stop_words: &StopWords) -> bool {
    !term.trim().is_empty()
        && !stop_words.contains(term)
        && !term.chars().all(|c| c.is_ascii_digit())
        && term.chars().count() > 1
}

/// Stemmer + stop words + validity rule
#[derive(Debug, Clone, Default)]
pub struct TermExtractor<S = WordSplitter>
where
    S: Stemmer,
{
    stemmer: S,
    stop_words: StopWords,
}

impl<S> TermExtractor<S>
where
    S: Stemmer,
{
    pub fn new(stemmer: S, stop_words: StopWords) -> Self {
        Self { stemmer, stop_words }
    }

    /// Extract the valid terms of a text, in text order.
    /// A stemmer failure is returned unchanged.
    pub fn extract(&self, text: &str) -> Result<Vec<String>> {
        let mut terms = self.stemmer.stem(text)?;
        terms.retain(|term| is_valid_term(term, &self.stop_words));
        Ok(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    struct BrokenStemmer;

    impl Stemmer for BrokenStemmer {
        fn stem(&self, _text: &str) -> Result<Vec<String>> {
            Err(SearchError::extraction("analyzer unavailable"))
        }
    }

    #[test]
    fn validity_rule() {
        let stop = StopWords::from_iter(["في", "the"]);
        assert!(is_valid_term("كتاب", &stop));
        assert!(is_valid_term("r2", &stop));
        assert!(!is_valid_term("في", &stop));
        assert!(!is_valid_term("the", &stop));
        assert!(!is_valid_term("2024", &stop));
        assert!(!is_valid_term("x", &stop));
        assert!(!is_valid_term("   ", &stop));
        assert!(!is_valid_term("", &stop));
    }

    #[test]
    fn stop_words_from_lines_trims_and_skips_blank() {
        let stop = StopWords::from_lines("  من \n\nإلى\n   \nعلى\n");
        assert_eq!(stop.len(), 3);
        assert!(stop.contains("من"));
        assert!(stop.contains("إلى"));
        assert!(!stop.contains(""));
    }

    #[test]
    fn word_splitter_splits_on_non_alphanumerics() {
        let words = WordSplitter.stem("Rust, fast! 2024-ready; قرأ الطالب").unwrap();
        assert_eq!(words, vec!["rust", "fast", "2024", "ready", "قرأ", "الطالب"]);
    }

    #[test]
    fn extractor_filters_in_text_order() {
        let extractor = TermExtractor::new(WordSplitter, StopWords::from_iter(["and"]));
        let terms = extractor.extract("Search and rank 42 documents a b").unwrap();
        assert_eq!(terms, vec!["search", "rank", "documents"]);
    }

    #[test]
    fn closures_are_stemmers() {
        let extractor = TermExtractor::new(
            |text: &str| {
                text.split(' ')
                    .map(|w| w.trim_end_matches('s').to_string())
                    .collect::<Vec<String>>()
            },
            StopWords::new(),
        );
        assert_eq!(extractor.extract("books pens").unwrap(), vec!["book", "pen"]);
    }

    #[test]
    fn stemmer_failure_propagates() {
        let extractor = TermExtractor::new(BrokenStemmer, StopWords::new());
        let err = extractor.extract("anything").unwrap_err();
        assert!(matches!(err, SearchError::Extraction(_)));
    }
}
