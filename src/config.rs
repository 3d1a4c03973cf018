//! File based setup: stop word list, document files and search defaults.
//!
//! A configuration file is JSON:
//!
//! ```json
//! {
//!   "stop_words_path": "data/stop_words.txt",
//!   "document_paths": ["data/doc1.txt", "data/doc2.txt"],
//!   "threshold": 0.01,
//!   "max_results": 5
//! }
//! ```

use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{SearchEngine, DEFAULT_MAX_RESULTS, DEFAULT_THRESHOLD},
    error::{Result, SearchError},
    vectorizer::{
        evaluate::scoring::validate_params,
        extract::{StopWords, TermExtractor, WordSplitter},
    },
};

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// One stop word per line; no stop word at all when absent
    #[serde(default)]
    pub stop_words_path: Option<PathBuf>,
    /// Document `i` (0-based) is named `doc{i + 1}`
    pub document_paths: Vec<PathBuf>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl SearchConfig {
    pub fn new(stop_words_path: Option<PathBuf>, document_paths: Vec<PathBuf>) -> Self {
        Self {
            stop_words_path,
            document_paths,
            threshold: DEFAULT_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Read a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: SearchConfig = serde_json::from_reader(BufReader::new(file))?;
        validate_params(config.threshold, config.max_results).map_err(|e| {
            SearchError::config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Ok(config)
    }
}

/// Read a stop word file, one word per line
pub fn load_stop_words<P: AsRef<Path>>(path: P) -> Result<StopWords> {
    let content = fs::read_to_string(path.as_ref())?;
    let stop_words = StopWords::from_lines(&content);
    info!(
        "loaded {} stop words from {}",
        stop_words.len(),
        path.as_ref().display()
    );
    Ok(stop_words)
}

/// Read every document file, naming them `doc1..docN` in order
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<(String, String)>> {
    let documents = paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let text = fs::read_to_string(path.as_ref())?;
            Ok((format!("doc{}", i + 1), text))
        })
        .collect::<Result<Vec<_>>>()?;
    info!("loaded {} documents", documents.len());
    Ok(documents)
}

/// Load everything a configuration points at and build the engine
pub fn build_engine(config: &SearchConfig) -> Result<SearchEngine<WordSplitter>> {
    let stop_words = match &config.stop_words_path {
        Some(path) => load_stop_words(path)?,
        None => StopWords::new(),
    };
    let documents = load_documents(&config.document_paths)?;
    SearchEngine::build(documents, TermExtractor::new(WordSplitter, stop_words))
}
