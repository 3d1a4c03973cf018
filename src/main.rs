//! tfidf-search CLI binary.

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process,
    sync::Arc,
    time::Instant,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{info, LevelFilter};

use tf_idf_search::{
    config::build_engine, Result, SearchConfig, SearchEngine, SearchError, SearchRequest,
    SearchResponse, SearchService,
};

/// tfidf-search - rank text documents against a query with TF-IDF and cosine similarity
#[derive(Parser, Debug)]
#[command(name = "tfidf-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(subcommand)]
    command: Command,
}

/// Where the corpus comes from
#[derive(Args, Debug)]
struct CorpusArgs {
    /// JSON configuration file
    #[arg(short, long, conflicts_with_all = ["stop_words", "docs"])]
    config: Option<PathBuf>,

    /// Stop word file, one word per line
    #[arg(long)]
    stop_words: Option<PathBuf>,

    /// Document file; repeat for each document (named doc1, doc2, ...)
    #[arg(long = "doc")]
    docs: Vec<PathBuf>,
}

impl CorpusArgs {
    fn to_config(&self) -> Result<SearchConfig> {
        match &self.config {
            Some(path) => SearchConfig::load(path),
            None if self.docs.is_empty() => Err(SearchError::config(
                "no document given: use --config <file> or --doc <file>",
            )),
            None => Ok(SearchConfig::new(self.stop_words.clone(), self.docs.clone())),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the documents against a query
    Search(SearchArgs),
    /// Show corpus statistics
    Stats,
    /// Write the TF-IDF matrix as JSON
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Free-text query
    query: String,

    /// Minimum cosine similarity (defaults to the configuration value)
    #[arg(short, long, allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Maximum number of results (defaults to the configuration value)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    max_results: Option<i64>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output file; stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Human,
    Json,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(cli.log_level())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.corpus.to_config()?;

    let start = Instant::now();
    let engine = build_engine(&config)?;
    info!("engine ready in {:.3}s", start.elapsed().as_secs_f64());

    match cli.command {
        Command::Search(args) => search(engine, &config, args),
        Command::Stats => {
            println!("{}", engine.statistics());
            Ok(())
        }
        Command::Export(args) => export(&engine, args),
    }
}

fn search(engine: SearchEngine, config: &SearchConfig, args: SearchArgs) -> Result<()> {
    let service = SearchService::new(Arc::new(engine));
    let request = SearchRequest::new(args.query)
        .with_threshold(args.threshold.unwrap_or(config.threshold))
        .with_max_results(
            args.max_results
                .unwrap_or_else(|| i64::try_from(config.max_results).unwrap_or(i64::MAX)),
        );
    let response = service.search(&request);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Human => print_human(&response),
    }

    if response.success {
        Ok(())
    } else {
        Err(SearchError::invalid_request(
            response.message.unwrap_or_default(),
        ))
    }
}

fn print_human(response: &SearchResponse) {
    if !response.success {
        return;
    }
    println!("Query: {}", response.query);
    if response.results.is_empty() {
        println!("No matching document.");
    }
    for (rank, result) in response.results.iter().enumerate() {
        println!(
            "{:>3}. {}  score {} ({})  terms: {}",
            rank + 1,
            result.document_name,
            result.formatted_score(),
            result.score_percentage(),
            result.matching_terms.join(", ")
        );
    }
    println!(
        "{} result(s) in {:.3} ms",
        response.total_results,
        response.execution_time * 1000.0
    );
}

fn export(engine: &SearchEngine, args: ExportArgs) -> Result<()> {
    let json = serde_json::to_string_pretty(engine.index().matrix())?;
    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            info!("TF-IDF matrix written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_idf_search::engine::{DEFAULT_MAX_RESULTS, DEFAULT_THRESHOLD};

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search_with_repeated_docs() {
        let cli = Cli::try_parse_from([
            "tfidf-search",
            "--doc",
            "a.txt",
            "--doc",
            "b.txt",
            "search",
            "rust search",
            "-n",
            "2",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.corpus.docs.len(), 2);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "rust search");
                assert_eq!(args.max_results, Some(2));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_conflicts_with_doc_list() {
        let parsed =
            Cli::try_parse_from(["tfidf-search", "-c", "c.json", "--doc", "a.txt", "stats"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_corpus_is_a_config_error() {
        let cli = Cli::try_parse_from(["tfidf-search", "stats"]).unwrap();
        assert!(matches!(cli.corpus.to_config(), Err(SearchError::Config(_))));
    }

    #[test]
    fn verbosity_maps_to_log_level() {
        let cli = Cli::try_parse_from(["tfidf-search", "-vv", "stats"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        let cli = Cli::try_parse_from(["tfidf-search", "-q", "stats"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Error);
    }

    #[test]
    fn defaults_match_the_engine() {
        let config = SearchConfig::new(None, vec![PathBuf::from("a.txt")]);
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
    }
}
