use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use lexscan::config::{Config, CorpusConfig};
use lexscan::index::stats::{show_analysis, show_index_summary, show_load_stats, CorpusAnalysis, SAMPLE_PREFIXES};
use lexscan::index::{build_index, load_corpus, Document, LoadStats};
use lexscan::output::{self, OutputFormat};
use lexscan::search::benchmark::compare_on_corpus;
use lexscan::search::{compare_algorithms, search_corpus, Algorithm};
use lexscan::utils::normalize;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexscan", version)]
#[command(about = "In-memory lexical indexing and exact pattern search over document corpora")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write csv/json output to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
}

/// Corpus selection flags shared by every subcommand
#[derive(Args)]
struct CorpusArgs {
    /// Corpus directory
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Only read the top-level directory
    #[arg(long)]
    no_recursive: bool,

    /// Only .txt files
    #[arg(long, conflicts_with = "html_only")]
    txt_only: bool,

    /// Only .html/.htm files
    #[arg(long)]
    html_only: bool,

    /// Skip files smaller than this many bytes
    #[arg(long)]
    min_size: Option<u64>,

    /// Skip files larger than this many bytes
    #[arg(long)]
    max_size: Option<u64>,

    /// Load at most this many documents
    #[arg(long)]
    limit: Option<usize>,
}

impl CorpusArgs {
    fn apply(&self, config: &mut CorpusConfig) {
        if self.no_recursive {
            config.recursive = false;
        }
        if self.txt_only {
            config.include_globs = vec!["*.txt".into()];
        }
        if self.html_only {
            config.include_globs = vec!["*.html".into(), "*.htm".into()];
        }
        if let Some(min) = self.min_size {
            config.min_file_size = min;
        }
        if let Some(max) = self.max_size {
            config.max_file_size = max;
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load a corpus and build the vocabulary trie, word table and inverted index
    Index {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// List vocabulary words starting with this prefix (repeatable)
        #[arg(long)]
        prefix: Vec<String>,

        /// Show the posting list of this term (repeatable)
        #[arg(long)]
        term: Vec<String>,
    },
    /// Find every occurrence of a pattern in the corpus text
    Search {
        /// Exact pattern to look for
        pattern: String,

        #[command(flatten)]
        corpus: CorpusArgs,

        /// Matching algorithm (defaults to the configured one)
        #[arg(short, long, value_enum)]
        algorithm: Option<Algorithm>,

        /// Bytes of context around each match
        #[arg(long)]
        context: Option<usize>,

        /// Matches shown per document
        #[arg(long)]
        max_shown: Option<usize>,
    },
    /// Compare KMP, Shift-And and Shift-Or on the same input
    Bench {
        /// Pattern to benchmark
        pattern: String,

        #[command(flatten)]
        corpus: CorpusArgs,

        /// Benchmark on this literal text instead of a corpus
        #[arg(long)]
        text: Option<String>,
    },
    /// Corpus statistics, vocabulary and frequent words
    Analyze {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Number of most frequent words to report
        #[arg(long, default_value_t = 20)]
        top: usize,

        /// Additional prefixes to count words for (repeatable)
        #[arg(long)]
        prefix: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.output.is_some() && cli.format == OutputFormat::Text {
        bail!("--output needs --format csv or --format json");
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let color = !cli.no_color && cli.output.is_none() && io::stdout().is_terminal();
    // Progress bars only when someone is watching and stdout carries text
    let silent = cli.format != OutputFormat::Text || !io::stderr().is_terminal();

    match cli.command {
        Commands::Index { corpus, prefix, term } => {
            corpus.apply(&mut config.corpus);
            let (documents, load_stats) = load(&corpus.path, &config)?;
            let index = build_index(&documents, &config.index, silent).context("Failed to build index")?;

            match cli.format {
                OutputFormat::Text => {
                    show_load_stats(&load_stats);
                    println!();
                    show_index_summary(&index);
                    for p in &prefix {
                        let p = normalize(p, &config.index.normalization);
                        println!();
                        output::print_prefix_result(&p, &index.trie.get_words_with_prefix(&p), 50, color)?;
                    }
                    for t in &term {
                        let t = normalize(t, &config.index.normalization);
                        println!();
                        output::print_posting_list(&t, index.inverted.get_posting_list(&t), &documents, color)?;
                    }
                }
                OutputFormat::Csv => export(&cli.output, |w| output::write_index_csv(w, &load_stats, &index))?,
                OutputFormat::Json => export(&cli.output, |w| output::write_index_json(w, &load_stats, &index))?,
            }
        }

        Commands::Search {
            pattern,
            corpus,
            algorithm,
            context,
            max_shown,
        } => {
            corpus.apply(&mut config.corpus);
            if let Some(context) = context {
                config.search.context_radius = context;
            }
            if let Some(max_shown) = max_shown {
                config.search.max_shown_matches = max_shown;
            }
            let algorithm = algorithm.unwrap_or(config.search.algorithm);

            let (documents, _) = load(&corpus.path, &config)?;
            let search = search_corpus(&documents, &pattern, algorithm)
                .with_context(|| format!("Search for '{}' failed", pattern))?;

            let radius = config.search.context_radius;
            match cli.format {
                OutputFormat::Text => {
                    output::print_search_results(&documents, &search, &config.search, color)?
                }
                OutputFormat::Csv => {
                    export(&cli.output, |w| output::write_search_csv(w, &documents, &search, radius))?
                }
                OutputFormat::Json => {
                    export(&cli.output, |w| output::write_search_json(w, &documents, &search, radius))?
                }
            }
        }

        Commands::Bench { pattern, corpus, text } => {
            let report = match text {
                Some(text) => compare_algorithms(text.as_bytes(), pattern.as_bytes(), Some("literal text")),
                None => {
                    corpus.apply(&mut config.corpus);
                    let (documents, _) = load(&corpus.path, &config)?;
                    let description = format!("{} documents in {}", documents.len(), corpus.path.display());
                    compare_on_corpus(&documents, pattern.as_bytes(), Some(&description))
                }
            };

            match cli.format {
                OutputFormat::Text => output::print_comparison_report(&report, color)?,
                OutputFormat::Csv => export(&cli.output, |w| output::write_report_csv(w, &report))?,
                OutputFormat::Json => export(&cli.output, |w| output::write_report_json(w, &report))?,
            }
        }

        Commands::Analyze { corpus, top, prefix } => {
            let start = Instant::now();
            corpus.apply(&mut config.corpus);
            let (documents, _) = load(&corpus.path, &config)?;
            let index = build_index(&documents, &config.index, silent).context("Failed to build index")?;

            let extra: Vec<String> = prefix
                .iter()
                .map(|p| normalize(p, &config.index.normalization))
                .collect();
            let prefixes: Vec<&str> = SAMPLE_PREFIXES
                .iter()
                .copied()
                .chain(extra.iter().map(String::as_str))
                .collect();
            let analysis = CorpusAnalysis::compute(&documents, &index, &prefixes, top);

            match cli.format {
                OutputFormat::Text => show_analysis(&analysis, start.elapsed().as_secs_f64()),
                OutputFormat::Csv => export(&cli.output, |w| output::write_analysis_csv(w, &analysis))?,
                OutputFormat::Json => export(&cli.output, |w| output::write_analysis_json(w, &analysis))?,
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load(path: &Path, config: &Config) -> Result<(Vec<Document>, LoadStats)> {
    config.validate().context("Invalid configuration")?;
    let (documents, stats) = load_corpus(path, &config.corpus)
        .with_context(|| format!("Failed to load corpus from {}", path.display()))?;
    if documents.is_empty() {
        tracing::warn!(path = %path.display(), "no documents matched the corpus filters");
    }
    Ok((documents, stats))
}

/// Run an exporter against the `--output` file or stdout
fn export<F>(output: &Option<PathBuf>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write(&mut writer).with_context(|| format!("Failed to write {}", path.display()))?;
            writer.flush()?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write(&mut lock).context("Failed to write output")?;
            writeln!(lock)?;
        }
    }
    Ok(())
}
