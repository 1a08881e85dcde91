//! Output formatting for search results, algorithm reports and analyses.
//!
//! Text output goes to the terminal with colours; CSV and JSON exports are
//! written to any `Write` so the CLI can target a file or stdout.

use crate::config::SearchConfig;
use crate::index::stats::CorpusAnalysis;
use crate::index::types::{DocId, Document};
use crate::index::{BuildStats, CorpusIndex, LoadStats, PostingList, PrefixResult};
use crate::search::benchmark::{AlgorithmStats, ComparisonReport};
use crate::search::Algorithm;
use crate::search::executor::{context_bounds, context_snippet, flatten_whitespace, CorpusSearch};
use serde::Serialize;
use std::borrow::Cow;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Export format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

fn stdout(color: bool) -> StandardStream {
    StandardStream::stdout(if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    })
}

fn find_doc(documents: &[Document], doc_id: DocId) -> Option<&Document> {
    // Loaded documents are stored in doc id order
    documents
        .get(doc_id as usize)
        .filter(|d| d.doc_id == doc_id)
        .or_else(|| documents.iter().find(|d| d.doc_id == doc_id))
}

/// Print matches grouped by document, each with highlighted context
pub fn print_search_results(
    documents: &[Document],
    search: &CorpusSearch,
    display: &SearchConfig,
    color: bool,
) -> io::Result<()> {
    let mut stdout = stdout(color);
    let match_len = search.pattern.len();

    for (i, doc_matches) in search.documents.iter().enumerate() {
        let Some(doc) = find_doc(documents, doc_matches.doc_id) else {
            continue;
        };

        if i > 0 {
            writeln!(stdout)?;
        }

        // Document header
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        write!(stdout, "{}", doc.path.display())?;
        stdout.reset()?;
        writeln!(stdout, " ({} matches)", doc_matches.results.len())?;

        for m in doc_matches.results.iter().take(display.max_shown_matches) {
            print_match_line(&mut stdout, &doc.text, m.position, match_len, display.context_radius)?;
        }

        let hidden = doc_matches.results.len().saturating_sub(display.max_shown_matches);
        if hidden > 0 {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            writeln!(stdout, "  ... and {} more", hidden)?;
            stdout.reset()?;
        }
    }

    writeln!(stdout)?;
    writeln!(
        stdout,
        "{}: {} matches in {}/{} documents, {} comparisons, {:.2}ms",
        search.algorithm,
        search.total_matches,
        search.documents_with_matches(),
        search.documents_searched,
        search.total_comparisons,
        search.elapsed.as_secs_f64() * 1000.0
    )?;

    Ok(())
}

/// Print one match with its position and highlighted context
fn print_match_line(
    stdout: &mut StandardStream,
    text: &str,
    position: usize,
    match_len: usize,
    radius: usize,
) -> io::Result<()> {
    let (start, end) = context_bounds(text, position, match_len, radius);
    let match_end = (position + match_len).min(end);

    // Position
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(stdout, "  {:>8}", position)?;
    stdout.reset()?;
    write!(stdout, ": ")?;

    if start > 0 {
        write!(stdout, "...")?;
    }
    write!(stdout, "{}", flatten_whitespace(text.get(start..position).unwrap_or("")))?;

    // The match itself (highlighted)
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(stdout, "{}", flatten_whitespace(text.get(position..match_end).unwrap_or("")))?;
    stdout.reset()?;

    write!(stdout, "{}", flatten_whitespace(text.get(match_end..end).unwrap_or("")))?;
    if end < text.len() {
        write!(stdout, "...")?;
    }
    writeln!(stdout)?;

    Ok(())
}

/// Print the comparison table and the winners
pub fn print_comparison_report(report: &ComparisonReport, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    stdout.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(stdout, "Algorithm Comparison")?;
    stdout.reset()?;
    writeln!(stdout, "{}", "=".repeat(80))?;
    if let Some(description) = &report.description {
        writeln!(stdout, "Description:    {}", description)?;
    }
    writeln!(stdout, "Text length:    {} bytes", report.text_length)?;
    writeln!(stdout, "Pattern length: {} bytes", report.pattern_length)?;
    writeln!(stdout)?;

    writeln!(
        stdout,
        "{:<12} {:>12} {:>10} {:>14} {:>12} {:>14}",
        "Algorithm", "Time (s)", "Matches", "Comparisons", "Memory (B)", "Thrpt (MB/s)"
    )?;
    writeln!(stdout, "{}", "-".repeat(80))?;

    for run in &report.runs {
        match &run.outcome {
            Ok(stats) => writeln!(
                stdout,
                "{:<12} {:>12.6} {:>10} {:>14} {:>12} {:>14.2}",
                run.algorithm.name(),
                stats.execution_time.as_secs_f64(),
                stats.matches_found,
                stats.total_comparisons,
                stats.memory_used,
                stats.throughput_mbps
            )?,
            Err(err) => {
                write!(stdout, "{:<12} ", run.algorithm.name())?;
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                writeln!(stdout, "skipped: {}", err)?;
                stdout.reset()?;
            }
        }
    }

    writeln!(stdout)?;
    if let Some(fastest) = report.fastest() {
        write!(stdout, "Fastest:             ")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(stdout, "{}", fastest.algorithm)?;
        stdout.reset()?;
        writeln!(stdout, " ({:.6}s)", fastest.execution_time.as_secs_f64())?;
    }
    if let Some(fewest) = report.fewest_comparisons() {
        write!(stdout, "Fewest comparisons:  ")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(stdout, "{}", fewest.algorithm)?;
        stdout.reset()?;
        writeln!(stdout, " ({} comparisons)", fewest.total_comparisons)?;
    }
    if !report.results_agree() {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(stdout, "Warning: algorithms disagree on the number of matches")?;
        stdout.reset()?;
    }

    Ok(())
}

/// Print the words found under a prefix, most frequent first
pub fn print_prefix_result(prefix: &str, result: &PrefixResult, limit: usize, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    writeln!(stdout, "Words with prefix '{}': {}", prefix, result.len())?;
    let mut entries: Vec<_> = result.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    for (word, frequency) in entries.iter().take(limit) {
        write!(stdout, "  ")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(stdout, "{:24}", word)?;
        stdout.reset()?;
        writeln!(stdout, " {}", frequency)?;
    }
    if entries.len() > limit {
        writeln!(stdout, "  ... and {} more", entries.len() - limit)?;
    }

    Ok(())
}

/// Print the documents a term occurs in
pub fn print_posting_list(
    term: &str,
    postings: Option<&PostingList>,
    documents: &[Document],
    color: bool,
) -> io::Result<()> {
    let mut stdout = stdout(color);

    let Some(postings) = postings else {
        writeln!(stdout, "Term '{}' is not in the index", term)?;
        return Ok(());
    };

    writeln!(
        stdout,
        "Term '{}': {} documents, {} occurrences",
        term,
        postings.len(),
        postings.total_frequency()
    )?;
    for posting in postings {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        match find_doc(documents, posting.doc_id) {
            Some(doc) => write!(stdout, "  {}", doc.path.display())?,
            None => write!(stdout, "  #{}", posting.doc_id)?,
        }
        stdout.reset()?;
        write!(stdout, ":")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(stdout, "{}", posting.frequency_in_doc)?;
        stdout.reset()?;
    }

    Ok(())
}

#[derive(Serialize)]
struct MatchRow<'a> {
    doc_id: DocId,
    path: Cow<'a, str>,
    position: usize,
    comparisons: u64,
    context: String,
}

fn match_rows<'a>(
    documents: &'a [Document],
    search: &'a CorpusSearch,
    context_radius: usize,
) -> impl Iterator<Item = MatchRow<'a>> + 'a {
    search.documents.iter().flat_map(move |dm| {
        let doc = find_doc(documents, dm.doc_id);
        dm.results.iter().map(move |m| MatchRow {
            doc_id: dm.doc_id,
            path: doc.map_or(Cow::Borrowed(""), |d| d.path.to_string_lossy()),
            position: m.position,
            comparisons: m.comparisons,
            context: doc.map_or_else(String::new, |d| {
                context_snippet(&d.text, m.position, search.pattern.len(), context_radius)
            }),
        })
    })
}

/// Every match as `doc_id,path,position,comparisons,context`
pub fn write_search_csv<W: Write>(
    out: W,
    documents: &[Document],
    search: &CorpusSearch,
    context_radius: usize,
) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for row in match_rows(documents, search, context_radius) {
        wtr.serialize(row)?;
    }
    wtr.flush()
}

#[derive(Serialize)]
struct SearchExport<'a> {
    pattern: &'a str,
    algorithm: Algorithm,
    documents_searched: usize,
    documents_with_matches: usize,
    total_matches: usize,
    total_comparisons: u64,
    elapsed_secs: f64,
    matches: Vec<MatchRow<'a>>,
}

/// Search summary and every match as a JSON document
pub fn write_search_json<W: Write>(
    out: W,
    documents: &[Document],
    search: &CorpusSearch,
    context_radius: usize,
) -> io::Result<()> {
    let export = SearchExport {
        pattern: &search.pattern,
        algorithm: search.algorithm,
        documents_searched: search.documents_searched,
        documents_with_matches: search.documents_with_matches(),
        total_matches: search.total_matches,
        total_comparisons: search.total_comparisons,
        elapsed_secs: search.elapsed.as_secs_f64(),
        matches: match_rows(documents, search, context_radius).collect(),
    };
    serde_json::to_writer_pretty(out, &export).map_err(io::Error::from)
}

#[derive(Serialize)]
#[serde(untagged)]
enum ReportRow<'a> {
    Measured {
        #[serde(flatten)]
        stats: &'a AlgorithmStats,
        comparisons_per_byte: f64,
    },
    Skipped { algorithm: Algorithm, error: String },
}

fn report_rows(report: &ComparisonReport) -> Vec<ReportRow<'_>> {
    report
        .runs
        .iter()
        .map(|run| match &run.outcome {
            Ok(stats) => ReportRow::Measured {
                stats,
                comparisons_per_byte: stats.comparisons_per_byte(),
            },
            Err(err) => ReportRow::Skipped {
                algorithm: run.algorithm,
                error: err.to_string(),
            },
        })
        .collect()
}

/// Flat CSV record; skipped algorithms leave the measurements empty
#[derive(Serialize)]
struct ReportCsvRow {
    algorithm: &'static str,
    execution_time_secs: Option<f64>,
    total_comparisons: Option<u64>,
    matches_found: Option<usize>,
    memory_used: Option<usize>,
    throughput_mbps: Option<f64>,
    comparisons_per_byte: Option<f64>,
    error: Option<String>,
}

impl ReportCsvRow {
    fn skipped(algorithm: Algorithm, error: String) -> Self {
        Self {
            algorithm: algorithm.name(),
            execution_time_secs: None,
            total_comparisons: None,
            matches_found: None,
            memory_used: None,
            throughput_mbps: None,
            comparisons_per_byte: None,
            error: Some(error),
        }
    }
}

impl From<&AlgorithmStats> for ReportCsvRow {
    fn from(s: &AlgorithmStats) -> Self {
        Self {
            algorithm: s.algorithm.name(),
            execution_time_secs: Some(s.execution_time.as_secs_f64()),
            total_comparisons: Some(s.total_comparisons),
            matches_found: Some(s.matches_found),
            memory_used: Some(s.memory_used),
            throughput_mbps: Some(s.throughput_mbps),
            comparisons_per_byte: Some(s.comparisons_per_byte()),
            error: None,
        }
    }
}

/// One record per algorithm
pub fn write_report_csv<W: Write>(out: W, report: &ComparisonReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for run in &report.runs {
        let row = match &run.outcome {
            Ok(stats) => ReportCsvRow::from(stats),
            Err(err) => ReportCsvRow::skipped(run.algorithm, err.to_string()),
        };
        wtr.serialize(row)?;
    }
    wtr.flush()
}

#[derive(Serialize)]
struct ReportExport<'a> {
    description: Option<&'a str>,
    text_length: u64,
    pattern_length: usize,
    fastest: Option<Algorithm>,
    fewest_comparisons: Option<Algorithm>,
    algorithms: Vec<ReportRow<'a>>,
}

pub fn write_report_json<W: Write>(out: W, report: &ComparisonReport) -> io::Result<()> {
    let export = ReportExport {
        description: report.description.as_deref(),
        text_length: report.text_length,
        pattern_length: report.pattern_length,
        fastest: report.fastest().map(|s| s.algorithm),
        fewest_comparisons: report.fewest_comparisons().map(|s| s.algorithm),
        algorithms: report_rows(report),
    };
    serde_json::to_writer_pretty(out, &export).map_err(io::Error::from)
}

fn write_metrics<W: Write>(out: W, metrics: &[(&str, String)]) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["metric", "value"])?;
    for (metric, value) in metrics {
        wtr.write_record([*metric, value.as_str()])?;
    }
    wtr.flush()
}

/// Headline metrics as `metric,value`
pub fn write_analysis_csv<W: Write>(out: W, analysis: &CorpusAnalysis) -> io::Result<()> {
    write_metrics(
        out,
        &[
            ("documents_processed", analysis.documents_processed.to_string()),
            ("total_characters", analysis.total_characters.to_string()),
            ("total_words", analysis.total_words.to_string()),
            ("unique_words", analysis.unique_words.to_string()),
            ("estimated_sentences", analysis.estimated_sentences.to_string()),
            ("avg_words_per_doc", format!("{:.1}", analysis.avg_words_per_doc)),
            ("lexical_diversity", format!("{:.3}", analysis.lexical_diversity)),
            ("trie_nodes", analysis.trie_nodes.to_string()),
            ("trie_depth", analysis.trie_depth.to_string()),
            ("word_table_load_factor", format!("{:.2}", analysis.word_table_load_factor)),
        ],
    )
}

pub fn write_analysis_json<W: Write>(out: W, analysis: &CorpusAnalysis) -> io::Result<()> {
    serde_json::to_writer_pretty(out, analysis).map_err(io::Error::from)
}

#[derive(Serialize)]
struct IndexExport<'a> {
    loading: &'a LoadStats,
    build: &'a BuildStats,
    trie_words: usize,
    trie_nodes: usize,
    trie_depth: usize,
    word_table_keys: usize,
    word_table_load_factor: f64,
    inverted_terms: usize,
}

/// Loading and build counters as a JSON document
pub fn write_index_json<W: Write>(out: W, load: &LoadStats, index: &CorpusIndex) -> io::Result<()> {
    let trie = index.trie.stats();
    let export = IndexExport {
        loading: load,
        build: &index.stats,
        trie_words: trie.word_count,
        trie_nodes: trie.node_count,
        trie_depth: trie.depth,
        word_table_keys: index.word_counts.len(),
        word_table_load_factor: index.word_counts.load_factor(),
        inverted_terms: index.inverted.term_count(),
    };
    serde_json::to_writer_pretty(out, &export).map_err(io::Error::from)
}

/// Loading and build counters as `metric,value`
pub fn write_index_csv<W: Write>(out: W, load: &LoadStats, index: &CorpusIndex) -> io::Result<()> {
    let trie = index.trie.stats();
    write_metrics(
        out,
        &[
            ("files_found", load.total_files_found.to_string()),
            ("files_loaded", load.files_loaded.to_string()),
            ("files_failed", load.files_failed.to_string()),
            ("bytes_loaded", load.total_bytes_loaded.to_string()),
            ("documents_indexed", index.stats.documents_indexed.to_string()),
            ("documents_empty", index.stats.documents_empty.to_string()),
            ("documents_failed", index.stats.documents_failed.to_string()),
            ("trie_words", trie.word_count.to_string()),
            ("trie_nodes", trie.node_count.to_string()),
            ("inverted_terms", index.inverted.term_count().to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::DocumentKind;
    use crate::search::{compare_algorithms, search_corpus};
    use std::path::PathBuf;

    fn documents() -> Vec<Document> {
        vec![
            Document {
                doc_id: 0,
                path: PathBuf::from("a, b.txt"),
                kind: DocumentKind::Text,
                size: 20,
                text: "dice \"hola\" y hola".to_string(),
            },
            Document {
                doc_id: 1,
                path: PathBuf::from("c.txt"),
                kind: DocumentKind::Text,
                size: 5,
                text: "adios".to_string(),
            },
        ]
    }

    #[test]
    fn test_search_csv() {
        let docs = documents();
        let search = search_corpus(&docs, "hola", Algorithm::Kmp).unwrap();
        let mut buf = Vec::new();
        write_search_csv(&mut buf, &docs, &search, 2).unwrap();

        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "doc_id,path,position,comparisons,context");
        assert!(lines[1].starts_with("0,\"a, b.txt\",6,"));
    }

    #[test]
    fn test_search_csv_reads_back() {
        let docs = documents();
        let search = search_corpus(&docs, "hola", Algorithm::ShiftOr).unwrap();
        let mut buf = Vec::new();
        write_search_csv(&mut buf, &docs, &search, 20).unwrap();

        let mut reader = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "a, b.txt");
        assert_eq!(&records[0][2], "6");
        assert!(records[0][4].contains("\"hola\""));
        assert_eq!(&records[1][2], "14");
    }

    #[test]
    fn test_search_json() {
        let docs = documents();
        let search = search_corpus(&docs, "hola", Algorithm::ShiftAnd).unwrap();
        let mut buf = Vec::new();
        write_search_json(&mut buf, &docs, &search, 5).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["algorithm"], "shift-and");
        assert_eq!(value["total_matches"], 2);
        assert_eq!(value["matches"][1]["position"], 14);
    }

    #[test]
    fn test_report_exports() {
        let report = compare_algorithms(&[b'a'; 100], &[b'a'; 70], Some("long"));

        let mut buf = Vec::new();
        write_report_csv(&mut buf, &report).unwrap();
        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "algorithm");
        assert_eq!(&headers[6], "comparisons_per_byte");
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "KMP");
        assert_eq!(&records[0][3], "31");
        assert_eq!(&records[0][7], "");
        assert_eq!(&records[1][0], "Shift-And");
        assert_eq!(&records[1][3], "");
        assert!(records[1][7].contains("70 bytes long"));

        let mut buf = Vec::new();
        write_report_json(&mut buf, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["fastest"], "kmp");
        assert_eq!(value["algorithms"][0]["matches_found"], 31);
        assert!(value["algorithms"][0]["comparisons_per_byte"].as_f64().unwrap() >= 1.0);
        assert!(value["algorithms"][1]["error"].is_string());
    }
}
