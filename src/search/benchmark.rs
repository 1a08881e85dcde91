//! Side-by-side measurements of the three matchers.

use super::{Algorithm, CompiledPattern, PatternMatcher};
use crate::error::{Error, Result};
use crate::index::types::Document;
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};

/// Measurements of one algorithm over one or more texts
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmStats {
    pub algorithm: Algorithm,
    #[serde(rename = "execution_time_secs", serialize_with = "serialize_secs")]
    pub execution_time: Duration,
    /// Comparisons over the full texts, not just up to the last match
    pub total_comparisons: u64,
    pub matches_found: usize,
    /// Pattern table plus the largest result buffer, in bytes
    pub memory_used: usize,
    pub bytes_scanned: u64,
    pub throughput_mbps: f64,
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl AlgorithmStats {
    fn empty(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            execution_time: Duration::ZERO,
            total_comparisons: 0,
            matches_found: 0,
            memory_used: 0,
            bytes_scanned: 0,
            throughput_mbps: 0.0,
        }
    }

    /// Time preprocessing plus one scan of `text`.
    pub fn measure(algorithm: Algorithm, text: &[u8], pattern: &[u8]) -> Result<Self> {
        let start = Instant::now();
        let compiled = algorithm.compile(pattern)?;
        let results = compiled.find_all(text)?;
        let elapsed = start.elapsed();

        let mut stats = Self::empty(algorithm);
        stats.record(elapsed, text.len(), &compiled, &results);
        Ok(stats)
    }

    fn record(
        &mut self,
        elapsed: Duration,
        text_len: usize,
        compiled: &CompiledPattern,
        results: &super::SearchResults,
    ) {
        self.execution_time += elapsed;
        self.total_comparisons += results.total_comparisons();
        self.matches_found += results.len();
        self.memory_used = self
            .memory_used
            .max(compiled.table_size() + results.memory_usage());
        self.bytes_scanned += text_len as u64;
        self.throughput_mbps = throughput_mbps(self.bytes_scanned, self.execution_time);
    }

    /// Comparisons per scanned byte
    pub fn comparisons_per_byte(&self) -> f64 {
        if self.bytes_scanned == 0 {
            0.0
        } else {
            self.total_comparisons as f64 / self.bytes_scanned as f64
        }
    }
}

fn throughput_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        bytes as f64 / (1024.0 * 1024.0) / secs
    } else {
        0.0
    }
}

/// Outcome of one algorithm in a comparison
#[derive(Debug, Clone)]
pub struct AlgorithmRun {
    pub algorithm: Algorithm,
    pub outcome: Result<AlgorithmStats>,
}

/// All three algorithms run over the same input.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub description: Option<String>,
    /// Bytes per scan, summed over documents for corpus runs
    pub text_length: u64,
    pub pattern_length: usize,
    pub runs: Vec<AlgorithmRun>,
}

impl ComparisonReport {
    fn successful(&self) -> impl Iterator<Item = &AlgorithmStats> {
        self.runs.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    /// Stats of `algorithm`, if it accepted the pattern
    pub fn stats(&self, algorithm: Algorithm) -> Option<&AlgorithmStats> {
        self.runs
            .iter()
            .find(|r| r.algorithm == algorithm)
            .and_then(|r| r.outcome.as_ref().ok())
    }

    /// Why `algorithm` failed, if it did
    pub fn error(&self, algorithm: Algorithm) -> Option<&Error> {
        self.runs
            .iter()
            .find(|r| r.algorithm == algorithm)
            .and_then(|r| r.outcome.as_ref().err())
    }

    /// Quickest successful run. Ties go to the earlier algorithm.
    pub fn fastest(&self) -> Option<&AlgorithmStats> {
        self.successful().fold(None, |best: Option<&AlgorithmStats>, s| match best {
            Some(b) if b.execution_time <= s.execution_time => Some(b),
            _ => Some(s),
        })
    }

    /// Successful run with the fewest comparisons. Ties go to the earlier algorithm.
    pub fn fewest_comparisons(&self) -> Option<&AlgorithmStats> {
        self.successful().fold(None, |best: Option<&AlgorithmStats>, s| match best {
            Some(b) if b.total_comparisons <= s.total_comparisons => Some(b),
            _ => Some(s),
        })
    }

    /// True if every successful algorithm found the same number of matches
    pub fn results_agree(&self) -> bool {
        let mut counts = self.successful().map(|s| s.matches_found);
        match counts.next() {
            Some(first) => counts.all(|c| c == first),
            None => true,
        }
    }
}

/// Run every algorithm over `text`.
///
/// An algorithm that rejects the pattern records its error; the others still run.
pub fn compare_algorithms(
    text: &[u8],
    pattern: &[u8],
    description: Option<&str>,
) -> ComparisonReport {
    let runs = Algorithm::ALL
        .iter()
        .map(|&algorithm| AlgorithmRun {
            algorithm,
            outcome: AlgorithmStats::measure(algorithm, text, pattern),
        })
        .collect();

    ComparisonReport {
        description: description.map(str::to_owned),
        text_length: text.len() as u64,
        pattern_length: pattern.len(),
        runs,
    }
}

/// Run every algorithm over every document and accumulate the stats.
///
/// Each pattern is preprocessed once per algorithm; the preprocessing time is
/// included in the total.
pub fn compare_on_corpus(
    documents: &[Document],
    pattern: &[u8],
    description: Option<&str>,
) -> ComparisonReport {
    let runs = Algorithm::ALL
        .iter()
        .map(|&algorithm| AlgorithmRun {
            algorithm,
            outcome: measure_corpus(algorithm, documents, pattern),
        })
        .collect();

    ComparisonReport {
        description: description.map(str::to_owned),
        text_length: documents.iter().map(|d| d.text.len() as u64).sum(),
        pattern_length: pattern.len(),
        runs,
    }
}

fn measure_corpus(
    algorithm: Algorithm,
    documents: &[Document],
    pattern: &[u8],
) -> Result<AlgorithmStats> {
    let start = Instant::now();
    let compiled = algorithm.compile(pattern)?;
    let mut stats = AlgorithmStats::empty(algorithm);
    stats.execution_time = start.elapsed();

    for doc in documents {
        let start = Instant::now();
        let results = compiled.find_all(doc.text.as_bytes())?;
        stats.record(start.elapsed(), doc.text.len(), &compiled, &results);
    }

    tracing::debug!(
        %algorithm,
        documents = documents.len(),
        comparisons = stats.total_comparisons,
        "corpus benchmark finished"
    );
    Ok(stats)
}
