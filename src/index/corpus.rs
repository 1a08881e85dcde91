//! Loading a directory of text and HTML files as corpus documents.

use crate::config::CorpusConfig;
use crate::error::{Error, Result};
use crate::index::types::{DocId, Document, DocumentKind};
use crate::utils::{extract_text, is_binary};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters from a corpus load
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadStats {
    /// Files matching the include globs and the size window
    pub total_files_found: usize,
    pub files_loaded: usize,
    /// Files that could not be read
    pub files_failed: usize,
    /// Binary files, and files dropped by the document limit
    pub files_skipped: usize,
    pub total_bytes_loaded: u64,
    #[serde(serialize_with = "serialize_secs")]
    pub loading_time: Duration,
    pub text_files: usize,
    pub html_files: usize,
    pub csv_files: usize,
    pub other_files: usize,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl LoadStats {
    fn count_kind(&mut self, kind: DocumentKind) {
        match kind {
            DocumentKind::Text => self.text_files += 1,
            DocumentKind::Html => self.html_files += 1,
            DocumentKind::Csv => self.csv_files += 1,
            DocumentKind::Unknown => self.other_files += 1,
        }
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Find candidate files under `root`, as (full path, relative path, size)
fn discover_files(
    root: &Path,
    config: &CorpusConfig,
    globs: &GlobSet,
) -> Vec<(PathBuf, PathBuf, u64)> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .max_depth(if config.recursive { None } else { Some(1) })
        .build();

    let mut files: Vec<_> = walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter(|entry| globs.is_match(entry.file_name()))
        .filter_map(|entry| {
            let size = entry.metadata().ok()?.len();
            if size < config.min_file_size || size > config.max_file_size {
                tracing::debug!(path = %entry.path().display(), size, "outside size window");
                return None;
            }
            let path = entry.path().to_path_buf();
            let rel_path = path.strip_prefix(root).ok()?.to_path_buf();
            Some((path, rel_path, size))
        })
        .collect();

    // Stable doc ids regardless of walk order
    files.sort_by(|a, b| a.1.cmp(&b.1));
    files
}

/// Clean text for a document of the given kind
pub fn document_text(raw: &[u8], kind: DocumentKind) -> String {
    let text = String::from_utf8_lossy(raw);
    match kind {
        DocumentKind::Html => extract_text(&text),
        _ => text.into_owned(),
    }
}

/// Load every matching file under `root`.
///
/// Files are read in parallel. Unreadable files are logged and counted, and
/// binary files are skipped. Documents get ids in relative path order.
pub fn load_corpus(root: &Path, config: &CorpusConfig) -> Result<(Vec<Document>, LoadStats)> {
    let start = Instant::now();

    let meta = fs::metadata(root).map_err(|e| Error::io(root, e))?;
    if !meta.is_dir() {
        return Err(Error::invalid_argument(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let globs = build_globset(&config.include_globs)?;
    let files = discover_files(root, config, &globs);
    tracing::info!(root = %root.display(), files = files.len(), "discovered corpus files");

    let failed = AtomicUsize::new(0);
    let binary = AtomicUsize::new(0);

    let loaded: Vec<(PathBuf, DocumentKind, u64, String)> = files
        .par_iter()
        .filter_map(|(path, rel_path, size)| {
            let content = match fs::read(path) {
                Ok(c) => c,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to read file");
                    failed.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            };

            if is_binary(&content) {
                tracing::debug!(path = %path.display(), "skipping binary file");
                binary.fetch_add(1, Ordering::Relaxed);
                return None;
            }

            let kind = DocumentKind::from_path(rel_path);
            let text = document_text(&content, kind);
            Some((rel_path.clone(), kind, *size, text))
        })
        .collect();

    let mut stats = LoadStats {
        total_files_found: files.len(),
        files_failed: failed.load(Ordering::Relaxed),
        files_skipped: binary.load(Ordering::Relaxed),
        ..Default::default()
    };

    let limit = config.limit.unwrap_or(usize::MAX);
    stats.files_skipped += loaded.len().saturating_sub(limit);

    let documents: Vec<Document> = loaded
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (path, kind, size, text))| {
            stats.count_kind(kind);
            stats.total_bytes_loaded += size;
            Document {
                doc_id: i as DocId,
                path,
                kind,
                size,
                text,
            }
        })
        .collect();

    stats.files_loaded = documents.len();
    stats.loading_time = start.elapsed();

    tracing::info!(
        loaded = stats.files_loaded,
        failed = stats.files_failed,
        skipped = stats.files_skipped,
        bytes = stats.total_bytes_loaded,
        "corpus loaded"
    );

    Ok((documents, stats))
}
