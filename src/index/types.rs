use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for a document in the corpus
pub type DocId = u32;

/// Default bucket count of the inverted index term dictionary
pub const DEFAULT_DICTIONARY_CAPACITY: usize = 1024;

/// Initial capacity of a freshly created posting list
pub const DEFAULT_POSTING_LIST_CAPACITY: usize = 10;

/// Document kind detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Unknown,
    Text,
    Html,
    Csv,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => DocumentKind::Text,
            "html" | "htm" => DocumentKind::Html,
            "csv" => DocumentKind::Csv,
            _ => DocumentKind::Unknown,
        }
    }

    pub fn from_path(path: &std::path::Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or_default()
    }
}

/// A loaded corpus document with its cleaned text
#[derive(Debug, Clone)]
pub struct Document {
    pub doc_id: DocId,
    /// Path relative to the corpus root
    pub path: PathBuf,
    pub kind: DocumentKind,
    /// Size of the file on disk, in bytes
    pub size: u64,
    /// Text after markup removal; this is what gets tokenized and searched
    pub text: String,
}

impl Document {
    /// Size class used by corpus analysis: < 1 KiB, 1-10 KiB, larger.
    pub fn size_class(&self) -> SizeClass {
        match self.size {
            s if s < 1024 => SizeClass::Small,
            s if s < 10 * 1024 => SizeClass::Medium,
            _ => SizeClass::Large,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}
