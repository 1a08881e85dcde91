//! Text normalization applied before tokenization.

use serde::{Deserialize, Serialize};

/// Normalization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    pub to_lowercase: bool,
    pub remove_accents: bool,
    /// Collapse whitespace runs to one space and trim the trailing one
    pub normalize_whitespace: bool,
    /// Drop everything that is not alphanumeric (see the `preserve_*` flags)
    pub remove_special_chars: bool,
    pub preserve_numbers: bool,
    pub preserve_hyphens: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            to_lowercase: true,
            remove_accents: true,
            normalize_whitespace: true,
            remove_special_chars: false,
            preserve_numbers: true,
            preserve_hyphens: true,
        }
    }
}

/// Base letter for the accented Latin letters found in Spanish and
/// neighbouring languages. Other chars are returned unchanged.
pub fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'Á' | 'À' | 'Ä' | 'Â' => 'A',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'Ñ' => 'N',
        'Ç' => 'C',
        other => other,
    }
}

/// Normalize `text` according to `config`.
pub fn normalize(text: &str, config: &NormalizationConfig) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;

    for ch in text.chars() {
        let mut ch = if config.remove_accents { fold_accent(ch) } else { ch };
        if config.to_lowercase {
            // Multi-char lowercase expansions are rare enough to take the first
            ch = ch.to_lowercase().next().unwrap_or(ch);
        }

        if ch.is_whitespace() {
            if config.normalize_whitespace {
                if !last_was_space {
                    out.push(' ');
                    last_was_space = true;
                }
            } else {
                out.push(ch);
            }
            continue;
        }

        let keep = !config.remove_special_chars
            || ch.is_alphanumeric()
            || (config.preserve_numbers && ch.is_numeric())
            || (config.preserve_hyphens && (ch == '-' || ch == '_'));

        if keep {
            out.push(ch);
            last_was_space = false;
        }
    }

    if config.normalize_whitespace && out.ends_with(' ') {
        out.pop();
    }

    out
}

/// Normalize with the default settings
pub fn normalize_simple(text: &str) -> String {
    normalize(text, &NormalizationConfig::default())
}
