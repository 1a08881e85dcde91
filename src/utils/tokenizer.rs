use serde::{Deserialize, Serialize};

/// Maximum token length kept by default.
/// Longer runs are almost always encoded blobs rather than words.
pub const MAX_TOKEN_LENGTH: usize = 256;

/// A token cut from a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Length of `text` in bytes
    pub length: usize,
    /// Byte offset of the token in the tokenized text
    pub position: usize,
    /// True if every char is alphanumeric or `_`
    pub is_word: bool,
}

impl Token {
    pub fn new(text: String, position: usize, is_word: bool) -> Self {
        Self {
            length: text.len(),
            text,
            position,
            is_word,
        }
    }
}

/// Tokenizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub preserve_case: bool,
    /// Emit punctuation characters as non-word tokens
    pub keep_punctuation: bool,
    pub min_token_length: usize,
    pub max_token_length: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            preserve_case: false,
            keep_punctuation: false,
            min_token_length: 1,
            max_token_length: MAX_TOKEN_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CharType {
    Space,
    Punct,
    Other,
}

fn classify_char(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Space
    } else if ch.is_ascii_punctuation() && ch != '_' {
        CharType::Punct
    } else {
        CharType::Other
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Split `text` on whitespace and ASCII punctuation.
///
/// Positions are byte offsets into `text`. Tokens outside the configured
/// length window are dropped.
pub fn tokenize(text: &str, config: &TokenizerConfig) -> Vec<Token> {
    // Rough guess: one token every six bytes
    let mut tokens = Vec::with_capacity(text.len() / 6 + 1);
    let mut token_start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        let char_type = classify_char(ch);

        if char_type == CharType::Other {
            if token_start.is_none() {
                token_start = Some(i);
            }
            continue;
        }

        if let Some(start) = token_start.take() {
            add_token(&mut tokens, &text[start..i], start, config);
        }

        if char_type == CharType::Punct && config.keep_punctuation {
            tokens.push(Token::new(ch.to_string(), i, false));
        }
    }

    // Handle last token
    if let Some(start) = token_start {
        add_token(&mut tokens, &text[start..], start, config);
    }

    tokens
}

fn add_token(tokens: &mut Vec<Token>, slice: &str, position: usize, config: &TokenizerConfig) {
    if slice.len() < config.min_token_length || slice.len() > config.max_token_length {
        return;
    }

    let is_word = slice.chars().all(is_word_char);
    let text = if config.preserve_case {
        slice.to_string()
    } else {
        slice.to_lowercase()
    };
    tokens.push(Token::new(text, position, is_word));
}

/// Tokenize with the default settings
pub fn tokenize_simple(text: &str) -> Vec<Token> {
    tokenize(text, &TokenizerConfig::default())
}
