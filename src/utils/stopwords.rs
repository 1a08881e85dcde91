//! Built-in stopword lists and token filtering.

use crate::utils::normalizer::{normalize, NormalizationConfig};
use crate::utils::tokenizer::Token;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const SPANISH: &[&str] = &[
    "el", "la", "de", "que", "y", "a", "en", "un", "es", "se", "no", "te", "lo", "le", "da", "su",
    "por", "son", "con", "para", "al", "las", "del", "los", "una", "como", "pero", "sus", "ya",
    "o", "porque", "cuando", "muy", "sin", "sobre", "también", "me", "hasta", "hay", "donde",
    "quien", "desde", "todo", "nos", "durante", "todos", "uno", "les", "ni", "contra", "otros",
    "ese", "eso", "ante", "ellos", "e", "esto", "mí", "antes", "algunos", "qué", "unos", "yo",
    "otro", "otras", "otra", "él", "tanto", "esa", "estos", "mucho", "quienes", "nada", "muchos",
    "cual", "poco", "ella", "estar", "estas", "algunas", "algo", "nosotros", "mi", "mis", "tú",
    "ti", "tu", "tus", "ellas", "nosotras", "vosotros", "vosotras", "os", "mío", "mía", "míos",
    "mías", "tuyo", "tuya", "tuyos", "tuyas", "suyo", "suya", "suyos", "suyas", "nuestro",
    "nuestra", "nuestros", "nuestras", "vuestro", "vuestra", "vuestros", "vuestras", "esos",
    "esas", "estoy", "estás", "está", "estamos", "estáis", "están", "esté", "estés", "estemos",
    "estéis", "estén", "estaré", "estarás", "estará", "estaremos", "estaréis", "estarán",
    "estaría", "estarías", "estaríamos", "estaríais", "estarían", "estaba", "estabas",
    "estábamos", "estabais", "estaban", "estuve", "estuviste", "estuvo", "estuvimos",
    "estuvisteis", "estuvieron", "sea", "seas", "seamos", "seáis", "sean", "soy", "eres",
    "somos", "sois", "fui", "fuiste", "fue", "fuimos", "fuisteis", "fueron", "seré", "serás",
    "será", "seremos", "seréis", "serán", "sería", "serías", "seríamos", "seríais", "serían",
    "tengo", "tienes", "tiene", "tenemos", "tenéis", "tienen", "tenga", "tengas", "tengamos",
    "tengáis", "tengan", "tendré", "tendrás", "tendrá", "tendremos", "tendréis", "tendrán",
    "tendría", "tendrías", "tendríamos", "tendríais", "tendrían", "tenía", "tenías", "teníamos",
    "teníais", "tenían", "tuve", "tuviste", "tuvo", "tuvimos", "tuvisteis", "tuvieron", "hago",
    "haces", "hace", "hacemos", "hacéis", "hacen", "haga", "hagas", "hagamos", "hagáis", "hagan",
    "haré", "harás", "hará", "haremos", "haréis", "harán", "haría", "harías", "haríamos",
    "haríais", "harían", "hacía", "hacías", "hacíamos", "hacíais", "hacían", "hice", "hiciste",
    "hizo", "hicimos", "hicisteis", "hicieron", "doy", "das", "damos", "dais", "dan", "dé", "des",
    "demos", "deis", "den", "daré", "darás", "dará", "daremos", "daréis", "darán", "daría",
    "darías", "daríamos", "daríais", "darían", "daba", "dabas", "dábamos", "dabais", "daban",
    "di", "diste", "dio", "dimos", "disteis", "dieron",
];

const ENGLISH: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "i", "me", "my",
    "myself", "we", "our", "ours", "ourselves", "you", "your", "yours", "yourself", "yourselves",
    "him", "his", "himself", "she", "her", "hers", "herself", "they", "them", "their", "theirs",
    "themselves", "what", "which", "who", "whom", "this", "these", "am", "been", "being", "have",
    "had", "having", "do", "does", "did", "doing", "would", "should", "could", "ought", "above",
    "below", "up", "down", "out", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "can", "just", "now", "until", "while", "because", "if", "or", "but", "about",
    "against", "between", "into", "through", "during", "before", "after", "cannot",
];

/// Which built-in list to filter with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwordLanguage {
    #[default]
    Spanish,
    English,
    None,
}

/// Set of words to drop from token streams.
///
/// Entries are stored normalized, so they match tokens produced by the
/// default normalizer (`está` and `esta` are the same stopword).
#[derive(Debug, Clone, Default)]
pub struct StopwordList {
    words: HashSet<String>,
}

impl StopwordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in list for `language`. `None` gives an empty list.
    pub fn for_language(language: StopwordLanguage) -> Self {
        let words: &[&str] = match language {
            StopwordLanguage::Spanish => SPANISH,
            StopwordLanguage::English => ENGLISH,
            StopwordLanguage::None => &[],
        };
        let mut list = Self::new();
        for word in words {
            list.add(word);
        }
        list
    }

    /// Add a word. Empty words are ignored.
    pub fn add(&mut self, word: &str) {
        let folded = normalize(word, &NormalizationConfig::default());
        if !folded.is_empty() {
            self.words.insert(folded);
        }
    }

    /// Check an already normalized word
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Drop word tokens found in the list. Non-word tokens are kept.
    ///
    /// Returns the number of tokens removed.
    pub fn filter_tokens(&self, tokens: &mut Vec<Token>) -> usize {
        let before = tokens.len();
        tokens.retain(|t| !(t.is_word && self.contains(&t.text)));
        before - tokens.len()
    }
}
