//! Fixed-delimiter tokenization
//!
//! Splitting is case-sensitive and driven by a fixed delimiter set; there
//! is no stemming, lowercasing, or stop-word handling. Tokens are
//! deduplicated per input while keeping first-encounter order, which is
//! what makes word-id assignment deterministic for a given corpus layout.

use std::collections::HashSet;

/// Characters that separate words.
/// Carriage return is included so CRLF corpora tokenize the same as LF.
const DELIMITERS: &[char] = &[
    ' ', '\\', '\n', '\t', '\r', '"', '$', '\'', '!', ',', '?', ';', '.', ':', '-', '_', '*',
    '+', '=', ')', '(', '[', ']', '{', '}', '<', '>', '/', '@', '&', '%', '€', '#',
];

/// Extract the distinct words of `text` in first-encounter order
pub fn extract_words(text: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut words = Vec::new();

    for token in text.split(|c: char| DELIMITERS.contains(&c)) {
        if token.is_empty() || !seen.insert(token) {
            continue;
        }
        words.push(token.to_string());
    }

    words
}
