//! Tokenization and sentence splitting.

use regex::Regex;
use std::sync::LazyLock;

/// Words (with an optional apostrophe ending) and terminal punctuation.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9]+(?:'[A-Za-z]+)?|[.?!]").expect("token pattern is valid")
});

const TERMINATORS: [&str; 3] = [".", "?", "!"];

/// Split text into tokens. Other punctuation is dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Group tokens into sentences ending at `.`, `?` or `!`.
///
/// The terminator stays with its sentence; trailing tokens without one form
/// a final sentence.
pub fn split_sentences(tokens: &[String]) -> Vec<Vec<String>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();
    for token in tokens {
        current.push(token.clone());
        if TERMINATORS.contains(&token.as_str()) {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}
