use std::sync::LazyLock;

use regex::Regex;

/// Word characters with optional internal apostrophes ("don't", "patient's").
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+(?:'\w+)*").unwrap());

/// Split text into lowercase word tokens, keeping contractions whole.
/// Typographic apostrophes are folded to ASCII first.
pub fn word_tokens(text: &str) -> Vec<String> {
    let normalized = text.replace('\u{2019}', "'").to_lowercase();
    WORD_RE
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}
