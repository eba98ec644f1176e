use std::collections::HashSet;

use super::tokenize::word_tokens;

/// Closed set of tokens that negate a following symptom mention.
/// Lowercase; contractions appear both with and without the apostrophe.
pub const NEGATION_MARKERS: &[&str] = &[
    "ain't", "aren't", "barely", "can't", "cannot", "cant", "couldn't", "denied",
    "denies", "deny", "didn't", "didnt", "doesn't", "doesnt", "don't", "dont",
    "hadn't", "hardly", "hasn't", "hasnt", "haven't", "havent", "isn't", "isnt",
    "lack", "lacking", "lacks", "neither", "never", "no", "nobody", "none", "nor",
    "not", "nothing", "wasn't", "weren't", "without", "won't", "wont", "wouldn't",
];

pub fn is_negation_marker(token: &str) -> bool {
    NEGATION_MARKERS.contains(&token)
}

/// Decide whether the mention of `phrase` in `sentence` is negated.
///
/// The earliest sentence token belonging to the phrase anchors the check;
/// only the `window` tokens before it are scanned.
pub fn is_negated(sentence: &str, phrase: &str, window: usize) -> bool {
    let phrase_tokens: HashSet<String> = word_tokens(phrase).into_iter().collect();
    if phrase_tokens.is_empty() {
        return false;
    }

    let tokens = word_tokens(sentence);
    let Some(anchor) = tokens.iter().position(|t| phrase_tokens.contains(t)) else {
        return false;
    };

    let from = anchor.saturating_sub(window);
    tokens[from..anchor].iter().any(|t| is_negation_marker(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: usize = 5;

    #[test]
    fn plain_negator_before_phrase() {
        assert!(is_negated(
            "I have a runny nose and sore throat, no fever.",
            "fever",
            WINDOW
        ));
    }

    #[test]
    fn unnegated_mentions_in_same_sentence() {
        let sentence = "I have a runny nose and sore throat, no fever.";
        assert!(!is_negated(sentence, "runny nose", WINDOW));
        assert!(!is_negated(sentence, "sore throat", WINDOW));
    }

    #[test]
    fn contraction_negates() {
        assert!(is_negated("I don't have a headache", "headache", WINDOW));
        assert!(is_negated("I DON\u{2019}T have a headache", "headache", WINDOW));
    }

    #[test]
    fn negator_outside_window_is_ignored() {
        // "no" sits six tokens before "cough"
        assert!(!is_negated(
            "no idea why but today I cough",
            "cough",
            WINDOW
        ));
        assert!(is_negated("no idea why but today I cough", "cough", 6));
    }

    #[test]
    fn negator_after_phrase_is_ignored() {
        assert!(!is_negated("fever, but no cough", "fever", WINDOW));
    }

    #[test]
    fn earliest_occurrence_anchors_scan() {
        // First "fever" is affirmed; the later negated repeat does not count.
        assert!(!is_negated(
            "fever last night and now no fever",
            "fever",
            WINDOW
        ));
    }

    #[test]
    fn any_phrase_token_can_anchor() {
        // "throat" appears before "sore" would; it anchors the window.
        assert!(is_negated("without throat pain, just sore", "sore throat", WINDOW));
    }

    #[test]
    fn window_clips_at_sentence_start() {
        assert!(is_negated("no fever", "fever", WINDOW));
        assert!(!is_negated("fever", "fever", WINDOW));
    }

    #[test]
    fn missing_phrase_is_not_negated() {
        assert!(!is_negated("no cough at all", "fever", WINDOW));
    }

    #[test]
    fn empty_phrase_is_not_negated() {
        assert!(!is_negated("no fever", "", WINDOW));
        assert!(!is_negated("no fever", " .,", WINDOW));
    }

    #[test]
    fn zero_window_never_negates() {
        assert!(!is_negated("no fever", "fever", 0));
    }

    #[test]
    fn markers_are_lowercase_and_unique() {
        let unique: HashSet<&&str> = NEGATION_MARKERS.iter().collect();
        assert_eq!(unique.len(), NEGATION_MARKERS.len());
        assert!(NEGATION_MARKERS.iter().all(|m| m.to_lowercase() == *m));
    }
}
