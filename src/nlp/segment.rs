/// Sentence boundary detection. Must be deterministic for identical input.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Punctuation and newline based segmenter.
///
/// Splits after `.`, `!` or `?` when followed by whitespace, and on every
/// newline. Common abbreviations ("Dr.", "e.g.") do not end a sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSegmenter;

impl SentenceSegmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        split_into_sentences(text)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Common abbreviations that end with a period but are NOT sentence boundaries.
const ABBREVIATIONS: &[&str] = &[
    "Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "St.", "vs.", "etc.", "e.g.", "i.e.",
    "approx.", "min.", "hr.", "hrs.", "wk.", "wks.", "temp.",
];

/// Check if the text ending at `period_pos` ends with a known abbreviation
/// that starts on a word boundary.
fn ends_with_abbreviation(text: &str, period_pos: usize) -> bool {
    let prefix = &text[..=period_pos];
    ABBREVIATIONS.iter().any(|abbr| {
        if prefix.len() < abbr.len() {
            return false;
        }
        let start = prefix.len() - abbr.len();
        if !prefix.is_char_boundary(start) || !prefix[start..].eq_ignore_ascii_case(abbr) {
            return false;
        }
        prefix[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split text into trimmed, non-empty sentences.
fn split_into_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '\n' {
            push_trimmed(&mut sentences, &text[start..i]);
            start = i + c.len_utf8();
            continue;
        }

        if !is_terminator(c) || (c == '.' && ends_with_abbreviation(text, i)) {
            continue;
        }

        // Absorb runs like "?!" or a closing quote/bracket after the terminator.
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if is_terminator(next) || matches!(next, '"' | '\'' | ')' | '\u{201D}') {
                end = j + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        if chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}
