//! Token-set similarity.
//!
//! Both inputs are reduced to sorted sets of lowercase alphanumeric words.
//! A phrase whose words all occur in the sentence scores 100 regardless of
//! word order or extra sentence words. Otherwise the score is the best
//! normalized indel similarity among the intersection and difference
//! recombinations.

use std::collections::BTreeSet;

/// Lowercase, replace every non-alphanumeric character with a space, trim.
pub fn default_process(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    replaced.to_lowercase().trim().to_string()
}

/// Token-set similarity in [0, 100], rounded half-to-even.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let a = default_process(a);
    let b = default_process(b);
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100;
    }

    let diff_ab_joined = diff_ab.join(" ");
    let diff_ba_joined = diff_ba.join(" ");

    let sect_len = char_len(&intersection.join(" "));
    let ab_len = char_len(&diff_ab_joined);
    let ba_len = char_len(&diff_ba_joined);

    // "sect ab" and "sect ba" share the intersection as a prefix, so their
    // indel distance is that of the differences alone.
    let separator = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + separator + ab_len;
    let sect_ba_len = sect_len + separator + ba_len;

    let dist = indel_distance(&diff_ab_joined, &diff_ba_joined);
    let mut best = normalized_similarity(dist, sect_ab_len + sect_ba_len);

    if sect_len != 0 {
        let sect_ab = normalized_similarity(separator + ab_len, sect_len + sect_ab_len);
        let sect_ba = normalized_similarity(separator + ba_len, sect_len + sect_ba_len);
        best = best.max(sect_ab).max(sect_ba);
    }

    best.clamp(0.0, 100.0).round_ties_even() as u8
}

fn normalized_similarity(dist: usize, lensum: usize) -> f64 {
    if lensum == 0 {
        return 100.0;
    }
    100.0 * (1.0 - dist as f64 / lensum as f64)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Insertions plus deletions needed to turn `a` into `b`.
pub fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * lcs_len(&a, &b)
}

/// Longest common subsequence length, single-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if ca == cb { diag + 1 } else { up.max(row[j]) };
            diag = up;
        }
    }
    row[b.len()]
}
