//! Word Error Rate.
//!
//! WER = (substitutions + deletions + insertions) / reference word count,
//! computed as word-level Levenshtein distance over normalized tokens.

use std::sync::OnceLock;

use regex::Regex;

fn punctuation() -> &'static Regex {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s]+").expect("static pattern"))
}

/// Normalization policy applied to both sides before scoring: strip
/// characters outside word characters and whitespace, lowercase, split on
/// whitespace. Fixed so results stay reproducible across runs.
pub fn normalize_words(text: &str) -> Vec<String> {
    punctuation()
        .replace_all(text, "")
        .to_lowercase()
        .split_whitespace()
        .map(ToOwned::to_owned)
        .collect()
}

/// Word error rate between a reference and a hypothesis, as a fraction.
///
/// An empty reference scores 0.0 against an empty hypothesis and 1.0 against
/// anything else. Insertions can push the value above 1.0; it is never
/// negative.
pub fn wer(reference: &str, hypothesis: &str) -> f64 {
    let ref_words = normalize_words(reference);
    let hyp_words = normalize_words(hypothesis);

    if ref_words.is_empty() {
        return if hyp_words.is_empty() { 0.0 } else { 1.0 };
    }

    let distance = levenshtein_distance(&ref_words, &hyp_words);
    distance as f64 / ref_words.len() as f64
}

fn levenshtein_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows are enough; full matrix is never needed.
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for (i, a_item) in a.iter().enumerate() {
        curr[0] = i + 1;

        for (j, b_item) in b.iter().enumerate() {
            let cost = usize::from(a_item != b_item);
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::{levenshtein_distance, normalize_words, wer};

    #[test]
    fn identical_texts_score_zero() {
        assert!((wer("hello world", "hello world") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_substitution_out_of_two_words_scores_half() {
        assert!((wer("hello world", "hello word") - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_hypothesis_scores_one() {
        assert!((wer("hello world", "") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_reference_against_empty_hypothesis_scores_zero() {
        assert!((wer("", "") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_reference_against_nonempty_hypothesis_scores_one() {
        assert!((wer("", "hello") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn insertions_can_exceed_one() {
        let value = wer("a", "x y z");
        assert!(value > 1.0);
    }

    #[test]
    fn deletion_counts_against_reference_length() {
        assert!((wer("a b c", "a c") - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn case_and_punctuation_are_normalized_away() {
        assert!((wer("Hello, World!", "hello world") - 0.0).abs() < f64::EPSILON);
        assert!((wer("it's fine", "its fine") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert!((wer("hello   world", "hello world") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_words_strips_symbols() {
        assert_eq!(normalize_words("One, two... THREE!"), ["one", "two", "three"]);
    }

    #[test]
    fn levenshtein_counts_each_edit_kind() {
        assert_eq!(levenshtein_distance(&["a", "b", "c"], &["a", "b", "c"]), 0);
        assert_eq!(levenshtein_distance(&["a", "b", "c"], &["a", "x", "c"]), 1);
        assert_eq!(levenshtein_distance(&["a", "b"], &["a", "x", "b"]), 1);
        assert_eq!(levenshtein_distance(&["a", "b", "c"], &["a", "c"]), 1);
        assert_eq!(levenshtein_distance::<&str>(&[], &["a", "b"]), 2);
        assert_eq!(levenshtein_distance(&["a", "b"], &[]), 2);
    }
}
