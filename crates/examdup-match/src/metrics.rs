//! Similarity metrics over normalized text.
//!
//! Every function here expects input that already went through
//! [`normalize`](crate::normalize) and returns a score in `[0, 1]`.

use crate::normalize::tokens;
use std::collections::{HashMap, HashSet};

/// Minimum per-token edit similarity accepted as a fuzzy token match.
pub const FUZZY_TOKEN_THRESHOLD: f64 = 0.85;

/// Cosine similarity of the term-frequency vectors of both texts.
///
/// Returns 0 when either side has no tokens.
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = tokens(a);
    let tokens_b = tokens(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let freq_a = term_frequencies(&tokens_a);
    let freq_b = term_frequencies(&tokens_b);

    // Terms missing from either side contribute nothing to the dot product.
    let dot: u64 = freq_a
        .iter()
        .filter_map(|(term, count_a)| freq_b.get(term).map(|count_b| count_a * count_b))
        .sum();

    let magnitude_a = magnitude(&freq_a);
    let magnitude_b = magnitude(&freq_b);

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot as f64 / (magnitude_a * magnitude_b)
}

/// Jaccard similarity of the token sets of both texts.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<&str> = tokens(a).into_iter().collect();
    let set_b: HashSet<&str> = tokens(b).into_iter().collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - intersection;

    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

/// Character edit distance turned into a similarity.
///
/// `1 - distance / max(len_a, len_b)`, and 1 when both strings are empty.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Share of tokens in `a` that have an exact or near match in `b`.
///
/// Each token of `a` takes the first token of `b` that either equals it
/// (worth 1.0) or reaches [`FUZZY_TOKEN_THRESHOLD`] edit similarity (worth
/// that similarity). The sum is divided by the longer token list.
pub fn fuzzy_token_match<A, B>(a: &[A], b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut matches = 0.0;
    for token_a in a {
        let token_a = token_a.as_ref();
        for token_b in b {
            let token_b = token_b.as_ref();
            if token_a == token_b {
                matches += 1.0;
                break;
            }
            let similarity = levenshtein_similarity(token_a, token_b);
            if similarity >= FUZZY_TOKEN_THRESHOLD {
                matches += similarity;
                break;
            }
        }
    }

    matches / a.len().max(b.len()) as f64
}

fn term_frequencies<'a>(tokens: &[&'a str]) -> HashMap<&'a str, u64> {
    let mut freq = HashMap::new();
    for token in tokens {
        *freq.entry(*token).or_insert(0) += 1;
    }
    freq
}

fn magnitude(freq: &HashMap<&str, u64>) -> f64 {
    let sum_of_squares: u64 = freq.values().map(|count| count * count).sum();
    (sum_of_squares as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cosine_identical_and_disjoint() {
        assert!(approx(cosine_similarity("the quick brown fox", "the quick brown fox"), 1.0));
        assert_eq!(cosine_similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn test_cosine_counts_repeats() {
        // a = [2, 1], b = [1, 1] over {x, y}: 3 / (sqrt(5) * sqrt(2))
        let expected = 3.0 / (5.0_f64.sqrt() * 2.0_f64.sqrt());
        assert!(approx(cosine_similarity("x x y", "x y"), expected));
    }

    #[test]
    fn test_cosine_empty_side_is_zero() {
        assert_eq!(cosine_similarity("", "anything here"), 0.0);
        assert_eq!(cosine_similarity("anything here", ""), 0.0);
        assert_eq!(cosine_similarity("", ""), 0.0);
    }

    #[test]
    fn test_jaccard() {
        // {a, b, c} vs {b, c, d}: 2 / 4
        assert!(approx(jaccard_similarity("a b c", "b c d"), 0.5));
        // Duplicates collapse.
        assert!(approx(jaccard_similarity("a a a", "a"), 1.0));
        assert_eq!(jaccard_similarity("", ""), 0.0);
        assert_eq!(jaccard_similarity("a", ""), 0.0);
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_similarity("", ""), 1.0);
        assert_eq!(levenshtein_similarity("abc", ""), 0.0);
        assert!(approx(levenshtein_similarity("kitten", "sitting"), 1.0 - 3.0 / 7.0));
        assert_eq!(levenshtein_similarity("question", "question"), 1.0);
    }

    #[test]
    fn test_fuzzy_token_match_exact_and_near() {
        let a = ["photosynthesis", "chlorophyll"];
        let b = ["photosynthesis", "chlorophyl"];
        // chlorophyll vs chlorophyl: 1 - 1/11
        let expected = (1.0 + (1.0 - 1.0 / 11.0)) / 2.0;
        assert!(approx(fuzzy_token_match(&a, &b), expected));
    }

    #[test]
    fn test_fuzzy_token_match_takes_first_qualifying_token() {
        // "question" reaches "questions" (8/9) before the exact match later on.
        let a = ["question"];
        let b = ["questions", "question"];
        assert!(approx(fuzzy_token_match(&a, &b), (1.0 - 1.0 / 9.0) / 2.0));
    }

    #[test]
    fn test_fuzzy_token_match_divides_by_longer_list() {
        let a = ["alpha"];
        let b = ["alpha", "beta", "gamma", "delta"];
        assert!(approx(fuzzy_token_match(&a, &b), 0.25));
        assert_eq!(fuzzy_token_match::<&str, &str>(&[], &["alpha"]), 0.0);
    }

    proptest! {
        #[test]
        fn prop_metrics_are_symmetric(a in "[a-e ]{0,24}", b in "[a-e ]{0,24}") {
            prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
            prop_assert_eq!(jaccard_similarity(&a, &b), jaccard_similarity(&b, &a));
            prop_assert_eq!(levenshtein_similarity(&a, &b), levenshtein_similarity(&b, &a));
        }

        #[test]
        fn prop_metrics_stay_in_unit_range(a in "[a-e ]{0,24}", b in "[a-e ]{0,24}") {
            for score in [
                cosine_similarity(&a, &b),
                jaccard_similarity(&a, &b),
                levenshtein_similarity(&a, &b),
            ] {
                prop_assert!((0.0..=1.0 + 1e-12).contains(&score));
            }
        }

        #[test]
        fn prop_levenshtein_self_is_one(a in "[a-z ]{1,32}") {
            prop_assert_eq!(levenshtein_similarity(&a, &a), 1.0);
        }
    }
}
