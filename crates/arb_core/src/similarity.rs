//! Token-set string similarity on the familiar 0–100 scale.
//!
//! Word order and duplicate tokens are ignored, so "Madrid Real" scores 100
//! against "Real Madrid" and "R. Madrid" still scores high against
//! "Real Madrid" via the shared-token core. The score is the maximum pairwise
//! similarity between the three canonical strings built from the token-set
//! intersection and the two one-sided remainders.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Lowercase, strip punctuation to spaces, collapse whitespace into a
/// sorted, deduplicated token set.
fn token_set(s: &str) -> BTreeSet<String> {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn join(tokens: &BTreeSet<String>) -> String {
    tokens.iter().cloned().collect::<Vec<_>>().join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    normalized_levenshtein(a, b) * 100.0
}

/// Order-independent, duplicate-collapsing similarity score in [0, 100].
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);

    let common: BTreeSet<String> = tokens_a.intersection(&tokens_b).cloned().collect();
    let only_a: BTreeSet<String> = tokens_a.difference(&tokens_b).cloned().collect();
    let only_b: BTreeSet<String> = tokens_b.difference(&tokens_a).cloned().collect();

    let base = join(&common);
    let combined_a = if only_a.is_empty() {
        base.clone()
    } else if base.is_empty() {
        join(&only_a)
    } else {
        format!("{} {}", base, join(&only_a))
    };
    let combined_b = if only_b.is_empty() {
        base.clone()
    } else if base.is_empty() {
        join(&only_b)
    } else {
        format!("{} {}", base, join(&only_b))
    };

    // When there is any shared-token core, comparing the core against the
    // combined strings is what makes the score order-invariant and generous
    // to abbreviations.
    let mut best = ratio(&combined_a, &combined_b);
    if !base.is_empty() {
        best = best.max(ratio(&base, &combined_a));
        best = best.max(ratio(&base, &combined_b));
    }
    best
}
