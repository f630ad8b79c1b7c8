//! Pairwise phoneme substitution costs
//!
//! The single place where domain tuning happens: confusable Mandarin phoneme
//! pairs cost 0.5, English tokens are scored by character overlap, everything
//! else is a full substitution.

use hotword_core::{Lang, Phoneme};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Confusable Mandarin phoneme pairs: front/back nasals, retroflex/dental
/// sibilants, l/n, f/h and the ai/ei finals.
const CONFUSABLE_PAIRS: &[(&str, &str)] = &[
    ("an", "ang"),
    ("en", "eng"),
    ("in", "ing"),
    ("ian", "iang"),
    ("uan", "uang"),
    ("z", "zh"),
    ("c", "ch"),
    ("s", "sh"),
    ("l", "n"),
    ("f", "h"),
    ("ai", "ei"),
];

static CONFUSABLE_GROUPS: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    let mut groups = HashMap::new();
    for (id, (a, b)) in CONFUSABLE_PAIRS.iter().enumerate() {
        groups.insert(*a, id);
        groups.insert(*b, id);
    }
    groups
});

/// Substitution cost between two phonemes, symmetric, in [0, 1].
///
/// Zero only on an exact value match within the same language class.
pub fn phoneme_cost(a: &Phoneme, b: &Phoneme) -> f32 {
    if a.lang != b.lang {
        return 1.0;
    }
    if a.value == b.value {
        return 0.0;
    }
    match a.lang {
        Lang::Zh => {
            match (
                CONFUSABLE_GROUPS.get(a.value.as_str()),
                CONFUSABLE_GROUPS.get(b.value.as_str()),
            ) {
                (Some(ga), Some(gb)) if ga == gb => 0.5,
                _ => 1.0,
            }
        }
        Lang::En if a.value.len() > 1 && b.value.len() > 1 => {
            // Partial character overlap, e.g. "pythn" vs "python"
            let lcs = lcs_len(&a.value, &b.value);
            let max_len = a.value.len().max(b.value.len());
            1.0 - lcs as f32 / max_len as f32
        }
        _ => 1.0,
    }
}

/// Longest common subsequence length over bytes (token values are ASCII)
pub fn lcs_len(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
