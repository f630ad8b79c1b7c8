//! Weighted alignment over phoneme sequences
//!
//! All variants share the cost model and run in O(main * pattern):
//! - `best_match`: free-start/free-end substring alignment with traceback,
//!   locating the best span of `pattern` inside `main`
//! - `substring_distance` / `substring_score`: the same recurrence with a
//!   rolling row when only the score is needed
//! - `anchored_distance`: both ends pinned, for scoring a fixed window

use crate::cost::phoneme_cost;
use hotword_core::Phoneme;

const EPSILON: f32 = 1e-6;

/// Best span of a pattern inside a longer sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    /// `1 - distance / pattern_len`, clamped to [0, 1]
    pub score: f32,
    /// Start index into `main`, inclusive
    pub start: usize,
    /// End index into `main`, exclusive
    pub end: usize,
}

/// Locate the best fuzzy occurrence of `pattern` inside `main`.
///
/// Row 0 of the matrix is free (the match may start anywhere in `main`);
/// column 0 charges one deletion per unmatched pattern prefix phoneme. The
/// minimum of the last row picks the end position, traceback to row 0 yields
/// the start. Returns `None` when either sequence is empty.
pub fn best_match(main: &[Phoneme], pattern: &[Phoneme]) -> Option<BestMatch> {
    let n = pattern.len();
    let m = main.len();
    if n == 0 || m == 0 {
        return None;
    }

    let mut dp = vec![vec![0.0f32; m + 1]; n + 1];
    for i in 1..=n {
        dp[i][0] = i as f32;
    }
    for i in 1..=n {
        for j in 1..=m {
            let cost = phoneme_cost(&pattern[i - 1], &main[j - 1]);
            dp[i][j] = (dp[i - 1][j] + 1.0)
                .min(dp[i][j - 1] + 1.0)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    let mut end = 1;
    let mut min_dist = f32::INFINITY;
    for j in 1..=m {
        if dp[n][j] < min_dist {
            min_dist = dp[n][j];
            end = j;
        }
    }

    let (mut i, mut j) = (n, end);
    while i > 0 {
        if j > 0 {
            let cost = phoneme_cost(&pattern[i - 1], &main[j - 1]);
            if (dp[i][j] - (dp[i - 1][j - 1] + cost)).abs() < EPSILON {
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if (dp[i][j] - (dp[i - 1][j] + 1.0)).abs() < EPSILON {
            i -= 1;
        } else if j > 0 && (dp[i][j] - (dp[i][j - 1] + 1.0)).abs() < EPSILON {
            j -= 1;
        } else {
            i -= 1;
        }
    }

    Some(BestMatch {
        score: (1.0 - min_dist / n as f32).max(0.0),
        start: j,
        end,
    })
}

/// Minimum distance of `pattern` against any substring of `main`.
///
/// Rolling two-row formulation, O(main) memory, no span recovery.
pub fn substring_distance(main: &[Phoneme], pattern: &[Phoneme]) -> f32 {
    let n = pattern.len();
    let m = main.len();
    if n == 0 {
        return 0.0;
    }
    if m == 0 {
        return n as f32;
    }

    let mut prev = vec![0.0f32; m + 1];
    let mut curr = vec![0.0f32; m + 1];
    for i in 1..=n {
        curr[0] = i as f32;
        for j in 1..=m {
            let cost = phoneme_cost(&pattern[i - 1], &main[j - 1]);
            curr[j] = (prev[j] + 1.0)
                .min(curr[j - 1] + 1.0)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev.iter().copied().fold(f32::INFINITY, f32::min)
}

/// `1 - substring_distance / pattern_len`, clamped to [0, 1]
pub fn substring_score(main: &[Phoneme], pattern: &[Phoneme]) -> f32 {
    if pattern.is_empty() {
        return 0.0;
    }
    (1.0 - substring_distance(main, pattern) / pattern.len() as f32).max(0.0)
}

/// Weighted edit distance with both ends anchored, for scoring a window whose
/// boundaries are already fixed.
pub fn anchored_distance(pattern: &[Phoneme], window: &[Phoneme]) -> f32 {
    let n = pattern.len();
    let m = window.len();
    if n == 0 {
        return m as f32;
    }
    if m == 0 {
        return n as f32;
    }

    let mut prev: Vec<f32> = (0..=m).map(|j| j as f32).collect();
    let mut curr = vec![0.0f32; m + 1];
    for i in 1..=n {
        curr[0] = i as f32;
        for j in 1..=m {
            let cost = phoneme_cost(&pattern[i - 1], &window[j - 1]);
            curr[j] = (prev[j] + 1.0)
                .min(curr[j - 1] + 1.0)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[m]
}
