//! Hotword correction over finalized transcripts
//!
//! Pipeline per call: phonemize the input, pull candidates from the coarse
//! index, score boundary-respecting windows with the exact cost model,
//! resolve overlaps greedily and rewrite the text back to front.
//!
//! The hotword corpus lives in an immutable snapshot behind a read/write
//! lock; `correct` clones the `Arc` and works lock-free from there, so a
//! concurrent reload only ever costs readers the pointer swap.

use crate::coarse::CoarseIndex;
use hotword_core::{CorrectionResult, CorrectorConfig, Lang, MatchResult, Phoneme};
use hotword_phonetic::{anchored_distance, Phonemizer};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

struct Snapshot {
    hotwords: HashMap<String, Vec<Phoneme>>,
    coarse: CoarseIndex,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            hotwords: HashMap::new(),
            coarse: CoarseIndex::build(std::iter::empty(), 0.0, 0),
        }
    }
}

/// Fuzzy hotword substitution engine
pub struct CorrectionEngine {
    config: CorrectorConfig,
    phonemizer: Phonemizer,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl CorrectionEngine {
    pub fn new(config: CorrectorConfig) -> Self {
        Self::with_phonemizer(config, Phonemizer::new())
    }

    /// Use a specific phonemizer, e.g. the char fallback
    pub fn with_phonemizer(config: CorrectorConfig, phonemizer: Phonemizer) -> Self {
        Self {
            config,
            phonemizer,
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
        }
    }

    /// Replace the hotword corpus from file content (one hotword per
    /// non-empty, non-`#` line). Returns the number of entries loaded; the
    /// new snapshot is published atomically.
    pub fn update_hotwords(&self, text: &str) -> usize {
        let mut hotwords: HashMap<String, Vec<Phoneme>> = HashMap::new();
        for line in text.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            let phonemes = self.phonemizer.phonemize(word);
            if !phonemes.is_empty() {
                hotwords.insert(word.to_string(), phonemes);
            }
        }

        let coarse = CoarseIndex::build(
            hotwords.iter().map(|(w, p)| (w.as_str(), p.as_slice())),
            self.config.coarse_threshold(),
            self.config.length_slack,
        );
        let count = hotwords.len();

        *self.snapshot.write() = Arc::new(Snapshot { hotwords, coarse });
        tracing::debug!(count, "hotword corpus updated");
        count
    }

    /// Number of hotwords in the active snapshot
    pub fn hotword_count(&self) -> usize {
        self.snapshot.read().hotwords.len()
    }

    /// Correct `text`, returning the rewritten text, the substitutions that
    /// were applied, and up to `k` similar hotwords as soft context.
    pub fn correct(&self, text: &str, k: usize) -> CorrectionResult {
        let snapshot = self.snapshot.read().clone();
        if text.is_empty() || snapshot.hotwords.is_empty() {
            return CorrectionResult::unchanged(text);
        }
        let input = self.phonemizer.phonemize(text);
        if input.is_empty() {
            return CorrectionResult::unchanged(text);
        }

        let candidates = snapshot.coarse.search(&input, self.config.top_k_candidates);
        let mut matches: Vec<MatchResult> = Vec::new();
        let mut best_similar: HashMap<&str, f32> = HashMap::new();

        for (hotword, _coarse_score) in candidates {
            let pattern = snapshot.hotwords[hotword].as_slice();
            if pattern.len() > input.len() + self.config.length_slack {
                continue;
            }
            self.scan_windows(&input, hotword, pattern, &mut matches, &mut best_similar);
        }

        let similars = ranked_similars(best_similar, k);
        let accepted = resolve_overlaps(text, matches);
        let (corrected, applied) = apply_substitutions(text, accepted);

        CorrectionResult {
            text: corrected,
            matches: applied,
            similars,
        }
    }

    /// Slide a pattern-length window across the input and score every
    /// position that respects syllable/word boundaries.
    fn scan_windows<'s>(
        &self,
        input: &[Phoneme],
        hotword: &'s str,
        pattern: &[Phoneme],
        matches: &mut Vec<MatchResult>,
        best_similar: &mut HashMap<&'s str, f32>,
    ) {
        let n = pattern.len();
        let similar_threshold = self.config.similar_threshold();

        for start in 0..input.len() {
            if !window_start_ok(pattern, &input[start]) {
                continue;
            }
            let mut end = (start + n).min(input.len());
            if !input[end - 1].word_end {
                // One-phoneme lookahead: swallow a trailing tone marker
                if end < input.len() && input[end].is_tone() && input[end].word_end {
                    end += 1;
                } else {
                    continue;
                }
            }

            let dist = anchored_distance(pattern, &input[start..end]);
            let score = 1.0 - dist / n as f32;
            if score < similar_threshold {
                continue;
            }

            best_similar
                .entry(hotword)
                .and_modify(|s| *s = s.max(score))
                .or_insert(score);

            if score >= self.config.threshold {
                matches.push(MatchResult {
                    start: input[start].char_start,
                    end: input[end - 1].char_end,
                    score,
                    hotword: hotword.to_string(),
                });
            }
        }
    }
}

/// Window entry rule: always a word start; non-English hotwords additionally
/// need their exact first phoneme, English ones may start fuzzily.
fn window_start_ok(pattern: &[Phoneme], first: &Phoneme) -> bool {
    if !first.word_start {
        return false;
    }
    let head = &pattern[0];
    if head.lang == Lang::En {
        return true;
    }
    head.lang == first.lang && head.value == first.value
}

fn ranked_similars(best_similar: HashMap<&str, f32>, k: usize) -> Vec<(String, f32)> {
    let mut similars: Vec<(String, f32)> = best_similar
        .into_iter()
        .map(|(w, s)| (w.to_string(), s))
        .collect();
    similars.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    similars.truncate(k);
    similars
}

/// Greedy interval scheduling: best score first, longer spans break ties; a
/// span whose surface text already equals its hotword still occupies the
/// interval but produces no substitution.
fn resolve_overlaps(text: &str, mut matches: Vec<MatchResult>) -> Vec<MatchResult> {
    matches.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
    });

    let mut occupied: Vec<(usize, usize)> = Vec::new();
    let mut accepted = Vec::new();
    for m in matches {
        if occupied.iter().any(|&(s, e)| m.overlaps(s, e)) {
            continue;
        }
        occupied.push((m.start, m.end));
        if &text[m.start..m.end] != m.hotword {
            accepted.push(m);
        }
    }
    accepted
}

/// Splice accepted substitutions back to front so earlier offsets stay valid
fn apply_substitutions(text: &str, mut accepted: Vec<MatchResult>) -> (String, Vec<(String, f32)>) {
    accepted.sort_by(|a, b| b.start.cmp(&a.start));

    let mut corrected = text.to_string();
    for m in &accepted {
        tracing::info!(
            from = &text[m.start..m.end],
            to = m.hotword.as_str(),
            score = m.score,
            "hotword substitution"
        );
        corrected.replace_range(m.start..m.end, &m.hotword);
    }

    // Report in reading order
    accepted.reverse();
    let applied = accepted
        .into_iter()
        .map(|m| (m.hotword, m.score))
        .collect();
    (corrected, applied)
}
