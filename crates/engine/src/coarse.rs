//! Inverted-index candidate pre-filter
//!
//! Exhaustive alignment against every hotword is O(hotwords * n * m); with
//! thousands of entries that is too slow for interactive use. The coarse
//! index cuts the candidate set first with an inverted index over cheap
//! signatures, then ranks the bucket hits with the distance-only substring
//! DP and caps them. The window search with its boundary rules runs later,
//! on the survivors only.
//!
//! Signature construction mirrors the window-entry rules: a non-English
//! hotword can only ever match where its exact leading phoneme occurs, so
//! its signature is that value; English hotwords may start fuzzily, so their
//! first two tokens are posted under character bigrams, which survive the
//! dropped/merged letters typical of misrecognized English.

use hotword_core::Phoneme;
use hotword_phonetic::substring_score;
use std::collections::{HashMap, HashSet};

struct CoarseEntry {
    word: String,
    phonemes: Vec<Phoneme>,
}

/// Inverted index over hotword phoneme signatures
pub struct CoarseIndex {
    postings: HashMap<String, Vec<u32>>,
    entries: Vec<CoarseEntry>,
    threshold: f32,
    length_slack: usize,
}

impl CoarseIndex {
    /// Build from precomputed hotword phoneme sequences.
    ///
    /// `threshold` must sit at or below the engine's similar threshold or the
    /// filter starts dropping true matches.
    pub fn build<'a, I>(hotwords: I, threshold: f32, length_slack: usize) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Phoneme])>,
    {
        let mut postings: HashMap<String, Vec<u32>> = HashMap::new();
        let mut entries = Vec::new();

        for (word, phonemes) in hotwords {
            if phonemes.is_empty() {
                continue;
            }
            let entry_id = entries.len() as u32;
            let mut keys = Vec::new();
            signature_keys(phonemes, &mut keys);
            keys.sort_unstable();
            keys.dedup();
            for key in keys {
                postings.entry(key).or_default().push(entry_id);
            }
            entries.push(CoarseEntry {
                word: word.to_string(),
                phonemes: phonemes.to_vec(),
            });
        }

        Self {
            postings,
            entries,
            threshold,
            length_slack,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate hotwords for `input`, best coarse score first, capped at
    /// `top_k`. A superset (modulo the cap) of everything the window search
    /// can accept above the engine's similar threshold.
    pub fn search(&self, input: &[Phoneme], top_k: usize) -> Vec<(&str, f32)> {
        if input.is_empty() || self.entries.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut keys = Vec::new();
        for phoneme in input {
            query_keys(phoneme, &mut keys);
        }
        keys.sort_unstable();
        keys.dedup();

        let mut candidate_ids: Vec<u32> = keys
            .iter()
            .filter_map(|key| self.postings.get(key))
            .flatten()
            .copied()
            .collect();
        candidate_ids.sort_unstable();
        candidate_ids.dedup();

        let ids = candidate_ids.into_iter().map(|id| id as usize);
        self.rescore(input, ids, top_k)
    }

    /// Linear scan over every entry with the same scoring and cap; the
    /// reference the inverted index is validated against.
    pub fn exhaustive_search(&self, input: &[Phoneme], top_k: usize) -> Vec<(&str, f32)> {
        if input.is_empty() || self.entries.is_empty() || top_k == 0 {
            return Vec::new();
        }
        self.rescore(input, 0..self.entries.len(), top_k)
    }

    fn rescore(
        &self,
        input: &[Phoneme],
        ids: impl Iterator<Item = usize>,
        top_k: usize,
    ) -> Vec<(&str, f32)> {
        let mut results: Vec<(&str, f32)> = Vec::new();
        for id in ids {
            let entry = &self.entries[id];
            if entry.phonemes.len() > input.len() + self.length_slack {
                continue;
            }
            let score = substring_score(input, &entry.phonemes);
            if score >= self.threshold {
                results.push((entry.word.as_str(), score));
            }
        }
        results.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        results.truncate(top_k);
        results
    }
}

/// Build-time signature keys for one hotword
fn signature_keys(phonemes: &[Phoneme], keys: &mut Vec<String>) {
    let head = &phonemes[0];
    if head.is_english() {
        for phoneme in phonemes.iter().take(2).filter(|p| p.is_english()) {
            push_bigrams(&phoneme.value, keys);
        }
    } else {
        keys.push(head.value.clone());
    }
}

/// Query-time keys for one input phoneme
fn query_keys(phoneme: &Phoneme, keys: &mut Vec<String>) {
    if phoneme.is_english() {
        push_bigrams(&phoneme.value, keys);
    } else {
        keys.push(phoneme.value.clone());
    }
}

/// Character bigrams of a token; single-character tokens post as themselves
fn push_bigrams(value: &str, keys: &mut Vec<String>) {
    let bytes = value.as_bytes();
    if bytes.len() < 2 {
        keys.push(value.to_string());
        return;
    }
    let mut seen = HashSet::new();
    for pair in bytes.windows(2) {
        if seen.insert(pair) {
            // Token values are ASCII by construction
            keys.push(String::from_utf8_lossy(pair).into_owned());
        }
    }
}
