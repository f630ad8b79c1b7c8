//! Correction-history retrieval
//!
//! Mines wrong/right sentence pairs for the word spans that actually changed,
//! widens spans too short to be phonetically selective, and retrieves the
//! records whose fragments sound like part of the query. Fully independent of
//! the hotword corpus: this feeds a downstream language model, it never
//! rewrites text itself.

use hotword_core::{RectifyConfig, RectifyRecord};
use hotword_phonetic::{diff_ops, substring_score, word_spans, DiffOp, Phonemizer};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Retrieval index over wrong/right correction records
pub struct RectificationIndex {
    config: RectifyConfig,
    phonemizer: Phonemizer,
    records: RwLock<Arc<Vec<RectifyRecord>>>,
}

impl RectificationIndex {
    pub fn new(config: RectifyConfig) -> Self {
        // Exploded Latin tokens: history fragments are often short English
        // spans where per-character alignment discriminates better.
        let phonemizer = Phonemizer::new().with_split_alnum(true);
        Self {
            config,
            phonemizer,
            records: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Rebuild the record set from file content: blocks separated by a `---`
    /// line, first non-comment line wrong, second right, extras ignored.
    /// Returns the number of records loaded.
    pub fn update_history(&self, text: &str) -> usize {
        let mut records = Vec::new();
        for (wrong, right) in parse_blocks(text) {
            let fragments = self.extract_fragments(&wrong, &right);
            let fragment_phonemes: HashMap<_, _> = fragments
                .iter()
                .map(|f| (f.clone(), self.phonemizer.phonemize(f)))
                .collect();
            records.push(RectifyRecord {
                wrong,
                right,
                fragments,
                fragment_phonemes,
            });
        }

        let count = records.len();
        *self.records.write() = Arc::new(records);
        tracing::debug!(count, "rectification history updated");
        count
    }

    pub fn record_count(&self) -> usize {
        self.records.read().len()
    }

    /// Records whose fragments best match `text`, scored by the maximum
    /// free-substring score over the record's fragments, top-k descending.
    pub fn search(&self, text: &str, top_k: usize) -> Vec<(String, String, f32)> {
        let records = self.records.read().clone();
        if records.is_empty() || text.is_empty() || top_k == 0 {
            return Vec::new();
        }
        let input = self.phonemizer.phonemize(text);
        if input.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<(String, String, f32)> = Vec::new();
        for record in records.iter() {
            let best = record
                .fragment_phonemes
                .values()
                .filter(|phonemes| !phonemes.is_empty())
                .map(|phonemes| substring_score(&input, phonemes))
                .fold(0.0f32, f32::max);
            if best >= self.config.threshold {
                results.push((record.wrong.clone(), record.right.clone(), best));
            }
        }

        results.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        results.truncate(top_k);
        results
    }

    /// Differing word spans between `wrong` and `right`: replace/delete runs
    /// on the wrong side, replace/insert runs on the right side, each widened
    /// to the minimum phoneme count. Falls back to the whole wrong line when
    /// the diff finds nothing usable.
    fn extract_fragments(&self, wrong: &str, right: &str) -> Vec<String> {
        let wrong_spans = word_spans(wrong);
        let right_spans = word_spans(right);
        let wrong_tokens: Vec<&str> = wrong_spans.iter().map(|&(s, e)| &wrong[s..e]).collect();
        let right_tokens: Vec<&str> = right_spans.iter().map(|&(s, e)| &right[s..e]).collect();

        let mut fragments: Vec<String> = Vec::new();
        let mut push_unique = |fragment: String| {
            if !fragment.is_empty() && !fragments.contains(&fragment) {
                fragments.push(fragment);
            }
        };

        for op in diff_ops(&wrong_tokens, &right_tokens) {
            if matches!(op.op, DiffOp::Replace | DiffOp::Delete) && op.a_end > op.a_start {
                let (lo, hi) = self.widen(wrong, &wrong_spans, op.a_start, op.a_end);
                push_unique(wrong[wrong_spans[lo].0..wrong_spans[hi - 1].1].to_string());
            }
            if matches!(op.op, DiffOp::Replace | DiffOp::Insert) && op.b_end > op.b_start {
                let (lo, hi) = self.widen(right, &right_spans, op.b_start, op.b_end);
                push_unique(right[right_spans[lo].0..right_spans[hi - 1].1].to_string());
            }
        }

        if fragments.is_empty() {
            fragments.push(wrong.to_string());
        }
        fragments
    }

    /// Grow a token range by neighboring words, alternating left then right,
    /// until the fragment carries at least `min_fragment_phonemes` phonemes.
    fn widen(
        &self,
        text: &str,
        spans: &[(usize, usize)],
        mut lo: usize,
        mut hi: usize,
    ) -> (usize, usize) {
        let mut prefer_left = true;
        loop {
            let fragment = &text[spans[lo].0..spans[hi - 1].1];
            if self.phonemizer.phonemize(fragment).len() >= self.config.min_fragment_phonemes {
                break;
            }
            if prefer_left && lo > 0 {
                lo -= 1;
            } else if hi < spans.len() {
                hi += 1;
            } else if lo > 0 {
                lo -= 1;
            } else {
                break;
            }
            prefer_left = !prefer_left;
        }
        (lo, hi)
    }
}

/// Split history file content into (wrong, right) pairs
fn parse_blocks(text: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for block in text.split('\n').collect::<Vec<_>>().split(|line| line.trim() == "---") {
        let lines: Vec<&str> = block
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        if lines.len() >= 2 {
            pairs.push((lines[0].to_string(), lines[1].to_string()));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_fixture() -> RectificationIndex {
        let index = RectificationIndex::new(RectifyConfig::default());
        index.update_history(
            "# history\n原锯子不对\n原句子不对\n---\ncloud code is good\nClaude Code is good\n---\n# short block ignored\n只有一行\n",
        );
        index
    }

    #[test]
    fn test_parse_blocks() {
        let pairs = parse_blocks("a\nb\nextra ignored\n---\n# note\nc\nd\n");
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("c".to_string(), "d".to_string())
            ]
        );
    }

    #[test]
    fn test_load_counts() {
        let index = test_fixture();
        assert_eq!(index.record_count(), 2);
    }

    #[test]
    fn test_fragments_cover_differing_span() {
        let index = test_fixture();
        let records = index.records.read().clone();
        let record = records.iter().find(|r| r.wrong.contains("锯")).unwrap();
        // The single-character diff was widened past the minimum phoneme count
        assert!(record.fragments.iter().any(|f| f.contains("锯")));
        assert!(record.fragments.iter().any(|f| f.contains("句")));
        for fragment in &record.fragments {
            assert!(index.phonemizer.phonemize(fragment).len() >= 4, "{fragment}");
        }
    }

    #[test]
    fn test_search_finds_chinese_record() {
        let index = test_fixture();
        let results = index.search("这个原锯子写错了", 5);
        assert!(!results.is_empty());
        let (wrong, right, score) = &results[0];
        assert_eq!(wrong, "原锯子不对");
        assert_eq!(right, "原句子不对");
        assert!(*score >= 0.5, "score {score}");
    }

    #[test]
    fn test_search_finds_english_record() {
        let index = test_fixture();
        let results = index.search("我很喜欢 cloud", 5);
        assert!(results.iter().any(|(w, _, _)| w.contains("cloud")));
    }

    #[test]
    fn test_search_respects_threshold_and_k() {
        let index = test_fixture();
        assert!(index.search("天气很好", 5).is_empty());
        assert!(index.search("这个原锯子写错了", 0).is_empty());
    }

    #[test]
    fn test_whole_line_fallback_fragment() {
        let index = RectificationIndex::new(RectifyConfig::default());
        // Identical pair: diff yields nothing, whole wrong line indexes
        index.update_history("同样的句子\n同样的句子\n");
        let records = index.records.read().clone();
        assert_eq!(records[0].fragments, vec!["同样的句子".to_string()]);
    }

    #[test]
    fn test_reload_replaces_records() {
        let index = test_fixture();
        assert_eq!(index.record_count(), 2);
        let count = index.update_history("新的错误\n新的正确\n");
        assert_eq!(count, 1);
        assert_eq!(index.record_count(), 1);
    }
}
