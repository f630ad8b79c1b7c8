//! Phoneme data model and result types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Language class of a phoneme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Chinese syllable component (initial, final or tone digit)
    Zh,
    /// Latin-letter token
    En,
    /// Pure-digit token
    Num,
    /// Anything else the phonemizer chose to keep
    Other,
}

/// The smallest comparable unit of the matching engine.
///
/// A Chinese character decomposes into up to three phonemes (initial, final,
/// tone) which all carry the byte span of the source character; a Latin or
/// digit token is a single phoneme spanning its whole run. `char_start` and
/// `char_end` are byte offsets into the original text and always fall on
/// `char` boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phoneme {
    pub value: String,
    pub lang: Lang,
    /// Marks a syllable or word boundary on the left
    pub word_start: bool,
    /// Marks a syllable or word boundary on the right
    pub word_end: bool,
    pub char_start: usize,
    pub char_end: usize,
}

impl Phoneme {
    pub fn new(
        value: impl Into<String>,
        lang: Lang,
        word_start: bool,
        word_end: bool,
        char_start: usize,
        char_end: usize,
    ) -> Self {
        Self {
            value: value.into(),
            lang,
            word_start,
            word_end,
            char_start,
            char_end,
        }
    }

    /// Whether this phoneme is a Chinese tone marker (`1`..`5`)
    pub fn is_tone(&self) -> bool {
        self.lang == Lang::Zh
            && self.value.len() == 1
            && self.value.as_bytes()[0].is_ascii_digit()
    }

    pub fn is_english(&self) -> bool {
        self.lang == Lang::En
    }
}

/// A located hotword match, byte offsets into the original text
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub start: usize,
    pub end: usize,
    pub score: f32,
    pub hotword: String,
}

impl MatchResult {
    /// Half-open interval intersection test
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        !(self.end <= start || self.start >= end)
    }
}

/// Outcome of a correction pass.
///
/// `matches` are the substitutions actually applied; `similars` are
/// sub-threshold candidates surfaced as soft context for a downstream
/// language model, deduplicated by hotword and sorted by score descending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub text: String,
    pub matches: Vec<(String, f32)>,
    pub similars: Vec<(String, f32)>,
}

impl CorrectionResult {
    /// A pass-through result for inputs nothing matched against
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            matches: Vec::new(),
            similars: Vec::new(),
        }
    }
}

/// One wrong/right pair mined from the correction-history file.
///
/// `fragments` are the minimal differing spans between `wrong` and `right`
/// (widened to a minimum phoneme count); `fragment_phonemes` holds their
/// precomputed phoneme sequences, rebuilt wholesale on reload.
#[derive(Debug, Clone)]
pub struct RectifyRecord {
    pub wrong: String,
    pub right: String,
    pub fragments: Vec<String>,
    pub fragment_phonemes: HashMap<String, Vec<Phoneme>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_detection() {
        let tone = Phoneme::new("3", Lang::Zh, false, true, 0, 3);
        assert!(tone.is_tone());

        let final_ = Phoneme::new("ang", Lang::Zh, false, false, 0, 3);
        assert!(!final_.is_tone());

        // A digit token is Num, not a tone
        let num = Phoneme::new("7", Lang::Num, true, true, 0, 1);
        assert!(!num.is_tone());
    }

    #[test]
    fn test_match_overlap() {
        let m = MatchResult {
            start: 3,
            end: 6,
            score: 0.9,
            hotword: "abc".to_string(),
        };
        assert!(m.overlaps(5, 8));
        assert!(m.overlaps(0, 4));
        assert!(!m.overlaps(6, 9));
        assert!(!m.overlaps(0, 3));
    }

    #[test]
    fn test_correction_result_serializes() {
        let result = CorrectionResult {
            text: "科大讯飞".to_string(),
            matches: vec![("科大讯飞".to_string(), 0.92)],
            similars: vec![],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("科大讯飞"));
    }
}
