//! Text to phoneme-sequence conversion
//!
//! One scanner handles mixed Chinese/Latin/digit input. Chinese characters
//! decompose into (initial, final, tone) triples sharing the character's byte
//! span; Latin and digit runs split on camel-case and letter/digit boundaries
//! and case-fold, so `CapsWriter`, `caps writer` and `caps-writer` all produce
//! the same phoneme values. Punctuation and whitespace emit nothing but end
//! the current run.

use hotword_core::{Lang, Phoneme};

/// Chinese syllable initials, longest first so `zh`/`ch`/`sh` win over `z`/`c`/`s`
const INITIALS: &[&str] = &[
    "zh", "ch", "sh", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "r",
    "z", "c", "s", "y", "w",
];

/// Syllable decomposition backend, fixed at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    /// Decompose via the pinyin lookup tables
    #[cfg(feature = "pinyin")]
    Pinyin,
    /// Emit each Chinese character as a single self-contained phoneme
    CharFallback,
}

/// Converts text into a tagged phoneme sequence.
///
/// Pure and deterministic; construction picks the best available backend and
/// never fails at phonemize time.
#[derive(Debug, Clone)]
pub struct Phonemizer {
    backend: Backend,
    split_alnum: bool,
}

impl Phonemizer {
    /// Phonemizer with the best available backend and whole-token Latin output
    pub fn new() -> Self {
        #[cfg(feature = "pinyin")]
        let backend = Backend::Pinyin;
        #[cfg(not(feature = "pinyin"))]
        let backend = Backend::CharFallback;

        Self {
            backend,
            split_alnum: false,
        }
    }

    /// Phonemizer that treats every Chinese character as one opaque phoneme.
    /// Matching quality degrades but nothing fails.
    pub fn char_fallback() -> Self {
        Self {
            backend: Backend::CharFallback,
            split_alnum: false,
        }
    }

    /// Explode Latin/digit tokens into one phoneme per character, for
    /// finer-grained alignment of short fragments.
    pub fn with_split_alnum(mut self, split_alnum: bool) -> Self {
        self.split_alnum = split_alnum;
        self
    }

    /// Convert `text` into phonemes carrying byte offsets into `text`
    pub fn phonemize(&self, text: &str) -> Vec<Phoneme> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut out = Vec::with_capacity(chars.len());
        let mut i = 0;

        while i < chars.len() {
            let (byte, ch) = chars[i];
            if is_cjk(ch) {
                self.push_cjk(ch, byte, byte + ch.len_utf8(), &mut out);
                i += 1;
            } else if ch.is_ascii_alphanumeric() {
                let start = i;
                i += 1;
                while i < chars.len() {
                    let c = chars[i].1;
                    if !c.is_ascii_alphanumeric() || token_break(chars[i - 1].1, c) {
                        break;
                    }
                    i += 1;
                }
                self.push_alnum(text, &chars[start..i], &mut out);
            } else {
                // Separator: dropped, but it already terminated the runs above
                i += 1;
            }
        }
        out
    }

    fn push_alnum(&self, text: &str, run: &[(usize, char)], out: &mut Vec<Phoneme>) {
        let first = run[0].0;
        let last = run[run.len() - 1];
        let end = last.0 + last.1.len_utf8();
        let token: String = text[first..end].to_ascii_lowercase();
        let lang = if token.bytes().all(|b| b.is_ascii_digit()) {
            Lang::Num
        } else {
            Lang::En
        };

        if self.split_alnum {
            for (k, &(byte, ch)) in run.iter().enumerate() {
                out.push(Phoneme::new(
                    ch.to_ascii_lowercase().to_string(),
                    lang,
                    k == 0,
                    k == run.len() - 1,
                    byte,
                    byte + ch.len_utf8(),
                ));
            }
        } else {
            out.push(Phoneme::new(token, lang, true, true, first, end));
        }
    }

    fn push_cjk(&self, ch: char, start: usize, end: usize, out: &mut Vec<Phoneme>) {
        match self.backend {
            #[cfg(feature = "pinyin")]
            Backend::Pinyin => {
                if let Some((initial, final_, tone)) = decompose(ch) {
                    let has_initial = initial.is_some();
                    if let Some(initial) = initial {
                        out.push(Phoneme::new(initial, Lang::Zh, true, false, start, end));
                    }
                    out.push(Phoneme::new(final_, Lang::Zh, !has_initial, false, start, end));
                    out.push(Phoneme::new(
                        tone.to_string(),
                        Lang::Zh,
                        false,
                        true,
                        start,
                        end,
                    ));
                    return;
                }
                tracing::debug!("no pinyin reading for {ch:?}, keeping raw character");
            }
            Backend::CharFallback => {}
        }

        // The character is its own self-contained phoneme
        out.push(Phoneme::new(ch.to_string(), Lang::Zh, true, true, start, end));
    }
}

impl Default for Phonemizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Camel-case and letter/digit boundaries end a token
fn token_break(prev: char, next: char) -> bool {
    (prev.is_lowercase() && next.is_uppercase())
        || (prev.is_ascii_alphabetic() && next.is_ascii_digit())
        || (prev.is_ascii_digit() && next.is_ascii_alphabetic())
}

/// CJK Unified Ideographs block
pub fn is_cjk(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&ch)
}

/// Decompose one character into (initial, final, tone digit); neutral tone
/// maps to `5`, matching the convention of the confusable tables.
#[cfg(feature = "pinyin")]
fn decompose(ch: char) -> Option<(Option<String>, String, char)> {
    use pinyin::ToPinyin;

    let reading = ch.to_pinyin()?;
    let numbered = reading.with_tone_num_end();
    let (plain, tone) = match numbered.chars().last() {
        Some(d) if d.is_ascii_digit() => (&numbered[..numbered.len() - 1], d),
        _ => (numbered, '5'),
    };
    if plain.is_empty() {
        return None;
    }

    for &initial in INITIALS {
        if let Some(rest) = plain.strip_prefix(initial) {
            if !rest.is_empty() {
                return Some((Some(initial.to_string()), rest.to_string(), tone));
            }
        }
    }
    // Zero-initial syllable (an, e, er, ...)
    Some((None, plain.to_string(), tone))
}
