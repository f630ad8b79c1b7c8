//! Phonetic primitives for the hotword correction engine
//!
//! This crate turns raw transcript text into comparable phoneme sequences and
//! scores them:
//! - **Phonemizer**: unified Chinese syllable decomposition and Latin/digit
//!   tokenization, with byte offsets back into the source text
//! - **Cost model**: confusable-pair aware substitution costs shared by every
//!   alignment below
//! - **Alignment**: free-substring weighted edit distance (with and without
//!   traceback) and an anchored variant for fixed windows
//! - **Diff**: word-boundary tokenizer and LCS opcode diff used to mine
//!   correction-history fragments

pub mod align;
pub mod cost;
pub mod diff;
pub mod phonemizer;

pub use align::{anchored_distance, best_match, substring_distance, substring_score, BestMatch};
pub use cost::{lcs_len, phoneme_cost};
pub use diff::{diff_ops, word_spans, DiffOp, OpSpan};
pub use phonemizer::Phonemizer;
