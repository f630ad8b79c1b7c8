//! Word-level diff used to mine correction-history fragments
//!
//! Operates on word-boundary tokens, not phonemes, and deliberately does not
//! use the cost model: the goal is locating *which words changed* between a
//! wrong/right sentence pair, not scoring how similar they sound.

/// Byte spans of the word tokens in `text`: each CJK character is its own
/// token, Latin/digit runs split on camel-case boundaries.
pub fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (byte, ch) = chars[i];
        if crate::phonemizer::is_cjk(ch) {
            spans.push((byte, byte + ch.len_utf8()));
            i += 1;
        } else if ch.is_ascii_alphanumeric() {
            let start = byte;
            let mut prev_lower = ch.is_lowercase();
            i += 1;
            while i < chars.len() {
                let c = chars[i].1;
                if !c.is_ascii_alphanumeric() || crate::phonemizer::is_cjk(c) {
                    break;
                }
                if c.is_uppercase() && prev_lower {
                    break;
                }
                prev_lower = c.is_lowercase();
                i += 1;
            }
            let end = if i < chars.len() {
                chars[i].0
            } else {
                text.len()
            };
            spans.push((start, end));
        } else {
            i += 1;
        }
    }
    spans
}

/// Diff opcode kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One opcode span over two token sequences, half-open token index ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpSpan {
    pub op: DiffOp,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

/// LCS-based opcode diff between two token sequences.
///
/// Adjacent delete/insert runs merge into a single `Replace` span, mirroring
/// the classic opcode presentation.
pub fn diff_ops(a: &[&str], b: &[&str]) -> Vec<OpSpan> {
    let n = a.len();
    let m = b.len();

    // LCS table indexed from the suffix so the walk below is a forward scan
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < n || j < m {
        if i < n && j < m && a[i] == b[j] {
            let (ai, bj) = (i, j);
            while i < n && j < m && a[i] == b[j] {
                i += 1;
                j += 1;
            }
            ops.push(OpSpan {
                op: DiffOp::Equal,
                a_start: ai,
                a_end: i,
                b_start: bj,
                b_end: j,
            });
        } else {
            // Consume the run of non-matching tokens on both sides
            let (ai, bj) = (i, j);
            while i < n || j < m {
                if i < n && j < m && a[i] == b[j] {
                    break;
                }
                if i < n && (j >= m || lcs[i + 1][j] >= lcs[i][j + 1]) {
                    i += 1;
                } else {
                    j += 1;
                }
            }
            let op = match (ai < i, bj < j) {
                (true, true) => DiffOp::Replace,
                (true, false) => DiffOp::Delete,
                _ => DiffOp::Insert,
            };
            ops.push(OpSpan {
                op,
                a_start: ai,
                a_end: i,
                b_start: bj,
                b_end: j,
            });
        }
    }
    ops
}
