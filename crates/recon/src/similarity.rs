//! Text similarity and verdict classification.
//!
//! The ratio is `2 * M / (len(a) + len(b))` where `M` counts characters in the
//! matching blocks found by repeatedly taking the longest common substring and
//! recursing on the unmatched pieces either side of it. Lengths are in Unicode
//! scalar values.

use crate::model::Verdict;

/// Lower bound (inclusive) of the high-confidence band.
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Lower bound (inclusive) of the needs-review band.
pub const NEEDS_REVIEW: f64 = 0.5;

/// What the comparison side holds for one (record, language) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Text(&'a str),
    /// The record has no comparison row.
    MissingRow,
    /// The comparison table has no column for the language.
    MissingColumn,
}

/// Classify one cell. Missing targets carry no score.
pub fn classify(source: &str, target: Target<'_>) -> (Option<f64>, Verdict) {
    let target = match target {
        Target::Text(text) => text,
        Target::MissingRow => return (None, Verdict::MissingRow),
        Target::MissingColumn => return (None, Verdict::MissingColumn),
    };

    let score = similarity_ratio(source, target);
    (Some(score), verdict_for(score))
}

/// Map a score onto its band.
pub fn verdict_for(score: f64) -> Verdict {
    if score >= 1.0 {
        Verdict::ExactMatch
    } else if score >= HIGH_CONFIDENCE {
        Verdict::HighConfidence
    } else if score >= NEEDS_REVIEW {
        Verdict::NeedsReview
    } else {
        Verdict::Mismatch
    }
}

/// Similarity of the trimmed strings in `[0, 1]`. Symmetric in its arguments.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = a.trim();
    let b = b.trim();
    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    // Tie-breaking in the block search depends on argument order, so the
    // larger of the two directions is used.
    let matched = matched_chars(&a, &b).max(matched_chars(&b, &a));
    (2 * matched) as f64 / total as f64
}

/// Total length of the matching blocks between `a` and `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, len) = longest_match(a, b, alo, ahi, blo, bhi);
        if len == 0 {
            continue;
        }
        matched += len;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + len < ahi && j + len < bhi {
            pending.push((i + len, ahi, j + len, bhi));
        }
    }

    matched
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(start_a, start_b, len)`. Among equally long blocks the one starting
/// earliest in `a` wins, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

    for i in alo..ahi {
        curr[0] = 0;
        for j in blo..bhi {
            let k = j - blo + 1;
            if a[i] == b[j] {
                curr[k] = prev[k - 1] + 1;
                if curr[k] > best_len {
                    best_len = curr[k];
                    best_i = i + 1 - best_len;
                    best_j = j + 1 - best_len;
                }
            } else {
                curr[k] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_len)
}
