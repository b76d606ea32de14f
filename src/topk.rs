//! Ranking utilities.

use ordered_float::NotNan;
use std::cmp::Reverse;

/// All `(index, score)` pairs sorted by descending score; ties keep ascending index order.
///
/// Non-finite scores sort last.
pub fn rank_descending(scores: &[f64]) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by_key(|&(i, s)| {
        let key = if s.is_finite() { NotNan::new(s).ok() } else { None };
        (Reverse(key), i)
    });
    ranked
}

/// Min-max normalize in place to `[0, 1]`.
///
/// A constant vector (`max == min`) normalizes to all zeros.
pub fn min_max_normalize(scores: &mut [f64]) {
    let (min, max) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        scores.fill(0.0);
        return;
    }
    for s in scores {
        *s = (*s - min) / span;
    }
}
