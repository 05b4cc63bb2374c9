//! Popularity score and confidence derivation from raw game counts.

use crate::opening::MAX_POPULARITY_SCORE;

/// Confidence in a position's statistics, discretized by sample size.
pub fn confidence_for_games(games: u64) -> f64 {
    match games {
        0 => 0.0,
        1..=9 => 0.4,
        10..=99 => 0.6,
        100..=999 => 0.8,
        _ => 1.0,
    }
}

/// Decile thresholds over the positive game counts.
///
/// Returns ten thresholds (10%, 20%, ..., 100%) taken from the sorted counts,
/// or an empty vector when no count is positive.
pub fn decile_thresholds(counts: impl IntoIterator<Item = u64>) -> Vec<u64> {
    let mut counts: Vec<u64> = counts.into_iter().filter(|&c| c > 0).collect();
    if counts.is_empty() {
        return Vec::new();
    }
    counts.sort_unstable();

    let n = counts.len();
    (1..=10)
        .map(|i| {
            let index = (i * n / 10).saturating_sub(1);
            counts[index]
        })
        .collect()
}

/// Decile popularity score (1-10) for `games`, 0 when there are no games.
pub fn score_for_games(games: u64, thresholds: &[u64]) -> u8 {
    if games == 0 {
        return 0;
    }
    let below = thresholds.iter().take_while(|&&t| games > t).count();
    (1 + below as u8).min(MAX_POPULARITY_SCORE)
}
