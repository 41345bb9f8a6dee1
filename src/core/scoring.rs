use crate::models::ScoreNormalization;

/// Calculate the bid score of a (proposer, receiver) pair
///
/// Scoring formula:
/// score = sqrt(proposer_weight * receiver_weight)
///     * (budget / budget_max)          # richer proposers bid higher
///     / (capacity / capacity_max)      # busier receivers are cheaper to win
///     * 10
///
/// Weights must be non-negative and capacity positive; both are checked
/// when the market is built.
#[inline]
pub fn calculate_bid_score(
    proposer_weight: i64,
    receiver_weight: i64,
    budget: f64,
    capacity: f64,
    normalization: &ScoreNormalization,
) -> f64 {
    let mutual = (proposer_weight as f64 * receiver_weight as f64).sqrt();
    let budget_factor = budget / normalization.budget_max;
    let capacity_factor = capacity / normalization.capacity_max;

    mutual * budget_factor / capacity_factor * 10.0
}

/// Calculate the satisfaction of a matched proposer
///
/// (proposer_weight + receiver_weight) / market_size * 100, where
/// `market_size` is the total number of participants on both sides.
#[inline]
pub fn calculate_satisfaction(proposer_weight: i64, receiver_weight: i64, market_size: usize) -> f64 {
    if market_size == 0 {
        return 0.0;
    }

    (proposer_weight as f64 + receiver_weight as f64) / market_size as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_bid_score() {
        // sqrt(4 * 9) = 6; budget 1500/1500 = 1; capacity 100/100 = 1
        let score = calculate_bid_score(4, 9, 1500.0, 100.0, &ScoreNormalization::default());
        assert!((score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_and_capacity_scale_score() {
        let norm = ScoreNormalization::default();
        let base = calculate_bid_score(5, 5, 750.0, 50.0, &norm);
        let richer = calculate_bid_score(5, 5, 1500.0, 50.0, &norm);
        let busier = calculate_bid_score(5, 5, 750.0, 100.0, &norm);

        assert!((richer - 2.0 * base).abs() < 1e-9);
        assert!((busier - base / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_scores_zero() {
        let score = calculate_bid_score(0, 10, 1000.0, 80.0, &ScoreNormalization::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_normalization_keeps_relative_order() {
        let reference = ScoreNormalization::default();
        let custom = ScoreNormalization {
            budget_max: 300.0,
            capacity_max: 7.0,
        };

        let a = (
            calculate_bid_score(3, 8, 900.0, 40.0, &reference),
            calculate_bid_score(3, 8, 900.0, 40.0, &custom),
        );
        let b = (
            calculate_bid_score(6, 6, 700.0, 60.0, &reference),
            calculate_bid_score(6, 6, 700.0, 60.0, &custom),
        );

        assert_eq!(a.0 > b.0, a.1 > b.1);
    }

    #[test]
    fn test_satisfaction() {
        // (7 + 9) / (8 + 10) * 100
        let s = calculate_satisfaction(7, 9, 18);
        assert!((s - 88.888_888_888).abs() < 1e-6);
        assert_eq!(calculate_satisfaction(7, 9, 0), 0.0);
    }

    #[test]
    fn test_satisfaction_with_extreme_weights() {
        let s = calculate_satisfaction(i64::MAX, i64::MAX, 2);
        assert!(s.is_finite());
        assert!((s - i64::MAX as f64 * 100.0).abs() / s < 1e-12);
    }
}
