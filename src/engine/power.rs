//! Hypergeometric detection-power estimator

use crate::engine::combinatorics::detection_probability;

/// Probability (integer percent, capped at 99) of detecting at least one
/// defective unit when drawing `sample_size` units without replacement
/// from a lot assumed to contain `floor(lot_size * defect_rate)`
/// defectives.
///
/// A lot too small to hold a single defective at the given rate reports
/// zero power. Power is never reported as 100%; acceptance sampling can
/// not certify a lot.
pub fn power(sample_size: u32, lot_size: u32, defect_rate: f64) -> u8 {
    let defectives = (lot_size as f64 * defect_rate).floor() as u64;
    if defectives == 0 {
        return 0;
    }
    let p = detection_probability(defectives, sample_size as u64, lot_size as u64);
    ((p * 100.0).round() as u8).min(99)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combinatorics::combination;

    #[test]
    fn test_power_zero_when_no_defectives_fit() {
        // floor(10 * 0.05) = 0
        assert_eq!(power(5, 10, 0.05), 0);
    }

    #[test]
    fn test_power_capped_at_99() {
        // Sampling most of a large lot is near-certain detection
        assert_eq!(power(450, 500, 0.05), 99);
    }

    #[test]
    fn test_power_in_bounds_across_sizes() {
        for (n, lot) in [(2, 50), (8, 200), (20, 5000), (125, 2000), (500, 40000)] {
            let p = power(n, lot, 0.05);
            assert!(p <= 99, "power({n},{lot}) = {p}");
        }
    }

    #[test]
    fn test_power_matches_direct_summation() {
        // Direct hypergeometric sum for sample 20, lot 5000, rate 0.05
        let (n, lot) = (20_u64, 5000_u64);
        let k = (lot as f64 * 0.05).floor() as u64;
        let denom = combination(lot, n);
        let mut p_detect = 0.0;
        for x in 1..=n.min(k) {
            p_detect += combination(k, x) * combination(lot - k, n - x) / denom;
        }
        let expected = ((p_detect * 100.0).round() as u8).min(99);
        assert_eq!(power(20, 5000, 0.05), expected);
    }

    #[test]
    fn test_power_monotone_in_sample_size() {
        let lot = 1200;
        let mut last = 0;
        for n in [2, 8, 20, 50, 80] {
            let p = power(n, lot, 0.05);
            assert!(p >= last);
            last = p;
        }
    }
}
