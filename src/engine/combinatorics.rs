//! Exact combination and hypergeometric-tail calculators
//!
//! These kernels back the pooling optimizer and the detection-power
//! estimator. Everything is computed in f64; lot and sample counts are
//! small enough that the multiplicative form stays exact to within
//! floating-point rounding.

/// Binomial coefficient C(n, r) computed via the multiplicative formula.
///
/// Returns 0 for `r > n` and 1 for `r == 0` or `r == n`. The running
/// product interleaves multiplication and division so intermediate values
/// stay far below the f64 overflow threshold for any coefficient that is
/// itself representable.
pub fn combination(n: u64, r: u64) -> f64 {
    if r > n {
        return 0.0;
    }
    if r == 0 || r == n {
        return 1.0;
    }
    // C(n, r) == C(n, n-r); use the smaller r
    let r = r.min(n - r);
    let mut result = 1.0_f64;
    for i in 1..=r {
        result *= (n - i + 1) as f64 / i as f64;
    }
    result
}

/// Probability of drawing at least one of `defectives` marked units when
/// sampling `sample` units without replacement from a lot of `lot` units.
///
/// Computed as the cumulative hypergeometric sum for x = 1..min(sample,
/// defectives). For lots large enough that C(lot, sample) overflows f64,
/// the sum is replaced by the algebraically identical complement of
/// drawing zero defectives, which only ever multiplies ratios < 1.
pub fn detection_probability(defectives: u64, sample: u64, lot: u64) -> f64 {
    if defectives == 0 || sample == 0 || lot == 0 {
        return 0.0;
    }
    let sample = sample.min(lot);

    let denominator = combination(lot, sample);
    if denominator.is_finite() {
        let upper = sample.min(defectives);
        let mut p_detect = 0.0_f64;
        for x in 1..=upper {
            let numerator =
                combination(defectives, x) * combination(lot - defectives, sample - x);
            p_detect += numerator / denominator;
        }
        p_detect.clamp(0.0, 1.0)
    } else {
        // P(X >= 1) = 1 - C(lot - defectives, sample) / C(lot, sample)
        //           = 1 - prod_{i=0}^{sample-1} (lot - defectives - i) / (lot - i)
        if lot - defectives < sample {
            return 1.0;
        }
        let mut p_zero = 1.0_f64;
        for i in 0..sample {
            p_zero *= (lot - defectives - i) as f64 / (lot - i) as f64;
        }
        (1.0 - p_zero).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_base_cases() {
        assert_eq!(combination(10, 0), 1.0);
        assert_eq!(combination(10, 10), 1.0);
        assert_eq!(combination(5, 7), 0.0);
    }

    #[test]
    fn test_combination_small_values() {
        assert_eq!(combination(5, 2), 10.0);
        assert_eq!(combination(10, 3), 120.0);
        assert_eq!(combination(52, 5), 2_598_960.0);
    }

    #[test]
    fn test_combination_symmetry() {
        assert!((combination(40, 7) - combination(40, 33)).abs() < 1e-6);
    }

    #[test]
    fn test_detection_probability_no_defectives() {
        assert_eq!(detection_probability(0, 20, 100), 0.0);
    }

    #[test]
    fn test_detection_probability_census() {
        // Sampling the whole lot always finds the defectives
        let p = detection_probability(5, 100, 100);
        assert!((p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_detection_probability_matches_complement() {
        // Small case checkable by hand: 2 defectives in 10, sample 3.
        // P(zero) = C(8,3)/C(10,3) = 56/120, so P(>=1) = 8/15.
        let p = detection_probability(2, 3, 10);
        assert!((p - 8.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_detection_probability_large_lot_is_finite() {
        // C(35001, 500) overflows f64; the complement path must keep
        // the result in [0, 1].
        let p = detection_probability(1750, 500, 35001);
        assert!(p.is_finite());
        assert!((0.0..=1.0).contains(&p));
        assert!(p > 0.99);
    }

    #[test]
    fn test_detection_probability_monotone_in_sample() {
        let p_small = detection_probability(25, 10, 500);
        let p_large = detection_probability(25, 40, 500);
        assert!(p_large > p_small);
    }
}
