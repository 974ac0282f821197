//! Poisson binomial PMF by dynamic-programming convolution.
//!
//! Given per-die success probabilities p_1..p_n, `pbd_pmf` returns the exact
//! distribution of the number of successes. One die is folded in per step:
//!
//!   new[k] = pmf[k] * (1 - p) + pmf[k - 1] * p
//!
//! which is O(n^2) overall and numerically stable for the table sizes this
//! game reaches (at most 30 dice).

/// Exact PMF over 0..=n successes for independent trials with the given
/// per-trial probabilities. Probabilities are clamped into [0, 1].
pub fn pbd_pmf(probabilities: &[f64]) -> Vec<f64> {
    let mut pmf = vec![1.0];
    for &raw in probabilities {
        let p = raw.clamp(0.0, 1.0);
        let mut next = vec![0.0; pmf.len() + 1];
        for (k, &mass) in pmf.iter().enumerate() {
            next[k] += mass * (1.0 - p);
            next[k + 1] += mass * p;
        }
        pmf = next;
    }
    pmf
}

/// P(successes >= k) for a PMF produced by [`pbd_pmf`].
pub fn at_least(pmf: &[f64], k: usize) -> f64 {
    pmf.iter().skip(k).sum::<f64>().clamp(0.0, 1.0)
}

/// P(successes == k).
pub fn exactly(pmf: &[f64], k: usize) -> f64 {
    pmf.get(k).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_trial_set_is_certain_zero() {
        let pmf = pbd_pmf(&[]);
        assert_eq!(pmf, vec![1.0]);
        assert_eq!(at_least(&pmf, 0), 1.0);
        assert_eq!(at_least(&pmf, 1), 0.0);
    }

    #[test]
    fn two_fair_coins_give_the_binomial_quarters() {
        let pmf = pbd_pmf(&[0.5, 0.5]);
        assert!((pmf[0] - 0.25).abs() < 1e-12);
        assert!((pmf[1] - 0.5).abs() < 1e-12);
        assert!((pmf[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn mixed_probabilities_convolve_exactly() {
        // P(X >= 1) = 1 - (1 - 0.2)(1 - 0.5) = 0.6
        let pmf = pbd_pmf(&[0.2, 0.5]);
        assert!((at_least(&pmf, 1) - 0.6).abs() < 1e-12);
        assert!((exactly(&pmf, 2) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let pmf = pbd_pmf(&[1.5, -0.5]);
        assert!((exactly(&pmf, 1) - 1.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_pmf_has_length_n_plus_one_and_sums_to_one(
            probabilities in proptest::collection::vec(0.0f64..=1.0, 0..20)
        ) {
            let pmf = pbd_pmf(&probabilities);
            prop_assert_eq!(pmf.len(), probabilities.len() + 1);
            let total: f64 = pmf.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            prop_assert!(pmf.iter().all(|&m| m >= 0.0));
        }

        #[test]
        fn prop_at_least_is_monotone_non_increasing(
            probabilities in proptest::collection::vec(0.0f64..=1.0, 0..20)
        ) {
            let pmf = pbd_pmf(&probabilities);
            for k in 0..pmf.len() {
                prop_assert!(at_least(&pmf, k) + 1e-12 >= at_least(&pmf, k + 1));
            }
        }
    }
}
