//! Uncertainty estimation over next-token distributions.
//!
//! Entropy here is computed over the reported top-K mass renormalized to 1,
//! not over the full vocabulary. That makes it a biased approximation of the
//! true Shannon entropy; the curiosity and importance thresholds downstream
//! are calibrated against this biased value, so it must not be "corrected".

use crate::constants::{EPSILON, TOP_LOGPROBS};
use crate::distribution::{self, TokenLogProbs};

/// Entropy of a sparse top-K log-probability map.
/// Empty input is defined as zero entropy, not an error.
pub fn entropy_from_logprobs(logprobs: &TokenLogProbs) -> f64 {
    shannon(distribution::normalize(logprobs).iter().map(|(_, p)| *p))
}

/// Entropy of a dense logits slice, restricted to its `top_k` largest
/// entries (ties broken arbitrarily). `top_k` of 0 or an empty slice is
/// defined as zero entropy.
pub fn entropy_from_logits(logits: &[f64], top_k: usize) -> f64 {
    let mut selected: Vec<f64> = logits.iter().copied().filter(|v| v.is_finite()).collect();
    if selected.is_empty() || top_k == 0 {
        return 0.0;
    }
    selected.sort_by(|a, b| b.total_cmp(a));
    selected.truncate(top_k);

    let max = selected[0];
    let exps: Vec<f64> = selected.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    shannon(exps.iter().map(|e| e / (sum + EPSILON)))
}

/// Same as [`entropy_from_logits`] with the default top-K.
pub fn entropy_from_full_logits(logits: &[f64]) -> f64 {
    entropy_from_logits(logits, TOP_LOGPROBS)
}

/// −Σ p·ln(p+ε), clamped to ≥ 0 (the ε guard can push a one-hot
/// distribution a hair below zero).
fn shannon(probs: impl Iterator<Item = f64>) -> f64 {
    let h: f64 = probs.map(|p| -p * (p + EPSILON).ln()).sum();
    h.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn uniform(n: usize) -> TokenLogProbs {
        let lp = (1.0 / n as f64).ln();
        (0..n).map(|i| (format!("tok{i}"), lp)).collect()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(entropy_from_logprobs(&TokenLogProbs::new()), 0.0);
        assert_eq!(entropy_from_logits(&[], 40), 0.0);
    }

    #[test]
    fn test_single_outcome_is_near_zero() {
        let h = entropy_from_logprobs(&uniform(1));
        assert!(h >= 0.0);
        assert!(h < 1e-6, "one-hot entropy should vanish: {h}");
    }

    #[test]
    fn test_uniform_entropy_is_ln_n() {
        assert_abs_diff_eq!(entropy_from_logprobs(&uniform(2)), 2.0_f64.ln(), epsilon = 1e-6);
        assert_abs_diff_eq!(entropy_from_logprobs(&uniform(10)), 10.0_f64.ln(), epsilon = 1e-6);
    }

    #[test]
    fn test_entropy_grows_as_mass_spreads() {
        let h2 = entropy_from_logprobs(&uniform(2));
        let h10 = entropy_from_logprobs(&uniform(10));
        let h40 = entropy_from_logprobs(&uniform(40));
        assert!(h2 < h10 && h10 < h40, "h2={h2} h10={h10} h40={h40}");
    }

    #[test]
    fn test_peaked_below_uniform() {
        let peaked: TokenLogProbs =
            [("yes".to_string(), 0.95_f64.ln()), ("no".to_string(), 0.05_f64.ln())]
                .into_iter()
                .collect();
        assert!(entropy_from_logprobs(&peaked) < entropy_from_logprobs(&uniform(2)));
    }

    #[test]
    fn test_logits_top_k_filter() {
        // 50 equal logits truncated to 40 → ln(40), not ln(50).
        let logits = vec![1.0; 50];
        assert_abs_diff_eq!(entropy_from_logits(&logits, 40), 40.0_f64.ln(), epsilon = 1e-6);
        assert_abs_diff_eq!(entropy_from_full_logits(&logits), 40.0_f64.ln(), epsilon = 1e-6);
    }

    #[test]
    fn test_logits_shift_invariance() {
        let a = entropy_from_logits(&[2.0, 1.0, 0.5], 3);
        let b = entropy_from_logits(&[102.0, 101.0, 100.5], 3);
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }
}
