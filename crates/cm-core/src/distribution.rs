//! Sparse next-token distributions as reported by the inference engine.

use std::collections::BTreeMap;

use crate::constants::EPSILON;

/// Token string → log-probability, at most the engine's top-K entries.
///
/// A BTreeMap rather than a HashMap: float accumulation is not associative,
/// so projection must visit tokens in a canonical order to stay bit-stable.
pub type TokenLogProbs = BTreeMap<String, f64>;

/// Normalize log-probabilities into probabilities summing to ~1.
///
/// Subtracts the maximum before exponentiating, then divides by (sum + ε).
/// Non-finite entries are skipped (their tokens contribute nothing).
/// Returns (token, probability) pairs in key order; empty input → empty.
pub fn normalize(logprobs: &TokenLogProbs) -> Vec<(&str, f64)> {
    let finite: Vec<(&str, f64)> = logprobs
        .iter()
        .filter(|(_, lp)| lp.is_finite())
        .map(|(t, lp)| (t.as_str(), *lp))
        .collect();
    if finite.is_empty() {
        return Vec::new();
    }

    let max = finite.iter().map(|(_, lp)| *lp).fold(f64::NEG_INFINITY, f64::max);
    let mut pairs: Vec<(&str, f64)> = finite
        .into_iter()
        .map(|(t, lp)| (t, (lp - max).exp()))
        .collect();
    let sum: f64 = pairs.iter().map(|(_, e)| e).sum();
    for (_, e) in &mut pairs {
        *e /= sum + EPSILON;
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn dist(entries: &[(&str, f64)]) -> TokenLogProbs {
        entries.iter().map(|(t, lp)| (t.to_string(), *lp)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize(&TokenLogProbs::new()).is_empty());
    }

    #[test]
    fn test_sums_to_one() {
        let d = dist(&[("a", -0.1), ("b", -2.0), ("c", -5.0)]);
        let total: f64 = normalize(&d).iter().map(|(_, p)| p).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_uniform_logprobs_give_uniform_probs() {
        let d = dist(&[("a", -3.0), ("b", -3.0), ("c", -3.0), ("d", -3.0)]);
        for (_, p) in normalize(&d) {
            assert_abs_diff_eq!(p, 0.25, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_large_magnitudes_do_not_overflow() {
        // Without max-subtraction, exp(1000) would be infinite.
        let d = dist(&[("a", 1000.0), ("b", 999.0)]);
        let probs = normalize(&d);
        assert!(probs.iter().all(|(_, p)| p.is_finite()));
        let total: f64 = probs.iter().map(|(_, p)| p).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_non_finite_entries_skipped() {
        let d = dist(&[("a", f64::NAN), ("b", 0.0_f64.ln()), ("c", -0.5)]);
        let probs = normalize(&d);
        // NaN and -inf are dropped; "c" keeps the whole mass.
        assert_eq!(probs.len(), 1);
        assert_eq!(probs[0].0, "c");
        assert_abs_diff_eq!(probs[0].1, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_key_order_is_canonical() {
        let d = dist(&[("zebra", -1.0), ("apple", -1.0), ("mango", -1.0)]);
        let tokens: Vec<&str> = normalize(&d).iter().map(|(t, _)| *t).collect();
        assert_eq!(tokens, vec!["apple", "mango", "zebra"]);
    }
}
