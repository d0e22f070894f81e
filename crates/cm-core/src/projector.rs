//! Deterministic projection into thought space.
//!
//! A dense vocabulary×D projection matrix would be hundreds of megabytes;
//! instead, each token's bipolar row is regenerated on demand from a PRNG
//! seeded by a hash of the token's string form. Hashing the string rather
//! than a vocabulary id keeps stored vectors valid across tokenizer
//! changes.
//!
//! The seeding scheme is part of the on-disk contract: FNV-1a 64 over the
//! token bytes, feeding a ChaCha8 stream. Both are fixed algorithms, so a
//! vector projected today matches one projected by any future build.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::{HDC_DIM, PROB_CUTOFF};
use crate::distribution::{self, TokenLogProbs};
use crate::tokenizer;
use crate::vector::ThoughtVector;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a 64-bit.
fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Encoder from distributions, embeddings, or plain text into fixed-width
/// bipolar vectors.
#[derive(Debug, Clone)]
pub struct ThoughtProjector {
    dim: usize,
}

impl Default for ThoughtProjector {
    fn default() -> Self {
        Self::new(HDC_DIM)
    }
}

impl ThoughtProjector {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The deterministic bipolar vector seeded by a token's string form.
    pub fn token_vector(&self, token: &str) -> ThoughtVector {
        let mut acc = vec![0.0f32; self.dim];
        self.accumulate_row(fnv1a64(token.as_bytes()), 1.0, &mut acc);
        ThoughtVector::binarize(&acc)
    }

    /// Project a next-token distribution: normalize, drop candidates below
    /// the probability cutoff, superpose `p · token_row`, binarize.
    ///
    /// An empty (or fully pruned) distribution leaves the accumulator at
    /// zero, which binarizes to all +1 — the degenerate no-signal vector.
    pub fn project(&self, logprobs: &TokenLogProbs) -> ThoughtVector {
        let mut acc = vec![0.0f32; self.dim];
        for (token, p) in distribution::normalize(logprobs) {
            if p < PROB_CUTOFF {
                continue;
            }
            self.accumulate_row(fnv1a64(token.as_bytes()), p as f32, &mut acc);
        }
        ThoughtVector::binarize(&acc)
    }

    /// Project a dense embedding of arbitrary width into the same bipolar
    /// space. The projection row for component `j` is seeded by `j`'s
    /// little-endian bytes, so no matrix is stored here either.
    /// Non-finite components are skipped.
    pub fn project_embedding(&self, embedding: &[f32]) -> ThoughtVector {
        let mut acc = vec![0.0f32; self.dim];
        for (j, &x) in embedding.iter().enumerate() {
            if x == 0.0 || !x.is_finite() {
                continue;
            }
            self.accumulate_row(fnv1a64(&(j as u64).to_le_bytes()), x, &mut acc);
        }
        ThoughtVector::binarize(&acc)
    }

    /// Project plain text: superpose the token rows of its words with unit
    /// weight, binarize. Shares the token seeding with [`project`](Self::project),
    /// so text memories and generation-time thoughts live in one space.
    pub fn project_text(&self, text: &str) -> ThoughtVector {
        let mut acc = vec![0.0f32; self.dim];
        for token in tokenizer::tokenize(text) {
            self.accumulate_row(fnv1a64(token.as_bytes()), 1.0, &mut acc);
        }
        ThoughtVector::binarize(&acc)
    }

    /// Add `weight · row(seed)` into the accumulator, drawing the ±1 row
    /// lazily instead of materializing it.
    fn accumulate_row(&self, seed: u64, weight: f32, acc: &mut [f32]) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for slot in acc.iter_mut() {
            *slot += if rng.random::<bool>() { weight } else { -weight };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dist(entries: &[(&str, f64)]) -> TokenLogProbs {
        entries.iter().map(|(t, lp)| (t.to_string(), *lp)).collect()
    }

    #[test]
    fn test_output_is_bipolar_and_full_width() {
        let p = ThoughtProjector::new(256);
        let v = p.project(&dist(&[("the", -0.2), ("a", -1.8)]));
        assert_eq!(v.dim(), 256);
        assert!(v.as_slice().iter().all(|&c| c == 1.0 || c == -1.0));
    }

    #[test]
    fn test_projection_is_repeatable() {
        let p = ThoughtProjector::new(512);
        let d = dist(&[("alpha", 0.9_f64.ln()), ("beta", 0.1_f64.ln())]);
        assert_eq!(p.project(&d), p.project(&d));
    }

    #[test]
    fn test_token_rows_stable_across_instances() {
        // Rows depend only on the token bytes, never on projector state.
        let a = ThoughtProjector::new(512);
        let b = ThoughtProjector::new(512);
        assert_eq!(a.token_vector("memory"), b.token_vector("memory"));
        assert_ne!(a.token_vector("memory"), a.token_vector("Memory"));
    }

    #[test]
    fn test_empty_distribution_degenerates_to_plus_one() {
        let p = ThoughtProjector::new(64);
        let v = p.project(&TokenLogProbs::new());
        assert_eq!(v.dim(), 64);
        assert!(v.is_degenerate());
    }

    #[test]
    fn test_cutoff_prunes_low_probability_tokens() {
        let p = ThoughtProjector::new(512);
        // "noise" sits at ~0.5% after normalization, below the 1% cutoff.
        let with_noise = dist(&[("signal", 0.995_f64.ln()), ("noise", 0.005_f64.ln())]);
        let without = dist(&[("signal", 0.0)]);
        assert_eq!(p.project(&with_noise), p.project(&without));
    }

    #[test]
    fn test_different_distributions_are_distinguishable() {
        let p = ThoughtProjector::new(1024);
        let skewed = p.project(&dist(&[("a", 0.9_f64.ln()), ("b", 0.1_f64.ln())]));
        let balanced = p.project(&dist(&[("a", 0.5_f64.ln()), ("b", 0.5_f64.ln())]));
        let sim = skewed.cosine(&balanced);
        assert!(sim < 1.0, "distinct mixes must not collapse: {sim}");
        // Both lean on the same token rows, so they stay correlated.
        assert!(sim > 0.0, "shared tokens should correlate: {sim}");
    }

    #[test]
    fn test_unrelated_tokens_are_near_orthogonal() {
        let p = ThoughtProjector::default();
        let sim = p.token_vector("volcano").cosine(&p.token_vector("spreadsheet"));
        assert!(sim.abs() < 0.1, "random rows should be near-orthogonal: {sim}");
    }

    #[test]
    fn test_text_projection_keys_on_shared_words() {
        let p = ThoughtProjector::default();
        let a = p.project_text("The silver key opens the cellar door");
        let b = p.project_text("silver key for the cellar");
        let unrelated = p.project_text("rain forecast for tuesday");
        assert!(a.cosine(&b) > a.cosine(&unrelated));
    }

    #[test]
    fn test_text_projection_case_insensitive() {
        let p = ThoughtProjector::new(512);
        assert_eq!(p.project_text("RED APPLE"), p.project_text("red apple"));
    }

    #[test]
    fn test_embedding_projection_deterministic_and_signful() {
        let p = ThoughtProjector::new(512);
        let e1 = vec![0.3, -0.2, 0.9, 0.0, 0.5];
        let e2 = vec![-0.3, 0.2, -0.9, 0.0, -0.5];
        let v1 = p.project_embedding(&e1);
        assert_eq!(v1, p.project_embedding(&e1));
        // Negating the embedding flips every accumulated sign.
        let flipped = p.project_embedding(&e2);
        assert!(v1.cosine(&flipped) < -0.999, "expected full flip");
    }

    #[test]
    fn test_empty_embedding_degenerates() {
        let p = ThoughtProjector::new(64);
        assert!(p.project_embedding(&[]).is_degenerate());
    }

    proptest! {
        #[test]
        fn prop_projection_always_bipolar(
            entries in proptest::collection::btree_map("[a-z]{1,6}", -8.0f64..0.0, 0..20)
        ) {
            let p = ThoughtProjector::new(128);
            let v = p.project(&entries);
            prop_assert_eq!(v.dim(), 128);
            prop_assert!(v.as_slice().iter().all(|&c| c == 1.0 || c == -1.0));
        }

        #[test]
        fn prop_cosine_bounded(
            a in proptest::collection::vec(-1.0f32..=1.0, 32),
            b in proptest::collection::vec(-1.0f32..=1.0, 32),
        ) {
            let sim = crate::vector::cosine_similarity(&a, &b);
            prop_assert!((-1.0001..=1.0001).contains(&sim), "out of range: {}", sim);
        }
    }
}
