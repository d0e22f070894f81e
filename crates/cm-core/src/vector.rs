//! Bipolar thought vectors and similarity.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Fixed-width vector in thought space.
///
/// Projector output is exactly bipolar: every component is −1.0 or +1.0.
/// Decoding from storage is permissive (any f32 buffer), so similarity
/// still works over hand-edited records.
#[derive(Debug, Clone, PartialEq)]
pub struct ThoughtVector {
    components: Vec<f32>,
}

impl ThoughtVector {
    pub fn from_components(components: Vec<f32>) -> Self {
        Self { components }
    }

    /// Threshold a continuous accumulator at zero: ≥ 0 → +1, else −1.
    pub fn binarize(accumulator: &[f32]) -> Self {
        Self {
            components: accumulator
                .iter()
                .map(|&x| if x >= 0.0 { 1.0 } else { -1.0 })
                .collect(),
        }
    }

    pub fn dim(&self) -> usize {
        self.components.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.components
    }

    /// True for the all-+1 vector, the defined result of projecting an
    /// empty distribution. Callers treat it as "no signal", never as a
    /// real thought.
    pub fn is_degenerate(&self) -> bool {
        self.components.iter().all(|&c| c == 1.0)
    }

    pub fn cosine(&self, other: &ThoughtVector) -> f32 {
        cosine_similarity(&self.components, &other.components)
    }

    /// Encode as base64 of the raw little-endian f32 buffer.
    pub fn to_base64(&self) -> String {
        let mut bytes = Vec::with_capacity(self.components.len() * 4);
        for c in &self.components {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        STANDARD.encode(bytes)
    }

    /// Decode from [`to_base64`](Self::to_base64) output. None when the
    /// text is not base64 or the buffer is not whole f32s.
    pub fn from_base64(encoded: &str) -> Option<Self> {
        let bytes = STANDARD.decode(encoded).ok()?;
        if bytes.len() % 4 != 0 {
            return None;
        }
        let components = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Some(Self { components })
    }
}

/// Cosine similarity in [−1, 1]. Zero-norm or length-mismatched inputs
/// report 0.0 (no signal).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

/// Superpose vectors into one bipolar consensus: component-wise sum,
/// binarized. None for an empty slice. This is the representative
/// "thought of the turn" used when persisting a response.
pub fn bundle(vectors: &[ThoughtVector]) -> Option<ThoughtVector> {
    let first = vectors.first()?;
    let mut acc = vec![0.0f32; first.dim()];
    for v in vectors {
        for (slot, c) in acc.iter_mut().zip(v.as_slice()) {
            *slot += c;
        }
    }
    Some(ThoughtVector::binarize(&acc))
}
