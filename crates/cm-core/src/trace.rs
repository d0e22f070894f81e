//! Decaying episodic superposition — the session's running state of mind.

use crate::constants::{TRACE_DECAY, TRACE_NORM_FLOOR};
use crate::vector::{ThoughtVector, cosine_similarity};

/// In-memory accumulator over a session's thought vectors.
///
/// Unlike projector output this stays continuous: each update decays what
/// is already there, then superposes the new vector on top. It is never
/// binarized and never persisted; reset is reconstruction.
#[derive(Debug, Clone)]
pub struct EpisodicTrace {
    trace: Vec<f32>,
    decay: f32,
}

impl EpisodicTrace {
    pub fn new(dim: usize) -> Self {
        Self::with_decay(dim, TRACE_DECAY)
    }

    /// `decay` must be in (0, 1); it is the fraction forgotten per update.
    pub fn with_decay(dim: usize, decay: f32) -> Self {
        Self {
            trace: vec![0.0; dim],
            decay,
        }
    }

    pub fn dim(&self) -> usize {
        self.trace.len()
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.trace
    }

    /// `trace ← trace·(1−decay) + vector`. A vector of the wrong width
    /// leaves the trace untouched.
    pub fn add(&mut self, vector: &ThoughtVector) {
        if vector.dim() != self.trace.len() {
            return;
        }
        let keep = 1.0 - self.decay;
        for (slot, v) in self.trace.iter_mut().zip(vector.as_slice()) {
            *slot = *slot * keep + v;
        }
    }

    /// Cosine similarity between the trace and a query vector; 0.0 while
    /// the trace norm is below the signal floor.
    pub fn similarity_to(&self, query: &ThoughtVector) -> f32 {
        let norm = self.trace.iter().map(|t| t * t).sum::<f32>().sqrt();
        if norm < TRACE_NORM_FLOOR {
            return 0.0;
        }
        cosine_similarity(&self.trace, query.as_slice())
    }
}
