//! Session-level state built on top of the stream: rolling conversation
//! memory and per-turn aggregation. Owned by the caller and passed in
//! explicitly; nothing here is global.

use std::collections::VecDeque;
use std::fmt;
use std::fmt::Write as _;

use crate::constants::{CURIOSITY_THRESHOLD, ENTROPY_CEILING, STM_WINDOW};
use crate::prompt::WorldState;
use crate::stream::ThoughtStep;
use crate::vector::{ThoughtVector, bundle};

/// One conversation entry: who said it and what they said.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub speaker: String,
    pub text: String,
}

/// Rolling log of recent exchanges. Stores up to twice the render window;
/// rendering shows only the window's worth.
#[derive(Debug, Clone, Default)]
pub struct ShortTermMemory {
    entries: VecDeque<Exchange>,
}

impl ShortTermMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, speaker: impl Into<String>, text: impl Into<String>) {
        self.entries.push_back(Exchange {
            speaker: speaker.into(),
            text: text.into(),
        });
        while self.entries.len() > STM_WINDOW * 2 {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `[Recent Conversation]` block over the last window of entries;
    /// empty string when nothing has been said.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut block = String::from("\n[Recent Conversation]\n");
        let skip = self.entries.len().saturating_sub(STM_WINDOW);
        for entry in self.entries.iter().skip(skip) {
            let _ = writeln!(block, "- {}: {}", entry.speaker, entry.text);
        }
        block
    }

    /// Inject the rendered block into the world state, where prompt
    /// assembly will pick it up alongside everything else.
    pub fn inject_into(&self, world: &mut WorldState) {
        if !self.is_empty() {
            world.inject("conversation_history", self.render());
        }
    }
}

/// Tone label derived from the turn's peak uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Confident,
    Neutral,
    Uncertain,
    Confused,
}

impl Emotion {
    pub fn from_entropy(max_entropy: f64) -> Self {
        if max_entropy < 1.0 {
            Emotion::Confident
        } else if max_entropy < 2.0 {
            Emotion::Neutral
        } else if max_entropy < 3.0 {
            Emotion::Uncertain
        } else {
            Emotion::Confused
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Emotion::Confident => "confident",
            Emotion::Neutral => "neutral",
            Emotion::Uncertain => "uncertain",
            Emotion::Confused => "confused",
        };
        write!(f, "{label}")
    }
}

/// Aggregates one turn's stream into what the caller persists and reports:
/// peak entropy, the collected thought vectors, and the first usable vector
/// for mid-stream recall.
#[derive(Debug, Default)]
pub struct TurnAggregator {
    max_entropy: f64,
    vectors: Vec<ThoughtVector>,
    first_vector: Option<ThoughtVector>,
}

impl TurnAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one yielded step. Degenerate vectors carry no signal and are
    /// not collected; their entropy still counts.
    pub fn observe(&mut self, step: &ThoughtStep) {
        if step.entropy > self.max_entropy {
            self.max_entropy = step.entropy;
        }
        if !step.vector.is_degenerate() {
            if self.first_vector.is_none() {
                self.first_vector = Some(step.vector.clone());
            }
            self.vectors.push(step.vector.clone());
        }
    }

    pub fn max_entropy(&self) -> f64 {
        self.max_entropy
    }

    /// The first non-degenerate vector seen — the recall trigger, available
    /// before the turn finishes.
    pub fn first_vector(&self) -> Option<&ThoughtVector> {
        self.first_vector.as_ref()
    }

    /// Lower peak uncertainty ⇒ more worth remembering:
    /// `1 − min(max_entropy / ceiling, 1)`.
    pub fn importance(&self) -> f64 {
        1.0 - (self.max_entropy / ENTROPY_CEILING).min(1.0)
    }

    /// Consensus vector over the whole turn; None when every step was
    /// degenerate (nothing worth saving).
    pub fn representative(&self) -> Option<ThoughtVector> {
        bundle(&self.vectors)
    }

    pub fn emotion(&self) -> Emotion {
        Emotion::from_entropy(self.max_entropy)
    }

    /// High peak uncertainty marks the turn as worth reflecting on.
    pub fn is_curious(&self) -> bool {
        self.max_entropy > CURIOSITY_THRESHOLD
    }

    /// 0–100 score for confident turns, 0 otherwise.
    pub fn resonance(&self) -> i32 {
        if self.max_entropy < 1.0 {
            ((1.0 - self.max_entropy) * 100.0) as i32
        } else {
            0
        }
    }

    pub fn observed_vectors(&self) -> usize {
        self.vectors.len()
    }
}
