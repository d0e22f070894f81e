//! The generation-loop state machine.
//!
//! One ThoughtStream drives one turn: it assembles the prompt, prefills the
//! engine, then per token pulls a distribution, scores its entropy, projects
//! it into thought space, superposes it onto the episodic trace, and yields
//! the (token, vector, entropy) triple. It is lazy, finite, and
//! non-restartable; the caller stops consuming to stop generating.

use std::fmt;

use crate::constants::MAX_TOKENS;
use crate::distribution::TokenLogProbs;
use crate::entropy;
use crate::projector::ThoughtProjector;
use crate::prompt::{self, STOP_SEQUENCES, WorldState};
use crate::trace::EpisodicTrace;
use crate::vector::ThoughtVector;

/// One engine step: the sampled token, the top-K log-probabilities it was
/// drawn from, and whether it was an end-of-sequence token.
#[derive(Debug, Clone)]
pub struct GenerationStep {
    pub token: String,
    pub top_logprobs: TokenLogProbs,
    pub eos: bool,
}

/// Adapter over a language-model backend.
pub trait InferenceEngine {
    /// Feed the prompt once before generation; returns the prompt's token
    /// count. Zero tokens aborts the stream.
    fn prefill(&mut self, prompt: &str) -> usize;

    /// Sample the next token and report its distribution.
    fn generate(&mut self) -> GenerationStep;

    /// Optional capability: fixed-width semantic embedding for arbitrary
    /// text. Engines without one return None.
    fn embed(&mut self, _text: &str) -> Option<Vec<f32>> {
        None
    }
}

/// Why a stream stopped yielding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The engine signalled its end-of-sequence token.
    EndToken,
    /// A configured stop string appeared in the accumulated output.
    StopSequence,
    /// The per-turn token budget ran out.
    MaxTokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Init,
    Prefill,
    Generating,
    Stopped(StopReason),
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The assembled prompt tokenized to zero tokens at prefill.
    EmptyPrompt,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::EmptyPrompt => write!(f, "prompt tokenized to zero tokens"),
        }
    }
}

impl std::error::Error for StreamError {}

/// Per-step output delivered to the caller.
#[derive(Debug, Clone)]
pub struct ThoughtStep {
    pub token: String,
    pub vector: ThoughtVector,
    pub entropy: f64,
}

#[derive(Debug, Clone)]
pub struct StreamOptions {
    pub max_tokens: usize,
    pub stop_sequences: Vec<String>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            max_tokens: MAX_TOKENS,
            stop_sequences: STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub struct ThoughtStream<'a, E: InferenceEngine> {
    engine: &'a mut E,
    projector: &'a ThoughtProjector,
    trace: &'a mut EpisodicTrace,
    options: StreamOptions,
    prompt: String,
    state: StreamState,
    stop_reason: Option<StopReason>,
    output: String,
    steps: usize,
}

impl<'a, E: InferenceEngine> ThoughtStream<'a, E> {
    /// Assemble the turn prompt and prepare a stream with default options.
    /// Nothing touches the engine until the first item is pulled.
    pub fn new(
        engine: &'a mut E,
        projector: &'a ThoughtProjector,
        trace: &'a mut EpisodicTrace,
        persona: &str,
        world: &WorldState,
        user_input: &str,
    ) -> Self {
        Self::with_options(
            engine,
            projector,
            trace,
            persona,
            world,
            user_input,
            StreamOptions::default(),
        )
    }

    pub fn with_options(
        engine: &'a mut E,
        projector: &'a ThoughtProjector,
        trace: &'a mut EpisodicTrace,
        persona: &str,
        world: &WorldState,
        user_input: &str,
        options: StreamOptions,
    ) -> Self {
        let prompt = prompt::assemble_prompt(persona, world, user_input);
        Self {
            engine,
            projector,
            trace,
            options,
            prompt,
            state: StreamState::Init,
            stop_reason: None,
            output: String::new(),
            steps: 0,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Set once the stream stops; survives the transition to Done.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Everything yielded so far, concatenated.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    fn stop(&mut self, reason: StopReason) {
        self.state = StreamState::Stopped(reason);
        self.stop_reason = Some(reason);
    }

    fn step(&mut self) -> Option<Result<ThoughtStep, StreamError>> {
        if self.steps >= self.options.max_tokens {
            self.stop(StopReason::MaxTokens);
            return None;
        }

        let step = self.engine.generate();
        let entropy = entropy::entropy_from_logprobs(&step.top_logprobs);
        let vector = self.projector.project(&step.top_logprobs);
        self.trace.add(&vector);
        self.output.push_str(&step.token);
        self.steps += 1;

        if step.eos {
            self.stop(StopReason::EndToken);
        } else if self.hit_stop_sequence() {
            self.stop(StopReason::StopSequence);
        } else if self.steps >= self.options.max_tokens {
            self.stop(StopReason::MaxTokens);
        }

        Some(Ok(ThoughtStep {
            token: step.token,
            vector,
            entropy,
        }))
    }

    fn hit_stop_sequence(&self) -> bool {
        self.options
            .stop_sequences
            .iter()
            .any(|s| self.output.contains(s))
    }
}

impl<E: InferenceEngine> Iterator for ThoughtStream<'_, E> {
    type Item = Result<ThoughtStep, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            StreamState::Init => {
                self.state = StreamState::Prefill;
                if self.engine.prefill(&self.prompt) == 0 {
                    self.state = StreamState::Done;
                    return Some(Err(StreamError::EmptyPrompt));
                }
                self.state = StreamState::Generating;
                self.step()
            }
            StreamState::Generating => self.step(),
            StreamState::Stopped(_) | StreamState::Prefill => {
                self.state = StreamState::Done;
                None
            }
            StreamState::Done => None,
        }
    }
}
