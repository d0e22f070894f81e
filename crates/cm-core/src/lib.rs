//! Hyperdimensional cognitive memory engine.
//!
//! Turns a language model's token distributions into 4096-dimensional
//! bipolar thought vectors, measures per-step uncertainty as Shannon
//! entropy, and folds both into an episodic trace plus long-term memory
//! records recalled by cosine similarity. The generation loop itself is a
//! state machine driven through any `InferenceEngine`.
//!
//! Zero I/O — pure engine with no opinions about transport or persistence.

pub mod constants;
pub mod distribution;
pub mod entropy;
pub mod projector;
pub mod prompt;
pub mod recall;
pub mod record;
pub mod session;
pub mod stream;
pub mod time;
pub mod tokenizer;
pub mod trace;
pub mod vector;
pub mod worker;

pub use constants::{
    CURIOSITY_THRESHOLD, ENTROPY_CEILING, EPSILON, HDC_DIM, LTM_CAPACITY, MAX_TOKENS,
    PROB_CUTOFF, RECALL_THRESHOLD, RECALL_TOP_K, TOP_LOGPROBS, TRACE_DECAY,
};
pub use distribution::{TokenLogProbs, normalize};
pub use entropy::{entropy_from_full_logits, entropy_from_logits, entropy_from_logprobs};
pub use projector::ThoughtProjector;
pub use prompt::{STOP_SEQUENCES, WorldState, assemble_prompt};
pub use recall::rank;
pub use record::{MemoryRecord, WireRecord, apply_capacity};
pub use session::{Emotion, Exchange, ShortTermMemory, TurnAggregator};
pub use stream::{
    GenerationStep, InferenceEngine, StopReason, StreamError, StreamOptions, StreamState,
    ThoughtStep, ThoughtStream,
};
pub use time::{now_iso8601, unix_to_iso8601};
pub use tokenizer::tokenize;
pub use trace::EpisodicTrace;
pub use vector::{ThoughtVector, bundle, cosine_similarity};
pub use worker::{EncoderWorker, TextEncoder};
