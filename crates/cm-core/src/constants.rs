/// Thought-vector width (components per HDC vector)
pub const HDC_DIM: usize = 4096;

/// Top-K candidates reported per generation step
pub const TOP_LOGPROBS: usize = 40;

/// Candidates below this probability are skipped during projection.
/// Documented approximation: pruned tokens never influence the output.
pub const PROB_CUTOFF: f64 = 0.01;

/// Numerical epsilon for normalization and log-of-zero guards
pub const EPSILON: f64 = 1e-10;

/// Per-update decay applied to the episodic trace before superposition
pub const TRACE_DECAY: f32 = 0.01;

/// Below this trace norm, similarity queries report no signal
pub const TRACE_NORM_FLOOR: f32 = 1e-9;

/// Entropy treated as total uncertainty when scoring importance
pub const ENTROPY_CEILING: f64 = 4.0;

/// Peak entropy above this marks a turn as curious (worth reflection)
pub const CURIOSITY_THRESHOLD: f64 = 2.5;

/// Long-term store capacity; eviction trims back to this size
pub const LTM_CAPACITY: usize = 100;

/// Default number of memories returned by recall
pub const RECALL_TOP_K: usize = 3;

/// Minimum cosine similarity for a memory to count as recalled
pub const RECALL_THRESHOLD: f32 = 0.3;

/// Default per-turn generation budget in tokens
pub const MAX_TOKENS: usize = 128;

/// Conversation entries rendered into the prompt.
/// The session log itself is capped at twice this.
pub const STM_WINDOW: usize = 5;

/// System persona used when the caller configures none
pub const DEFAULT_PERSONA: &str = "You are a helpful AI assistant.";
