//! Agent configuration loaded from `config.toml`.
//!
//! Every field is optional in the file; a missing or unreadable file means
//! stock defaults, never a startup failure.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use cm_core::constants::{DEFAULT_PERSONA, LTM_CAPACITY, RECALL_THRESHOLD, RECALL_TOP_K};

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_persona")]
    pub persona: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_recall_top_k")]
    pub recall_top_k: usize,
    #[serde(default = "default_recall_threshold")]
    pub recall_threshold: f32,
}

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

fn default_capacity() -> usize {
    LTM_CAPACITY
}

fn default_recall_top_k() -> usize {
    RECALL_TOP_K
}

fn default_recall_threshold() -> f32 {
    RECALL_THRESHOLD
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            persona: default_persona(),
            capacity: default_capacity(),
            recall_top_k: default_recall_top_k(),
            recall_threshold: default_recall_threshold(),
        }
    }
}

impl AgentConfig {
    /// Load from a TOML file. Missing file ⇒ defaults; malformed file ⇒
    /// defaults with a logged warning.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
                Self::default()
            }
        }
    }
}
