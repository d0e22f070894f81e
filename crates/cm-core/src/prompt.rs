//! Turn-prompt assembly and injected world state.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Generation stops once any of these appears in the accumulated output.
pub const STOP_SEQUENCES: &[&str] = &[
    "<|im_end|>",
    "<|endoftext|>",
    "User:",
    "Human:",
    "HumanHuman:",
    "Assistant:",
    "\n\n",
];

/// Enumerable key→value context injected into the system segment.
///
/// Rendering is total and deterministic: keys appear in sorted order, an
/// empty state renders as the empty string. Callers merge entries in
/// ("inject") and wipe the whole map ("forget"); there is no partial
/// removal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldState {
    entries: BTreeMap<String, String>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inject(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn merge(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.entries.extend(entries);
    }

    pub fn forget(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `[System: Status={k1=v1, k2=v2}]`, or "" when empty.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut out = String::from("[System: Status={");
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{k}={v}");
        }
        out.push_str("}]");
        out
    }
}

/// ChatML turn prompt: system segment (persona + rendered world state),
/// user segment, assistant cue.
pub fn assemble_prompt(persona: &str, world: &WorldState, user_input: &str) -> String {
    let context = world.render();
    format!(
        "<|im_start|>system\n{persona}\n{context}<|im_end|>\n\
         <|im_start|>user\n{user_input}<|im_end|>\n\
         <|im_start|>assistant\n"
    )
}
