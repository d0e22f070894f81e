//! Word tokenizer for the text projection path.
//!
//! Manual memories and recall queries arrive as plain text rather than
//! engine distributions; this splits them into the lowercase words whose
//! seeded vectors get superposed.

use regex::Regex;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s']").unwrap());
static APOSTROPHE_TRIM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^'+|'+$").unwrap());

/// Tokenize text into lowercase words, keeping in-word apostrophes.
/// No stemming and no stop-word removal: every surface form seeds its own
/// vector, and shared words between texts are what recall keys on.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned = NON_WORD.replace_all(text, " ");
    cleaned
        .to_lowercase()
        .split_whitespace()
        .map(|w| APOSTROPHE_TRIM.replace_all(w, "").to_string())
        .filter(|w| !w.is_empty())
        .collect()
}
