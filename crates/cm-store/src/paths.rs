//! Where memories and configuration live on disk.
//!
//! Layout under the base directory:
//! ```text
//! <base>/config.toml
//! <base>/memories/<agent>.json
//! ```

use std::env;
use std::path::{Path, PathBuf};

/// Default base directory: `~/.cortex-mem`.
pub fn default_base_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".cortex-mem")
}

/// Memory file for a named agent; an empty name falls back to the shared
/// `ltm` store.
pub fn memory_file(base: &Path, agent: &str) -> PathBuf {
    let name = sanitize_name(agent);
    base.join("memories").join(format!("{name}.json"))
}

pub fn config_file(base: &Path) -> PathBuf {
    base.join("config.toml")
}

/// Agent names become file names; anything outside `[A-Za-z0-9_-]` is
/// replaced so a name can never escape the memories directory.
pub fn sanitize_name(agent: &str) -> String {
    let cleaned: String = agent
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "ltm".to_string()
    } else {
        cleaned
    }
}
