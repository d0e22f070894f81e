pub mod config;
pub mod error;
pub mod paths;
pub mod store;

pub use config::AgentConfig;
pub use error::{Result, StoreError};
pub use paths::{config_file, default_base_dir, memory_file};
pub use store::MemoryStore;
