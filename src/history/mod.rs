//! Bounded, persistent history of analyzed prompts.

mod backend;
mod store;
mod types;

pub use backend::{JsonFileStore, KeyValueStore, MemoryStore, SqliteStore};
pub use store::{PromptHistory, DEFAULT_CAPACITY, HISTORY_KEY};
pub use types::{HistoryEntry, PREVIEW_CHARS};
