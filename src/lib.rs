// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod history;
pub mod observability;
pub mod reveal;
pub mod store;
pub mod types;
pub mod view;

// Re-exports
pub use client::{AnswerService, AskClient};
pub use error::{Error, Result};
pub use history::{HISTORY_KEY, HistoryLog};
pub use observability::register_biometrics;
pub use reveal::{DEFAULT_REVEAL_DELAY, Revealer};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::*;
pub use view::{ChatView, MemoryView, ViewEvent};
