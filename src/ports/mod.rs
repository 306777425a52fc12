//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the scanning/summarizing core
//! and an external system (time, filesystem, chat-completion API).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod llm;

pub use clock::Clock;
pub use filesystem::{DirEntry, EntryKind, FileSystem};
pub use llm::{ApiError, ChatMessage, ChatRequest, ChatResponse, CompletionFuture, LlmClient};
