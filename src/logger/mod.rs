//! Activity logging: append-only JSONL journal of cleanup and organize runs.
//! Diagnostic logging goes through `tracing`.

pub mod jsonl;

pub use jsonl::{Journal, JournalEntry, Operation};
