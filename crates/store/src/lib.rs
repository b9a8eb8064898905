//! `stockbook-store` — snapshot persistence.
//!
//! Ledgers write whole collections through a small key/value abstraction and
//! read them back at startup. Two implementations: an in-memory map for tests
//! and a JSON-file store for real use.

pub mod file;
pub mod kv;

pub use file::JsonFileStore;
pub use kv::{InMemoryStore, KeyValueStore, StoreError};
