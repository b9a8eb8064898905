//! `stockbook-core` — shared ledger building blocks.
//!
//! This crate contains **pure domain** primitives (no persistence concerns).

pub mod error;
pub mod id;
pub mod money;

pub use error::{LedgerError, LedgerResult};
pub use id::EntryId;
