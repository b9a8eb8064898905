//! Ledger error model.

use thiserror::Error;

use crate::id::EntryId;

/// Result type used across the ledger crates.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors surfaced by ledger operations.
///
/// Keep this focused on deterministic, caller-facing failures. Persisted-state
/// decode problems are recovered inside `load` and never reach this enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An input field is missing, non-positive, or otherwise unusable.
    /// Carries the field name so the caller can point at the right input.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A positional index fell outside `[0, len)`.
    #[error("index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    /// An id-addressed operation named an entry that is not in the ledger.
    #[error("no entry with id {0}")]
    UnknownEntry(EntryId),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Writing the snapshot failed. String payload keeps the enum cloneable.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    pub fn unknown_entry(id: EntryId) -> Self {
        Self::UnknownEntry(id)
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(err: impl core::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}
