//! `stockbook-sales` — the sales ledger.
//!
//! Insertion-ordered sale records with a running sales total, persisted the
//! same way as the stock ledger. Sales have no date and are never re-sorted.

pub mod ledger;
pub mod record;

pub use ledger::{SALES_KEY, SalesLedger};
pub use record::{SaleDraft, SaleRecord, SaleSelector};
