//! `stockbook-inventory` — the stock ledger.
//!
//! Owns the ordered stock collection and its two derived totals, persisting a
//! full snapshot through `stockbook-store` after every successful mutation.

pub mod ledger;
pub mod record;

pub use ledger::{InventoryLedger, STOCKS_KEY};
pub use record::{StockDraft, StockRecord};
