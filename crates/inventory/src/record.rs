use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockbook_core::{EntryId, LedgerError, LedgerResult};

/// A stock entry as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: EntryId,
    pub name: String,
    pub amount: i64,
    /// Price per unit in smallest currency unit (e.g., pesewas).
    pub unit_price: u64,
    pub date: NaiveDate,
}

impl StockRecord {
    /// amount × unit price, in minor units.
    pub fn line_total(&self) -> u64 {
        self.amount as u64 * self.unit_price
    }

    /// Snapshot records must satisfy the same field rules as new drafts;
    /// `load` discards the whole snapshot otherwise.
    pub(crate) fn validate(&self) -> LedgerResult<()> {
        check_fields(&self.name, self.amount, self.unit_price)
    }
}

fn check_fields(name: &str, amount: i64, unit_price: u64) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::validation("name", "cannot be empty"));
    }
    if amount <= 0 {
        return Err(LedgerError::validation("amount", "must be a positive integer"));
    }
    if unit_price == 0 {
        return Err(LedgerError::validation("unit_price", "must be positive"));
    }
    Ok(())
}

/// Validated input for `add`/`update`. The ledger assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDraft {
    pub name: String,
    pub amount: i64,
    pub unit_price: u64,
    pub date: NaiveDate,
}

impl StockDraft {
    pub fn validate(&self) -> LedgerResult<()> {
        check_fields(&self.name, self.amount, self.unit_price)
    }

    pub(crate) fn into_record(self, id: EntryId) -> StockRecord {
        StockRecord {
            id,
            name: self.name,
            amount: self.amount,
            unit_price: self.unit_price,
            date: self.date,
        }
    }
}
