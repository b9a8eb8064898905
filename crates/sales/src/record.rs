use serde::{Deserialize, Serialize};

use stockbook_core::{EntryId, LedgerError, LedgerResult};

/// A sale entry as stored in the ledger.
///
/// `stock_name` is free text; it is not checked against the inventory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: EntryId,
    pub stock_name: String,
    pub quantity: i64,
    /// Price per unit in smallest currency unit (e.g., pesewas).
    pub unit_price: u64,
}

impl SaleRecord {
    /// quantity × unit price, in minor units.
    pub fn line_total(&self) -> u64 {
        self.quantity as u64 * self.unit_price
    }

    /// Snapshot records must satisfy the same field rules as new drafts;
    /// `load` discards the whole snapshot otherwise.
    pub(crate) fn validate(&self) -> LedgerResult<()> {
        check_fields(&self.stock_name, self.quantity, self.unit_price)
    }
}

fn check_fields(stock_name: &str, quantity: i64, unit_price: u64) -> LedgerResult<()> {
    if stock_name.trim().is_empty() {
        return Err(LedgerError::validation("stock_name", "cannot be empty"));
    }
    if quantity <= 0 {
        return Err(LedgerError::validation("quantity", "must be a positive integer"));
    }
    if unit_price == 0 {
        return Err(LedgerError::validation("unit_price", "must be positive"));
    }
    Ok(())
}

/// Validated input for `add`. The ledger assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    pub stock_name: String,
    pub quantity: i64,
    pub unit_price: u64,
}

impl SaleDraft {
    pub fn validate(&self) -> LedgerResult<()> {
        check_fields(&self.stock_name, self.quantity, self.unit_price)
    }

    pub(crate) fn into_record(self, id: EntryId) -> SaleRecord {
        SaleRecord {
            id,
            stock_name: self.stock_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// Value-equality match used by the legacy delete path: the UI has no durable
/// handle for a rendered sale beyond these three fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleSelector {
    pub stock_name: String,
    pub quantity: i64,
    pub unit_price: u64,
}

impl SaleSelector {
    pub fn matches(&self, record: &SaleRecord) -> bool {
        record.stock_name == self.stock_name
            && record.quantity == self.quantity
            && record.unit_price == self.unit_price
    }
}
