use stockbook_core::{EntryId, LedgerError, LedgerResult};
use stockbook_store::KeyValueStore;

use crate::record::{StockDraft, StockRecord};

/// Snapshot key for the stock collection.
pub const STOCKS_KEY: &str = "stocks";

/// Stock ledger: date-sorted records plus running totals.
///
/// Invariant: after every operation, `total_units` equals the sum of `amount`
/// over `records` and `total_value` equals the sum of `line_total`. Totals are
/// maintained incrementally per mutation; the fold in `load` is the only
/// from-scratch computation, so a corrupted snapshot re-baselines cleanly.
#[derive(Debug)]
pub struct InventoryLedger<S> {
    store: S,
    records: Vec<StockRecord>,
    total_units: i64,
    total_value: u64,
}

impl<S: KeyValueStore> InventoryLedger<S> {
    /// Hydrate from the persisted snapshot.
    ///
    /// Missing, unreadable, or malformed snapshots fall back to an empty
    /// ledger; this never fails to the caller.
    pub fn load(store: S) -> Self {
        let mut records = match store.get(STOCKS_KEY) {
            Ok(Some(value)) => match serde_json::from_value::<Vec<StockRecord>>(value) {
                Ok(records) => records,
                Err(err) => {
                    tracing::warn!(%err, "discarding malformed stock snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "stock snapshot unreadable, starting empty");
                Vec::new()
            }
        };

        // A snapshot breaking the field rules counts as malformed too; a
        // negative amount would otherwise wrap the value total.
        if let Some(err) = records.iter().find_map(|r| r.validate().err()) {
            tracing::warn!(%err, "discarding stock snapshot with invalid records");
            records.clear();
        }

        records.sort_by_key(|r| r.date);
        let (total_units, total_value) = fold_totals(&records);

        Self {
            store,
            records,
            total_units,
            total_value,
        }
    }

    /// Add a stock entry. Returns the id assigned to it.
    pub fn add(&mut self, draft: StockDraft) -> LedgerResult<EntryId> {
        draft.validate()?;
        let record = draft.into_record(EntryId::new());

        let id = record.id;
        let units = record.amount;
        let value = record.line_total();

        let mut next = self.records.clone();
        next.push(record);
        next.sort_by_key(|r| r.date);
        self.persist(&next)?;

        self.records = next;
        self.total_units += units;
        self.total_value += value;
        Ok(id)
    }

    /// Replace the entry with this id. The id is retained; the entry's
    /// position may change because records re-sort by date.
    pub fn update(&mut self, id: EntryId, draft: StockDraft) -> LedgerResult<()> {
        let pos = self
            .position(id)
            .ok_or(LedgerError::UnknownEntry(id))?;
        draft.validate()?;
        let replacement = draft.into_record(id);

        let old_units = self.records[pos].amount;
        let old_value = self.records[pos].line_total();
        let new_units = replacement.amount;
        let new_value = replacement.line_total();

        let mut next = self.records.clone();
        next[pos] = replacement;
        next.sort_by_key(|r| r.date);
        self.persist(&next)?;

        self.records = next;
        self.total_units = self.total_units - old_units + new_units;
        self.total_value = self.total_value - old_value + new_value;
        Ok(())
    }

    /// Positional variant of `update` for list-shaped callers.
    pub fn update_at(&mut self, index: usize, draft: StockDraft) -> LedgerResult<()> {
        let id = self.id_at(index)?;
        self.update(id, draft)
    }

    /// Remove the entry with this id and return it.
    pub fn remove(&mut self, id: EntryId) -> LedgerResult<StockRecord> {
        let pos = self
            .position(id)
            .ok_or(LedgerError::UnknownEntry(id))?;

        let mut next = self.records.clone();
        let removed = next.remove(pos);
        self.persist(&next)?;

        self.records = next;
        self.total_units -= removed.amount;
        self.total_value -= removed.line_total();
        Ok(removed)
    }

    /// Positional variant of `remove`.
    pub fn remove_at(&mut self, index: usize) -> LedgerResult<StockRecord> {
        let id = self.id_at(index)?;
        self.remove(id)
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn entry(&self, id: EntryId) -> Option<&StockRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Σ amount over current records.
    pub fn total_units(&self) -> i64 {
        self.total_units
    }

    /// Σ amount × unit price over current records, in minor units.
    pub fn total_value(&self) -> u64 {
        self.total_value
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn id_at(&self, index: usize) -> LedgerResult<EntryId> {
        self.records
            .get(index)
            .map(|r| r.id)
            .ok_or(LedgerError::OutOfRange {
                index,
                len: self.records.len(),
            })
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Write the candidate snapshot. Callers only commit in-memory state once
    /// this has succeeded, keeping every operation all-or-nothing.
    fn persist(&self, records: &[StockRecord]) -> LedgerResult<()> {
        let payload = serde_json::to_value(records).map_err(LedgerError::storage)?;
        self.store
            .set(STOCKS_KEY, payload)
            .map_err(LedgerError::storage)
    }
}

fn fold_totals(records: &[StockRecord]) -> (i64, u64) {
    records.iter().fold((0, 0), |(units, value), r| {
        (units + r.amount, value + r.line_total())
    })
}
