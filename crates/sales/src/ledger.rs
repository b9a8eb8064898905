use stockbook_core::{EntryId, LedgerError, LedgerResult};
use stockbook_store::KeyValueStore;

use crate::record::{SaleDraft, SaleRecord, SaleSelector};

/// Snapshot key for the sale collection.
pub const SALES_KEY: &str = "sales";

/// Sales ledger: insertion-ordered records plus a running total.
///
/// Invariant: after every operation, `total_sales_value` equals the sum of
/// `line_total` over `records`. Records are never re-sorted, so in-memory
/// order and persisted order are always the same sequence.
#[derive(Debug)]
pub struct SalesLedger<S> {
    store: S,
    records: Vec<SaleRecord>,
    total_sales_value: u64,
}

impl<S: KeyValueStore> SalesLedger<S> {
    /// Hydrate from the persisted snapshot; same recovery contract as the
    /// inventory ledger.
    pub fn load(store: S) -> Self {
        let mut records = match store.get(SALES_KEY) {
            Ok(Some(value)) => match serde_json::from_value::<Vec<SaleRecord>>(value) {
                Ok(records) => records,
                Err(err) => {
                    tracing::warn!(%err, "discarding malformed sale snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "sale snapshot unreadable, starting empty");
                Vec::new()
            }
        };

        // A snapshot breaking the field rules counts as malformed too; a
        // negative quantity would otherwise wrap the running total.
        if let Some(err) = records.iter().find_map(|r| r.validate().err()) {
            tracing::warn!(%err, "discarding sale snapshot with invalid records");
            records.clear();
        }

        let total_sales_value = records.iter().map(SaleRecord::line_total).sum();

        Self {
            store,
            records,
            total_sales_value,
        }
    }

    /// Record a sale. Returns the id assigned to it.
    pub fn add(&mut self, draft: SaleDraft) -> LedgerResult<EntryId> {
        draft.validate()?;
        let record = draft.into_record(EntryId::new());

        let id = record.id;
        let value = record.line_total();

        let mut next = self.records.clone();
        next.push(record);
        self.persist(&next)?;

        self.records = next;
        self.total_sales_value += value;
        Ok(id)
    }

    /// Remove the sale with this id and return it.
    pub fn remove(&mut self, id: EntryId) -> LedgerResult<SaleRecord> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(LedgerError::UnknownEntry(id))?;
        self.remove_position(pos)
    }

    /// Positional variant of `remove`.
    pub fn remove_at(&mut self, index: usize) -> LedgerResult<SaleRecord> {
        if index >= self.records.len() {
            return Err(LedgerError::OutOfRange {
                index,
                len: self.records.len(),
            });
        }
        self.remove_position(index)
    }

    /// Remove the first sale equal to the selector on all three fields.
    ///
    /// `Ok(None)` when nothing matches; the ledger and snapshot are left
    /// untouched in that case. With duplicate triples the earliest insertion
    /// wins, which is also the earliest match in persisted order.
    pub fn remove_matching(&mut self, selector: &SaleSelector) -> LedgerResult<Option<SaleRecord>> {
        match self.records.iter().position(|r| selector.matches(r)) {
            Some(pos) => self.remove_position(pos).map(Some),
            None => Ok(None),
        }
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    /// Σ quantity × unit price over current records, in minor units.
    pub fn total_sales_value(&self) -> u64 {
        self.total_sales_value
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn remove_position(&mut self, pos: usize) -> LedgerResult<SaleRecord> {
        let mut next = self.records.clone();
        let removed = next.remove(pos);
        self.persist(&next)?;

        self.records = next;
        self.total_sales_value -= removed.line_total();
        Ok(removed)
    }

    /// Write the candidate snapshot; committed only on success.
    fn persist(&self, records: &[SaleRecord]) -> LedgerResult<()> {
        let payload = serde_json::to_value(records).map_err(LedgerError::storage)?;
        self.store
            .set(SALES_KEY, payload)
            .map_err(LedgerError::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use stockbook_store::InMemoryStore;

    fn draft(stock_name: &str, quantity: i64, unit_price: u64) -> SaleDraft {
        SaleDraft {
            stock_name: stock_name.to_string(),
            quantity,
            unit_price,
        }
    }

    fn selector(stock_name: &str, quantity: i64, unit_price: u64) -> SaleSelector {
        SaleSelector {
            stock_name: stock_name.to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn add_then_remove_matching_returns_to_zero() {
        let mut ledger = SalesLedger::load(Arc::new(InMemoryStore::new()));

        ledger.add(draft("Rice", 2, 600)).unwrap();
        assert_eq!(ledger.total_sales_value(), 1200);

        let removed = ledger.remove_matching(&selector("Rice", 2, 600)).unwrap();
        assert_eq!(removed.unwrap().stock_name, "Rice");
        assert_eq!(ledger.total_sales_value(), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn remove_matching_miss_is_a_no_op() {
        let store = Arc::new(InMemoryStore::new());
        let mut ledger = SalesLedger::load(store.clone());
        ledger.add(draft("Rice", 2, 600)).unwrap();
        let snapshot_before = store.get(SALES_KEY).unwrap();

        // Same name, different price: no match.
        let removed = ledger.remove_matching(&selector("Rice", 2, 650)).unwrap();
        assert!(removed.is_none());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total_sales_value(), 1200);
        assert_eq!(store.get(SALES_KEY).unwrap(), snapshot_before);
    }

    #[test]
    fn duplicate_triples_remove_the_earliest_insertion() {
        let mut ledger = SalesLedger::load(Arc::new(InMemoryStore::new()));
        let first = ledger.add(draft("Rice", 2, 600)).unwrap();
        let second = ledger.add(draft("Rice", 2, 600)).unwrap();

        let removed = ledger.remove_matching(&selector("Rice", 2, 600)).unwrap();
        assert_eq!(removed.unwrap().id, first);
        assert_eq!(ledger.records()[0].id, second);
    }

    #[test]
    fn records_keep_insertion_order() {
        let mut ledger = SalesLedger::load(Arc::new(InMemoryStore::new()));
        ledger.add(draft("Rice", 2, 600)).unwrap();
        ledger.add(draft("Beans", 1, 800)).unwrap();
        ledger.add(draft("Maize", 5, 300)).unwrap();

        let names: Vec<_> = ledger.records().iter().map(|r| r.stock_name.as_str()).collect();
        assert_eq!(names, ["Rice", "Beans", "Maize"]);
        assert_eq!(ledger.total_sales_value(), 1200 + 800 + 1500);
    }

    #[test]
    fn validation_failures_name_the_field() {
        let mut ledger = SalesLedger::load(Arc::new(InMemoryStore::new()));

        let cases = [
            (draft("", 1, 1), "stock_name"),
            (draft("Rice", 0, 1), "quantity"),
            (draft("Rice", -2, 1), "quantity"),
            (draft("Rice", 1, 0), "unit_price"),
        ];

        for (bad, expected_field) in cases {
            match ledger.add(bad).unwrap_err() {
                LedgerError::Validation { field, .. } => assert_eq!(field, expected_field),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn positional_remove_checks_range() {
        let mut ledger = SalesLedger::load(Arc::new(InMemoryStore::new()));
        assert_eq!(
            ledger.remove_at(0).unwrap_err(),
            LedgerError::OutOfRange { index: 0, len: 0 }
        );

        ledger.add(draft("Rice", 2, 600)).unwrap();
        assert_eq!(
            ledger.remove_at(1).unwrap_err(),
            LedgerError::OutOfRange { index: 1, len: 1 }
        );
        assert!(ledger.remove_at(0).is_ok());
    }

    #[test]
    fn snapshot_with_invalid_fields_loads_empty() {
        let store = Arc::new(InMemoryStore::new());
        store
            .set(
                SALES_KEY,
                serde_json::json!([{
                    "id": "0190c3a1-7d1e-7b7a-9f00-000000000002",
                    "stock_name": "Rice",
                    "quantity": -2,
                    "unit_price": 600
                }]),
            )
            .unwrap();

        let ledger = SalesLedger::load(store);
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_sales_value(), 0);
    }

    #[test]
    fn reload_reproduces_records_and_total() {
        let store = Arc::new(InMemoryStore::new());
        let mut ledger = SalesLedger::load(store.clone());
        ledger.add(draft("Rice", 2, 600)).unwrap();
        ledger.add(draft("Beans", 1, 800)).unwrap();
        ledger.remove_matching(&selector("Rice", 2, 600)).unwrap();

        let reloaded = SalesLedger::load(store);
        assert_eq!(reloaded.records(), ledger.records());
        assert_eq!(reloaded.total_sales_value(), 800);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the running total equals the fold after any interleaving
        /// of adds and selector deletes (hits and misses alike).
        #[test]
        fn total_always_equals_the_fold(
            ops in prop::collection::vec(
                (0u8..4, 1i64..20, 1u64..1_000),
                1..40
            )
        ) {
            let mut ledger = SalesLedger::load(Arc::new(InMemoryStore::new()));

            for (kind, quantity, unit_price) in ops {
                // Small name pool so selector deletes hit often.
                let name = format!("item-{}", quantity % 3);
                let _ = if kind == 0 {
                    ledger
                        .remove_matching(&SaleSelector {
                            stock_name: name,
                            quantity,
                            unit_price,
                        })
                        .map(|_| ())
                } else {
                    ledger
                        .add(SaleDraft {
                            stock_name: name,
                            quantity,
                            unit_price,
                        })
                        .map(|_| ())
                };

                let fold: u64 = ledger.records().iter().map(SaleRecord::line_total).sum();
                prop_assert_eq!(ledger.total_sales_value(), fold);
            }
        }
    }
}
