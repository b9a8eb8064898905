use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockbook_core::money::format_minor;
use stockbook_inventory::{InventoryLedger, StockRecord};
use stockbook_store::KeyValueStore;

/// One report row: a stock record plus its line total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub name: String,
    pub amount: i64,
    pub unit_price: u64,
    pub date: NaiveDate,
    pub line_total: u64,
}

/// Read-only snapshot handed to the document generator: the current records
/// as rows plus the two ledger totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReport {
    pub generated_on: NaiveDate,
    pub lines: Vec<ReportLine>,
    pub total_units: i64,
    pub total_value: u64,
}

impl StockReport {
    pub fn new(
        records: &[StockRecord],
        total_units: i64,
        total_value: u64,
        generated_on: NaiveDate,
    ) -> Self {
        let lines = records
            .iter()
            .map(|r| ReportLine {
                name: r.name.clone(),
                amount: r.amount,
                unit_price: r.unit_price,
                date: r.date,
                line_total: r.line_total(),
            })
            .collect();

        Self {
            generated_on,
            lines,
            total_units,
            total_value,
        }
    }

    pub fn from_ledger<S: KeyValueStore>(
        ledger: &InventoryLedger<S>,
        generated_on: NaiveDate,
    ) -> Self {
        Self::new(
            ledger.records(),
            ledger.total_units(),
            ledger.total_value(),
            generated_on,
        )
    }

    /// Fixed-width table with a title, the generation date, one row per
    /// record, and a totals summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Stock Report\n");
        out.push_str(&format!("Generated on: {}\n\n", self.generated_on));
        out.push_str(&format!(
            "{:<20} {:>8} {:>10} {:>12} {:>12}\n",
            "Name", "Quantity", "Price", "Date", "Line total"
        ));

        for line in &self.lines {
            out.push_str(&format!(
                "{:<20} {:>8} {:>10} {:>12} {:>12}\n",
                line.name,
                line.amount,
                format_minor(line.unit_price),
                line.date.to_string(),
                format_minor(line.line_total),
            ));
        }

        out.push_str(&format!(
            "\nTotal units: {}    Total value: {}\n",
            self.total_units,
            format_minor(self.total_value)
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use stockbook_inventory::StockDraft;
    use stockbook_store::InMemoryStore;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample_ledger() -> InventoryLedger<Arc<InMemoryStore>> {
        let mut ledger = InventoryLedger::load(Arc::new(InMemoryStore::new()));
        ledger
            .add(StockDraft {
                name: "Rice".to_string(),
                amount: 10,
                unit_price: 500,
                date: date("2024-01-05"),
            })
            .unwrap();
        ledger
            .add(StockDraft {
                name: "Beans".to_string(),
                amount: 4,
                unit_price: 800,
                date: date("2024-01-01"),
            })
            .unwrap();
        ledger
    }

    #[test]
    fn snapshot_mirrors_the_ledger() {
        let ledger = sample_ledger();
        let report = StockReport::from_ledger(&ledger, date("2024-02-01"));

        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.lines[0].name, "Beans");
        assert_eq!(report.lines[0].line_total, 3200);
        assert_eq!(report.lines[1].line_total, 5000);
        assert_eq!(report.total_units, 14);
        assert_eq!(report.total_value, 8200);
    }

    #[test]
    fn rendered_table_contains_rows_and_totals() {
        let ledger = sample_ledger();
        let report = StockReport::from_ledger(&ledger, date("2024-02-01"));
        let text = report.render_text();

        assert!(text.starts_with("Stock Report\n"));
        assert!(text.contains("Generated on: 2024-02-01"));
        assert!(text.contains("Beans"));
        assert!(text.contains("8.00"));
        assert!(text.contains("Total units: 14"));
        assert!(text.contains("Total value: 82.00"));
    }

    #[test]
    fn empty_ledger_still_renders_a_summary() {
        let ledger = InventoryLedger::load(Arc::new(InMemoryStore::new()));
        let report = StockReport::from_ledger(&ledger, date("2024-02-01"));

        assert!(report.lines.is_empty());
        assert!(report.render_text().contains("Total units: 0"));
    }
}
