//! `stockbook-report` — stock report snapshots.
//!
//! Document generators (PDF, print) live outside this workspace; they are
//! fed a serializable snapshot of the stock rows and totals. A plain-text
//! renderer covers terminal output.

pub mod stock_report;

pub use stock_report::{ReportLine, StockReport};
