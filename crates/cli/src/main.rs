//! `stockbook` — terminal front end for the stock and sales ledgers.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stockbook_core::EntryId;
use stockbook_core::money::{format_minor, parse_minor};
use stockbook_inventory::{InventoryLedger, StockDraft};
use stockbook_report::StockReport;
use stockbook_sales::{SaleDraft, SaleSelector, SalesLedger};
use stockbook_store::JsonFileStore;

#[derive(Parser)]
#[command(name = "stockbook", about = "Stock and sales bookkeeping", version)]
struct Cli {
    /// Data directory. Defaults to $STOCKBOOK_DATA_DIR, then the OS app-data
    /// directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a stock entry.
    AddStock {
        name: String,
        amount: i64,
        /// Unit price as a decimal amount, e.g. 5.00
        price: String,
        /// Purchase date, YYYY-MM-DD
        date: NaiveDate,
    },
    /// List stock entries in date order.
    ListStocks,
    /// Replace a stock entry (address it by the id shown in list-stocks).
    UpdateStock {
        id: EntryId,
        name: String,
        amount: i64,
        price: String,
        date: NaiveDate,
    },
    /// Delete a stock entry by id.
    DeleteStock { id: EntryId },
    /// Record a sale.
    AddSale {
        stock_name: String,
        quantity: i64,
        price: String,
    },
    /// List recorded sales in entry order.
    ListSales,
    /// Delete a sale by id, or the first one matching --name/--quantity/--price.
    DeleteSale(DeleteSaleArgs),
    /// Show the ledger totals.
    Totals,
    /// Print the stock report.
    Report,
}

#[derive(Args)]
#[group(required = true, multiple = true)]
struct DeleteSaleArgs {
    /// Sale id from list-sales.
    id: Option<EntryId>,

    #[arg(long, requires = "quantity", requires = "price")]
    name: Option<String>,

    #[arg(long)]
    quantity: Option<i64>,

    /// Decimal amount, e.g. 6.00
    #[arg(long)]
    price: Option<String>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;
    tracing::debug!(dir = %data_dir.display(), "using data directory");
    let store = JsonFileStore::new(data_dir);

    match cli.command {
        Command::AddStock {
            name,
            amount,
            price,
            date,
        } => {
            let mut ledger = InventoryLedger::load(store);
            let id = ledger.add(StockDraft {
                name,
                amount,
                unit_price: parse_price(&price)?,
                date,
            })?;
            println!("added stock {id}");
        }
        Command::ListStocks => {
            let ledger = InventoryLedger::load(store);
            if ledger.is_empty() {
                println!("no stock recorded");
                return Ok(());
            }
            for record in ledger.records() {
                println!(
                    "{}  {:<20} qty {:<6} @ {:>10}  {}  total {}",
                    record.id,
                    record.name,
                    record.amount,
                    format_minor(record.unit_price),
                    record.date,
                    format_minor(record.line_total()),
                );
            }
        }
        Command::UpdateStock {
            id,
            name,
            amount,
            price,
            date,
        } => {
            let mut ledger = InventoryLedger::load(store);
            ledger.update(
                id,
                StockDraft {
                    name,
                    amount,
                    unit_price: parse_price(&price)?,
                    date,
                },
            )?;
            println!("updated stock {id}");
        }
        Command::DeleteStock { id } => {
            let mut ledger = InventoryLedger::load(store);
            let removed = ledger.remove(id)?;
            println!("deleted stock {} ({})", id, removed.name);
        }
        Command::AddSale {
            stock_name,
            quantity,
            price,
        } => {
            let mut ledger = SalesLedger::load(store);
            let id = ledger.add(SaleDraft {
                stock_name,
                quantity,
                unit_price: parse_price(&price)?,
            })?;
            println!("added sale {id}");
        }
        Command::ListSales => {
            let ledger = SalesLedger::load(store);
            if ledger.is_empty() {
                println!("no sales recorded");
                return Ok(());
            }
            for record in ledger.records() {
                println!(
                    "{}  {:<20} qty {:<6} @ {:>10}  total {}",
                    record.id,
                    record.stock_name,
                    record.quantity,
                    format_minor(record.unit_price),
                    format_minor(record.line_total()),
                );
            }
        }
        Command::DeleteSale(args) => {
            let mut ledger = SalesLedger::load(store);
            match args.id {
                Some(id) => {
                    ledger.remove(id)?;
                    println!("deleted sale {id}");
                }
                None => {
                    let selector = SaleSelector {
                        stock_name: args.name.context("--name is required without an id")?,
                        quantity: args.quantity.context("--quantity is required without an id")?,
                        unit_price: parse_price(
                            &args.price.context("--price is required without an id")?,
                        )?,
                    };
                    match ledger.remove_matching(&selector)? {
                        Some(removed) => println!("deleted sale {}", removed.id),
                        None => println!("no matching sale"),
                    }
                }
            }
        }
        Command::Totals => {
            let inventory = InventoryLedger::load(store.clone());
            let sales = SalesLedger::load(store);
            println!("total units:       {}", inventory.total_units());
            println!("total stock value: {}", format_minor(inventory.total_value()));
            println!("total sales value: {}", format_minor(sales.total_sales_value()));
        }
        Command::Report => {
            let ledger = InventoryLedger::load(store);
            let report = StockReport::from_ledger(&ledger, Local::now().date_naive());
            print!("{}", report.render_text());
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn parse_price(input: &str) -> anyhow::Result<u64> {
    parse_minor(input).with_context(|| format!("invalid price {input:?}"))
}

/// Flag, then environment, then the OS app-data directory.
fn resolve_data_dir(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Ok(dir) = std::env::var("STOCKBOOK_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve an app data directory")?;

    Ok(base.join("stockbook"))
}
