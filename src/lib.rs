pub mod aggregate;
pub mod bill;
pub mod config;
pub mod error;
pub mod export;
pub mod pdf;
pub mod query;
pub mod store;

pub use aggregate::{invoice_total, monthly_rollup, top_n, Dashboard, InvoiceTotals, MonthlySummary};
pub use bill::{build_bill, BillData};
pub use config::{Company, Config};
pub use error::{LogisticsError, Result};
pub use query::{filter, EntryFilter};
pub use store::{BlobStore, Entry, EntryField, EntryInput, EntryStore, EntryUpdate};
