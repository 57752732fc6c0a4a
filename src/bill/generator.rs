use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::aggregate::{entries_in_month, invoice_total, month_label, total_quantity};
use crate::config::{Company, Config};
use crate::error::{LogisticsError, Result};
use crate::query::sort_by_date;
use crate::store::Entry;

/// A single row on the bill
#[derive(Debug, Serialize)]
pub struct BillLine {
    pub index: usize,
    pub date: String,
    pub particular: String,
    pub vehicle_no: String,
    pub route: String,
    pub quantity: f64,
    /// `None` for trips that were never billed
    pub amount: Option<f64>,
}

/// Complete bill data for table and PDF rendering
#[derive(Debug, Serialize)]
pub struct BillData {
    pub number: String,
    pub date: String,
    pub month: String,
    pub period: String,
    pub company: Company,
    pub bill_to: String,
    pub lines: Vec<BillLine>,
    pub total_quantity: f64,
    pub subtotal: f64,
    /// Percentage, e.g. 18.0
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub currency_symbol: String,
}

/// Validate a `YYYY-MM` month and return its first day.
pub fn parse_month(month: &str) -> Result<NaiveDate> {
    if month.len() != 7 {
        return Err(LogisticsError::InvalidMonth(month.to_string()));
    }
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|_| LogisticsError::InvalidMonth(month.to_string()))
}

/// Bill number from the last six digits of the millisecond clock, e.g. "BILL-482913".
pub fn bill_number(prefix: &str, millis: i64) -> String {
    format!("{}-{:06}", prefix, millis.rem_euclid(1_000_000))
}

/// Build the bill for one calendar month of entries.
pub fn build_bill<Tz: TimeZone>(
    entries: &[Entry],
    month: &str,
    bill_to: &str,
    config: &Config,
    now: DateTime<Tz>,
) -> Result<BillData> {
    parse_month(month)?;

    let mut selected = entries_in_month(entries, month);
    if selected.is_empty() {
        return Err(LogisticsError::NoEntriesForMonth(month_label(month)));
    }
    sort_by_date(&mut selected);

    let totals = invoice_total(&selected, config.billing.tax_rate);

    let lines = selected
        .iter()
        .enumerate()
        .map(|(i, entry)| BillLine {
            index: i + 1,
            date: entry.display_date(),
            particular: entry.particular.clone(),
            vehicle_no: entry.vehicle_no.clone(),
            route: entry.route(),
            quantity: entry.quantity,
            amount: entry.amount,
        })
        .collect();

    Ok(BillData {
        number: bill_number(&config.billing.number_prefix, now.timestamp_millis()),
        date: now.date_naive().format("%d/%m/%Y").to_string(),
        month: month.to_string(),
        period: month_label(month),
        company: config.company.clone(),
        bill_to: bill_to.to_string(),
        lines,
        total_quantity: total_quantity(&selected),
        subtotal: totals.subtotal,
        tax_rate: totals.tax_rate * 100.0, // Convert to percentage
        tax_amount: totals.tax,
        total: totals.total,
        currency_symbol: config.billing.currency_symbol.clone(),
    })
}

/// Bill for the current local time.
pub fn build_bill_now(
    entries: &[Entry],
    month: &str,
    bill_to: &str,
    config: &Config,
) -> Result<BillData> {
    build_bill(entries, month, bill_to, config, Local::now())
}
