//! Derived statistics over entry sequences.
//!
//! Everything here is a pure function of its input and is recomputed on every
//! call; nothing is cached between queries.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::store::{Entry, EntryField};

/// GST applied to monthly bills unless configured otherwise.
pub const DEFAULT_TAX_RATE: f64 = 0.18;

/// Width of the dashboard's monthly window, ending at the current month.
pub const ROLLUP_MONTHS: usize = 6;

/// How many rows the dashboard's ranking panels show.
pub const TOP_LIMIT: usize = 5;

pub fn total_amount(entries: &[Entry]) -> f64 {
    entries.iter().map(Entry::billed_amount).sum()
}

pub fn total_quantity(entries: &[Entry]) -> f64 {
    entries.iter().map(|entry| entry.quantity).sum()
}

/// Number of distinct values of `field` (exact match, so case and spacing count).
pub fn unique_count(entries: &[Entry], field: EntryField) -> usize {
    entries
        .iter()
        .map(|entry| field.value(entry))
        .collect::<HashSet<_>>()
        .len()
}

/// Most frequent values of `field`, highest count first. Ties keep the order in
/// which values were first seen.
pub fn top_n(entries: &[Entry], field: EntryField, n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let value = field.value(entry);
        match positions.get(value) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    // sort_by is stable, which preserves first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// `YYYY-MM` key for a calendar date.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Human label for a `YYYY-MM` key, e.g. "October 2026". Unparseable keys are returned as-is.
pub fn month_label(month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|_| month.to_string())
}

/// First day of each of the last `count` months, oldest first, ending with the month of `today`.
pub fn recent_months(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let current = today.year() * 12 + today.month0() as i32;

    (0..count as i32)
        .rev()
        .filter_map(|back| {
            let index = current - back;
            NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        })
        .collect()
}

/// Entries whose date falls in the given month (prefix match on the `YYYY-MM` key).
pub fn entries_in_month(entries: &[Entry], month: &str) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| month_key(entry.date).starts_with(month))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub month: String,
    pub total_entries: usize,
    pub total_quantity: f64,
    pub total_amount: f64,
    pub entries: Vec<Entry>,
}

impl MonthlySummary {
    fn for_month(entries: &[Entry], month: String) -> Self {
        let entries = entries_in_month(entries, &month);
        Self {
            total_entries: entries.len(),
            total_quantity: total_quantity(&entries),
            total_amount: total_amount(&entries),
            month,
            entries,
        }
    }

    pub fn label(&self) -> String {
        month_label(&self.month)
    }
}

/// One bucket per month for the last [`ROLLUP_MONTHS`] months ending at `today`'s
/// month, oldest first. Empty months are still present with zero totals.
pub fn monthly_rollup(entries: &[Entry], today: NaiveDate) -> Vec<MonthlySummary> {
    recent_months(today, ROLLUP_MONTHS)
        .into_iter()
        .map(|start| MonthlySummary::for_month(entries, month_key(start)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax: f64,
    pub total: f64,
}

/// Subtotal of billed amounts plus a flat tax over it.
pub fn invoice_total(entries: &[Entry], tax_rate: f64) -> InvoiceTotals {
    let subtotal = total_amount(entries);
    let tax = subtotal * tax_rate;
    InvoiceTotals {
        subtotal,
        tax_rate,
        tax,
        total: subtotal + tax,
    }
}

/// Dashboard view model.
///
/// Headline figures and rankings cover the selected month (or everything when no
/// month is selected); the monthly rollup always covers the whole collection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub month: Option<String>,
    pub total_entries: usize,
    pub total_quantity: f64,
    pub total_amount: f64,
    pub current_month_entries: usize,
    pub current_month_amount: f64,
    pub unique_vehicles: usize,
    pub unique_drivers: usize,
    pub top_vehicles: Vec<(String, usize)>,
    pub top_drivers: Vec<(String, usize)>,
    pub monthly: Vec<MonthlySummary>,
}

impl Dashboard {
    pub fn compute(entries: &[Entry], month: Option<&str>, today: NaiveDate) -> Self {
        let month = month.filter(|m| !m.is_empty());
        let selected = match month {
            Some(m) => entries_in_month(entries, m),
            None => entries.to_vec(),
        };
        let current = entries_in_month(entries, &month_key(today));

        Self {
            month: month.map(str::to_string),
            total_entries: selected.len(),
            total_quantity: total_quantity(&selected),
            total_amount: total_amount(&selected),
            current_month_entries: current.len(),
            current_month_amount: total_amount(&current),
            unique_vehicles: unique_count(&selected, EntryField::VehicleNo),
            unique_drivers: unique_count(&selected, EntryField::DriverName),
            top_vehicles: top_n(&selected, EntryField::VehicleNo, TOP_LIMIT),
            top_drivers: top_n(&selected, EntryField::DriverName, TOP_LIMIT),
            monthly: monthly_rollup(entries, today),
        }
    }
}
