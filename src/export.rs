use std::io::Write;

use chrono::NaiveDate;

use crate::error::Result;
use crate::store::Entry;

pub const CSV_HEADERS: [&str; 10] = [
    "SR. NO.",
    "Date",
    "Particular",
    "Chalan No.",
    "Vehicle No.",
    "Driver Name",
    "From",
    "To",
    "Quantity",
    "Amount",
];

/// Write entries as CSV, one row per entry in the order given.
///
/// Dates render as DD/MM/YYYY and an unbilled amount is left blank.
pub fn write_csv<W: Write>(entries: &[Entry], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;

    for entry in entries {
        csv.write_record([
            entry.sr_no.to_string(),
            entry.display_date(),
            entry.particular.clone(),
            entry.chalan_no.clone(),
            entry.vehicle_no.clone(),
            entry.driver_name.clone(),
            entry.from.clone(),
            entry.to.clone(),
            entry.quantity.to_string(),
            entry.amount.map(|a| a.to_string()).unwrap_or_default(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

pub fn default_file_name(today: NaiveDate) -> String {
    format!("logistics-entries-{}.csv", today.format("%Y-%m-%d"))
}
