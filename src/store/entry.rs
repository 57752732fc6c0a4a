use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single trip or shipment record.
///
/// Entries are only ever produced by [`EntryStore::create`](super::EntryStore::create);
/// the persisted layout uses camelCase field names (`srNo`, `vehicleNo`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub sr_no: i64,
    pub date: NaiveDate,
    pub particular: String,
    #[serde(default)]
    pub chalan_no: String,
    #[serde(default)]
    pub vehicle_no: String,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub quantity: f64,
    /// `None` means "not billed", which is not the same as a zero amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Amount used for sums and bounds (absent counts as zero).
    pub fn billed_amount(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// Date as shown on bills and exports (DD/MM/YYYY)
    pub fn display_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    pub fn route(&self) -> String {
        format!("{} → {}", self.from, self.to)
    }
}

/// Text fields of an [`Entry`] that can be filtered, counted or ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    VehicleNo,
    DriverName,
    From,
    To,
    Particular,
    ChalanNo,
}

impl EntryField {
    pub fn value(self, entry: &Entry) -> &str {
        match self {
            EntryField::VehicleNo => &entry.vehicle_no,
            EntryField::DriverName => &entry.driver_name,
            EntryField::From => &entry.from,
            EntryField::To => &entry.to,
            EntryField::Particular => &entry.particular,
            EntryField::ChalanNo => &entry.chalan_no,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntryField::VehicleNo => "Vehicle",
            EntryField::DriverName => "Driver",
            EntryField::From => "From",
            EntryField::To => "To",
            EntryField::Particular => "Particular",
            EntryField::ChalanNo => "Chalan No.",
        }
    }
}

/// Form-level input for a new entry. Numeric fields hold raw user text and
/// are coerced when the entry is created.
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// Blank, zero or unparseable means "assign the next row number".
    pub sr_no: String,
    pub date: NaiveDate,
    pub particular: String,
    pub chalan_no: String,
    pub vehicle_no: String,
    pub driver_name: String,
    pub from: String,
    pub to: String,
    pub quantity: String,
    pub amount: String,
}

impl EntryInput {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            sr_no: String::new(),
            date,
            particular: String::new(),
            chalan_no: String::new(),
            vehicle_no: String::new(),
            driver_name: String::new(),
            from: String::new(),
            to: String::new(),
            quantity: String::new(),
            amount: String::new(),
        }
    }
}

/// Partial update merged over an existing entry. `id` and `created_at` are immutable.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub sr_no: Option<i64>,
    pub date: Option<NaiveDate>,
    pub particular: Option<String>,
    pub chalan_no: Option<String>,
    pub vehicle_no: Option<String>,
    pub driver_name: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub quantity: Option<f64>,
    /// `Some(None)` clears the amount back to "not billed".
    pub amount: Option<Option<f64>>,
}

impl EntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.sr_no.is_none()
            && self.date.is_none()
            && self.particular.is_none()
            && self.chalan_no.is_none()
            && self.vehicle_no.is_none()
            && self.driver_name.is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.quantity.is_none()
            && self.amount.is_none()
    }

    pub(crate) fn apply(self, entry: &mut Entry) {
        if let Some(sr_no) = self.sr_no {
            entry.sr_no = sr_no;
        }
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(particular) = self.particular {
            entry.particular = particular;
        }
        if let Some(chalan_no) = self.chalan_no {
            entry.chalan_no = chalan_no;
        }
        if let Some(vehicle_no) = self.vehicle_no {
            entry.vehicle_no = vehicle_no.to_uppercase();
        }
        if let Some(driver_name) = self.driver_name {
            entry.driver_name = driver_name;
        }
        if let Some(from) = self.from {
            entry.from = from;
        }
        if let Some(to) = self.to {
            entry.to = to;
        }
        if let Some(quantity) = self.quantity {
            entry.quantity = quantity;
        }
        if let Some(amount) = self.amount {
            entry.amount = amount;
        }
    }
}

/// Parse a non-negative decimal from user text. Anything else is `None`.
pub fn parse_decimal(input: &str) -> Option<f64> {
    let value: f64 = input.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

pub fn coerce_quantity(input: &str) -> f64 {
    parse_decimal(input).unwrap_or(0.0)
}

pub fn coerce_amount(input: &str) -> Option<f64> {
    parse_decimal(input)
}

pub(crate) fn coerce_sr_no(input: &str, existing: usize) -> i64 {
    match input.trim().parse::<i64>() {
        Ok(n) if n != 0 => n,
        _ => i64::try_from(existing).map_or(i64::MAX, |n| n.saturating_add(1)),
    }
}
