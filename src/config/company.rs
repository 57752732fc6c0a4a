use serde::{Deserialize, Serialize};

use crate::aggregate::DEFAULT_TAX_RATE;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub company: Company,
    #[serde(default)]
    pub billing: BillingSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Printed as "Bill From" on monthly bills.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub gst_no: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BillingSettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            tax_rate: default_tax_rate(),
            number_prefix: default_number_prefix(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct StorageSettings {
    /// Where entry blobs live (default: <config dir>/data)
    #[serde(default)]
    pub data_dir: Option<String>,
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

fn default_number_prefix() -> String {
    "BILL".to_string()
}
