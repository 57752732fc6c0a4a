mod generator;

pub use generator::{bill_number, build_bill, build_bill_now, parse_month, BillData, BillLine};
