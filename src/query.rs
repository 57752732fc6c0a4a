use crate::aggregate::month_key;
use crate::store::{Entry, EntryField};

/// Filter options for the entries view. Every option is independent; `None` or
/// an empty string means "no constraint", and all present options must match.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// `YYYY-MM` prefix matched against the entry's month.
    pub month: Option<String>,
    pub vehicle_no: Option<String>,
    pub driver_name: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub particular: Option<String>,
    pub chalan_no: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub min_quantity: Option<f64>,
    pub max_quantity: Option<f64>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(month) = non_empty(&self.month) {
            if !month_key(entry.date).starts_with(month) {
                return false;
            }
        }

        let text_ok = self
            .text_constraints()
            .into_iter()
            .filter_map(|(field, needle)| non_empty(needle).map(|n| (field, n)))
            .all(|(field, needle)| contains_ignore_case(field.value(entry), needle));
        if !text_ok {
            return false;
        }

        let amount = entry.billed_amount();
        within(amount, self.min_amount, self.max_amount)
            && within(entry.quantity, self.min_quantity, self.max_quantity)
    }

    /// Number of options currently constraining the result.
    pub fn active_count(&self) -> usize {
        let text = self
            .text_constraints()
            .into_iter()
            .filter(|(_, needle)| non_empty(needle).is_some())
            .count();
        let month = usize::from(non_empty(&self.month).is_some());
        let bounds = [
            self.min_amount,
            self.max_amount,
            self.min_quantity,
            self.max_quantity,
        ]
        .iter()
        .filter(|b| b.is_some())
        .count();

        month + text + bounds
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    fn text_constraints(&self) -> [(EntryField, &Option<String>); 6] {
        [
            (EntryField::VehicleNo, &self.vehicle_no),
            (EntryField::DriverName, &self.driver_name),
            (EntryField::From, &self.from),
            (EntryField::To, &self.to),
            (EntryField::Particular, &self.particular),
            (EntryField::ChalanNo, &self.chalan_no),
        ]
    }
}

/// Entries matching every option of `filter`, in input order.
pub fn filter(entries: &[Entry], filter: &EntryFilter) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect()
}

/// Parse a numeric bound leniently: anything that is not a finite number is no bound at all.
pub fn parse_bound(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Chronological order by entry date; same-day entries keep insertion order.
pub fn sort_by_date(entries: &mut [Entry]) {
    entries.sort_by_key(|entry| entry.date);
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}
