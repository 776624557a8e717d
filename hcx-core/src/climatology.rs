use crate::payload::{Candidates, Payload};
use serde::Serialize;
use serde_json::Value;

/// Canonical month labels, January first.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTH_LABELS: Candidates = &["data.months", "months"];
const MEANS: Candidates = &["data.values", "data.means", "values", "means"];
const STDS: Candidates = &["data.std", "data.stds", "std", "stds"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub month_label: String,
    pub mean_value: f64,
    pub std_value: f64,
}

/// Twelve monthly aggregates, Jan through Dec.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Climatology {
    pub months: Vec<MonthlyAggregate>,
}

impl Climatology {
    /// Always yields exactly twelve entries. Missing labels fall back to
    /// [`MONTHS`], missing values to `0.0`; anything past December is ignored.
    pub fn from_payload(raw: &Value) -> Climatology {
        let payload = Payload::new(raw);
        let labels = payload.strings(MONTH_LABELS);
        let means = payload.numbers(MEANS);
        let stds = payload.numbers(STDS);
        let months = MONTHS
            .into_iter()
            .enumerate()
            .map(|(i, default_label)| MonthlyAggregate {
                month_label: labels
                    .get(i)
                    .map(|label| label.trim())
                    .filter(|label| !label.is_empty())
                    .unwrap_or(default_label)
                    .to_string(),
                mean_value: means.get(i).copied().unwrap_or(0.0),
                std_value: stds.get(i).copied().unwrap_or(0.0),
            })
            .collect();
        Climatology { months }
    }
}

impl Default for Climatology {
    fn default() -> Self {
        Climatology::from_payload(&Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_climatology() {
        let values: Vec<f64> = (1..=12).map(f64::from).collect();
        let raw = json!({"months": MONTHS, "values": values, "std": vec![0.5; 12]});
        let clim = Climatology::from_payload(&raw);
        assert_eq!(clim.months.len(), 12);
        assert_eq!(clim.months[11].month_label, "Dec");
        assert_eq!(clim.months[11].mean_value, 12.0);
        assert_eq!(clim.months[0].std_value, 0.5);
    }

    #[test]
    fn test_missing_labels_defaulted() {
        let raw = json!({"data": {"values": [1.0, 2.0, 3.0]}});
        let clim = Climatology::from_payload(&raw);
        assert_eq!(clim.months.len(), 12);
        let labels: Vec<&str> = clim.months.iter().map(|m| m.month_label.as_str()).collect();
        assert_eq!(labels, MONTHS.to_vec());
        assert_eq!(clim.months[2].mean_value, 3.0);
        assert_eq!(clim.months[3].mean_value, 0.0);
    }

    #[test]
    fn test_extra_entries_ignored() {
        let raw = json!({"values": vec![1.0; 14], "months": ["January"]});
        let clim = Climatology::from_payload(&raw);
        assert_eq!(clim.months.len(), 12);
        assert_eq!(clim.months[0].month_label, "January");
        assert_eq!(clim.months[1].month_label, "Feb");
    }

    #[test]
    fn test_nested_and_flat_are_equivalent() {
        let nested = json!({"data": {"months": ["Jan"], "means": [4.0], "stds": [1.0]}});
        let flat = json!({"months": ["Jan"], "values": [4.0], "std": [1.0]});
        assert_eq!(Climatology::from_payload(&nested), Climatology::from_payload(&flat));
    }
}
