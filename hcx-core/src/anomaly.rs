use crate::payload::{as_i32, Candidates, Payload};
use log::debug;
use serde::Serialize;
use serde_json::Value;

/// Standard deviations beyond which a period counts as anomalous.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;

const YEARS: Candidates = &["data.years", "years"];
const VALUES: Candidates = &["data.values", "values"];
const Z_SCORES: Candidates = &["data.z_scores", "z_scores"];
const THRESHOLD: Candidates = &["data.threshold", "threshold"];
const ANOMALIES: Candidates = &["data.anomalies", "anomalies"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    High,
    Low,
}

impl AnomalyKind {
    pub fn from_z_score(z_score: f64) -> AnomalyKind {
        if z_score > 0.0 {
            AnomalyKind::High
        } else {
            AnomalyKind::Low
        }
    }
}

/// One period of the series with its standardized score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyEntry {
    pub year: i32,
    pub value: f64,
    pub z_score: f64,
}

/// An entry whose `|z_score|` exceeds the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anomaly {
    pub year: i32,
    pub value: f64,
    pub z_score: f64,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalySet {
    pub entries: Vec<AnomalyEntry>,
    pub threshold: f64,
    pub anomalies: Vec<Anomaly>,
}

impl AnomalySet {
    /// Entries follow `years`; missing values and scores default to `0.0`.
    ///
    /// The flagged subset is always derived from the entries and threshold.
    /// A service-side `anomalies` list is only checked against it; years it
    /// disagrees on are logged and ignored.
    pub fn from_payload(raw: &Value) -> AnomalySet {
        let payload = Payload::new(raw);
        let values = payload.numbers(VALUES);
        let z_scores = payload.numbers(Z_SCORES);
        let entries: Vec<AnomalyEntry> = payload
            .array(YEARS)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .filter_map(|(i, year)| {
                as_i32(year).map(|year| AnomalyEntry {
                    year,
                    value: values.get(i).copied().unwrap_or(0.0),
                    z_score: z_scores.get(i).copied().unwrap_or(0.0),
                })
            })
            .collect();
        let threshold = payload
            .number(THRESHOLD)
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(DEFAULT_ANOMALY_THRESHOLD);
        let anomalies = derive_anomalies(&entries, threshold);
        if let Some(items) = payload.array(ANOMALIES) {
            report_disagreements(items, &anomalies);
        }
        AnomalySet {
            entries,
            threshold,
            anomalies,
        }
    }

    pub fn is_anomalous(&self, entry: &AnomalyEntry) -> bool {
        entry.z_score.abs() > self.threshold
    }
}

/// Entries with `|z_score| > threshold`, tagged by sign.
pub fn derive_anomalies(entries: &[AnomalyEntry], threshold: f64) -> Vec<Anomaly> {
    entries
        .iter()
        .filter(|entry| entry.z_score.abs() > threshold)
        .map(|entry| Anomaly {
            year: entry.year,
            value: entry.value,
            z_score: entry.z_score,
            kind: AnomalyKind::from_z_score(entry.z_score),
        })
        .collect()
}

fn report_disagreements(items: &[Value], derived: &[Anomaly]) {
    let listed: Vec<i32> = items
        .iter()
        .filter_map(|item| Payload::new(item).first(&["year"]).and_then(as_i32))
        .collect();
    for year in listed.iter().filter(|year| !derived.iter().any(|a| a.year == **year)) {
        debug!("Ignoring listed anomaly for {}: not beyond the threshold", year);
    }
    for anomaly in derived.iter().filter(|a| !listed.contains(&a.year)) {
        debug!("Anomaly for {} missing from the service list", anomaly.year);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derived_subset_without_server_list() {
        let raw = json!({
            "years": [2000, 2001, 2002, 2003],
            "values": [1.0, 5.0, -3.0, 0.2],
            "z_scores": [0.1, 2.4, -2.01, 2.0]
        });
        let set = AnomalySet::from_payload(&raw);
        assert_eq!(set.threshold, DEFAULT_ANOMALY_THRESHOLD);
        assert_eq!(set.entries.len(), 4);
        let flagged: Vec<(i32, AnomalyKind)> =
            set.anomalies.iter().map(|a| (a.year, a.kind)).collect();
        assert_eq!(flagged, vec![(2001, AnomalyKind::High), (2002, AnomalyKind::Low)]);
    }

    #[test]
    fn test_server_list_does_not_override_threshold() {
        let raw = json!({
            "data": {
                "years": [1990, 1991],
                "values": [9.0, 4.0],
                "z_scores": [3.1, -2.7],
                "threshold": 2.5,
                "anomalies": [
                    {"year": 1990, "value": 9.0, "z_score": 3.1, "type": "HIGH"},
                    {"year": 1985, "z_score": -2.9},
                    {"value": 1.0}
                ]
            }
        });
        let set = AnomalySet::from_payload(&raw);
        assert_eq!(set.threshold, 2.5);
        let flagged: Vec<(i32, AnomalyKind)> =
            set.anomalies.iter().map(|a| (a.year, a.kind)).collect();
        assert_eq!(flagged, vec![(1990, AnomalyKind::High), (1991, AnomalyKind::Low)]);
    }

    #[test]
    fn test_disagreeing_server_list_ignored() {
        let raw = json!({
            "years": [2000, 2001],
            "values": [12.0, 10.1],
            "z_scores": [3.0, 0.1],
            "threshold": 2.0,
            "anomalies": [{"year": 2001, "z_score": 0.1}]
        });
        let set = AnomalySet::from_payload(&raw);
        let flagged: Vec<i32> = set
            .entries
            .iter()
            .filter(|entry| set.is_anomalous(entry))
            .map(|entry| entry.year)
            .collect();
        let subset: Vec<i32> = set.anomalies.iter().map(|a| a.year).collect();
        assert_eq!(flagged, vec![2000]);
        assert_eq!(subset, flagged);
    }

    #[test]
    fn test_missing_scores_default() {
        let set = AnomalySet::from_payload(&json!({"years": [2000, 2001], "threshold": -1}));
        assert_eq!(set.entries[1].z_score, 0.0);
        assert_eq!(set.entries[1].value, 0.0);
        assert_eq!(set.threshold, DEFAULT_ANOMALY_THRESHOLD);
        assert!(set.anomalies.is_empty());
    }

    #[test]
    fn test_nested_and_flat_are_equivalent() {
        let body = json!({"years": [1], "values": [2.0], "z_scores": [-4.0], "threshold": 2.0});
        let nested = json!({ "data": body.clone() });
        assert_eq!(AnomalySet::from_payload(&nested), AnomalySet::from_payload(&body));
    }
}
