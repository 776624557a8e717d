use crate::payload::{Candidates, Payload};
use serde::Serialize;
use serde_json::Value;

const MEAN: Candidates = &["statistics.mean", "mean"];
const MEDIAN: Candidates = &["statistics.median", "median"];
const MIN: Candidates = &["statistics.min", "min"];
const MAX: Candidates = &["statistics.max", "max"];
const STD: Candidates = &["statistics.std", "statistics.std_dev", "std", "std_dev"];
const COUNT: Candidates = &["statistics.count", "count"];
const PERCENTILES: Candidates = &["statistics.percentiles", "percentiles"];

/// Percentile set reported alongside the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Scalar summary of a time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
    pub count: u64,
    pub percentiles: Option<Percentiles>,
}

impl Statistics {
    pub fn from_payload(raw: &Value) -> Statistics {
        let payload = Payload::new(raw);
        let count = payload
            .number(COUNT)
            .filter(|c| c.is_finite() && *c > 0.0)
            .map(|c| c.round() as u64)
            .unwrap_or(0);
        let percentiles = payload.object(PERCENTILES).map(|p| Percentiles {
            p5: p.number_or(&["p5"], 0.0),
            p25: p.number_or(&["p25"], 0.0),
            p75: p.number_or(&["p75"], 0.0),
            p95: p.number_or(&["p95"], 0.0),
        });
        Statistics {
            mean: payload.number_or(MEAN, 0.0),
            median: payload.number_or(MEDIAN, 0.0),
            min: payload.number_or(MIN, 0.0),
            max: payload.number_or(MAX, 0.0),
            std: payload.number_or(STD, 0.0),
            count,
            percentiles,
        }
    }

    /// `min <= median <= max`, as the service promises.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.median && self.median <= self.max
    }
}
