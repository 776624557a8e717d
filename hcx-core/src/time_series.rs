use crate::payload::{as_i32, Candidates, Payload};
use chrono::NaiveDateTime;
use hcx_utils::dates::parse_timestamp;
use log::debug;
use serde::Serialize;
use serde_json::Value;

const TIMES: Candidates = &["data.times", "data.dates", "times", "dates"];
const VALUES: Candidates = &["data.values", "values"];
const YEARS: Candidates = &["data.years", "years"];

/// A single observation of a climate variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    /// Measurement in the variable's physical unit.
    pub value: f64,
}

/// Observations in the order the service returned them (assumed chronological).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    pub points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Pair `times[i]` with `values[i]`.
    ///
    /// Pairs stop at the shorter of the two sequences. A timestamp that does
    /// not parse drops its pair; there is no instant to plot it at.
    pub fn from_payload(raw: &Value) -> TimeSeries {
        let payload = Payload::new(raw);
        let times = payload.strings(TIMES);
        let values = payload.numbers(VALUES);
        let points = times
            .iter()
            .zip(values)
            .filter_map(|(time, value)| match parse_timestamp(time) {
                Ok(timestamp) => Some(TimeSeriesPoint { timestamp, value }),
                Err(e) => {
                    debug!("Dropping time series point: {}", e);
                    None
                }
            })
            .collect();
        TimeSeries { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One value per calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualValue {
    pub year: i32,
    pub value: f64,
}

/// Annual aggregate of a variable (`/data/annual`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnualSeries {
    pub values: Vec<AnnualValue>,
}

impl AnnualSeries {
    pub fn from_payload(raw: &Value) -> AnnualSeries {
        let payload = Payload::new(raw);
        let years = payload.array(YEARS).unwrap_or_default();
        let values = payload.numbers(VALUES);
        let values = years
            .iter()
            .zip(values)
            .filter_map(|(year, value)| as_i32(year).map(|year| AnnualValue { year, value }))
            .collect();
        AnnualSeries { values }
    }
}
