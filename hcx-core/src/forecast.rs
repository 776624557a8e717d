use crate::payload::{Candidates, Payload};
use chrono::NaiveDate;
use hcx_utils::dates::parse_date;
use log::debug;
use serde::Serialize;
use serde_json::Value;

/// Forecast horizon in years requested by a standard analysis run.
pub const DEFAULT_FORECAST_YEARS: u32 = 5;

/// Qualitative label used when the service omits one.
pub const DEFAULT_TREND_LABEL: &str = "stable";

const DATES: Candidates = &["forecast.dates", "dates"];
const VALUES: Candidates = &["forecast.values", "forecast.yhat", "values", "yhat"];
const LOWER: Candidates = &["forecast.lower", "forecast.lower_bound", "lower", "lower_bound"];
const UPPER: Candidates = &["forecast.upper", "forecast.upper_bound", "upper", "upper_bound"];
const TREND_LABEL: Candidates = &["forecast.trend", "trend", "trend_label"];
const CHANGE_RATE: Candidates = &["forecast.change_rate", "change_rate"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub points: Vec<ForecastPoint>,
    pub trend_label: String,
    pub change_rate: f64,
}

impl ForecastResult {
    /// Points follow `dates`; an unparseable date drops its point and
    /// missing estimates or bounds default to `0.0`.
    pub fn from_payload(raw: &Value) -> ForecastResult {
        let payload = Payload::new(raw);
        let values = payload.numbers(VALUES);
        let lower = payload.numbers(LOWER);
        let upper = payload.numbers(UPPER);
        let points = payload
            .strings(DATES)
            .iter()
            .enumerate()
            .filter_map(|(i, date)| match parse_date(date) {
                Ok(date) => Some(ForecastPoint {
                    date,
                    point_estimate: values.get(i).copied().unwrap_or(0.0),
                    lower_bound: lower.get(i).copied().unwrap_or(0.0),
                    upper_bound: upper.get(i).copied().unwrap_or(0.0),
                }),
                Err(e) => {
                    debug!("Dropping forecast point: {}", e);
                    None
                }
            })
            .collect();
        ForecastResult {
            points,
            trend_label: payload
                .string(TREND_LABEL)
                .unwrap_or(DEFAULT_TREND_LABEL)
                .to_string(),
            change_rate: payload.number_or(CHANGE_RATE, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_forecast() {
        let raw = json!({
            "dates": ["2021-01-01", "2022-01-01"],
            "values": [15.1, 15.3],
            "lower": [14.0, 14.1],
            "upper": [16.2, 16.6],
            "trend": "increasing",
            "change_rate": 0.2
        });
        let forecast = ForecastResult::from_payload(&raw);
        assert_eq!(forecast.points.len(), 2);
        assert_eq!(forecast.points[1].upper_bound, 16.6);
        assert_eq!(forecast.trend_label, "increasing");
    }

    #[test]
    fn test_nested_and_flat_are_equivalent() {
        let nested = json!({"forecast": {
            "dates": ["2021-06-01"],
            "yhat": [1.0],
            "lower_bound": [0.5],
            "upper_bound": [1.5],
            "trend": "decreasing",
            "change_rate": -0.1
        }});
        let flat = json!({
            "dates": ["2021-06-01"],
            "values": [1.0],
            "lower": [0.5],
            "upper": [1.5],
            "trend": "decreasing",
            "change_rate": -0.1
        });
        assert_eq!(ForecastResult::from_payload(&nested), ForecastResult::from_payload(&flat));
    }

    #[test]
    fn test_missing_fields_default() {
        let forecast = ForecastResult::from_payload(&json!({"dates": ["2021-01-01"]}));
        assert_eq!(forecast.trend_label, DEFAULT_TREND_LABEL);
        assert_eq!(forecast.change_rate, 0.0);
        assert_eq!(forecast.points[0].point_estimate, 0.0);
        assert_eq!(forecast.points[0].lower_bound, 0.0);
    }
}
