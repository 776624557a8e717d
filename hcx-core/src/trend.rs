use crate::payload::{Candidates, Payload};
use serde::Serialize;
use serde_json::Value;

const SLOPE: Candidates = &["trend.slope", "slope"];
const INTERCEPT: Candidates = &["trend.intercept", "intercept"];
const R_SQUARED: Candidates = &["trend.r_squared", "trend.r2", "r_squared", "r2"];
const P_VALUE: Candidates = &["trend.p_value", "p_value"];
const STD_ERR: Candidates = &["trend.std_err", "trend.stderr", "std_err", "stderr"];
const PER_DECADE: Candidates = &["trend.per_decade", "per_decade"];
const PERCENT_CHANGE: Candidates = &["trend.percent_change", "percent_change"];
const MANN_KENDALL: Candidates = &["trend.mann_kendall", "mann_kendall"];

/// Direction reported when the Mann-Kendall block omits one.
pub const DEFAULT_MANN_KENDALL_DIRECTION: &str = "no trend";

/// Non-parametric confirmation of the linear trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MannKendall {
    pub trend_direction: String,
    pub p_value: f64,
    pub tau: f64,
}

/// Linear fit of the series against calendar year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendResult {
    pub slope: f64,
    pub intercept: f64,
    /// Clamped to `[0, 1]`.
    pub r_squared: f64,
    pub p_value: f64,
    pub std_err: f64,
    pub per_decade: f64,
    pub percent_change: f64,
    pub mann_kendall: Option<MannKendall>,
}

impl TrendResult {
    /// `per_decade` falls back to `slope * 10` when the service omits it.
    pub fn from_payload(raw: &Value) -> TrendResult {
        let payload = Payload::new(raw);
        let slope = payload.number_or(SLOPE, 0.0);
        let r_squared = payload.number_or(R_SQUARED, 0.0);
        let r_squared = if r_squared.is_nan() {
            0.0
        } else {
            r_squared.clamp(0.0, 1.0)
        };
        let mann_kendall = payload.object(MANN_KENDALL).map(|mk| MannKendall {
            trend_direction: mk
                .string(&["trend", "trend_direction", "direction"])
                .unwrap_or(DEFAULT_MANN_KENDALL_DIRECTION)
                .to_string(),
            p_value: mk.number_or(&["p_value"], 0.0),
            tau: mk.number_or(&["tau"], 0.0),
        });
        TrendResult {
            slope,
            intercept: payload.number_or(INTERCEPT, 0.0),
            r_squared,
            p_value: payload.number_or(P_VALUE, 0.0),
            std_err: payload.number_or(STD_ERR, 0.0),
            per_decade: payload.number_or(PER_DECADE, slope * 10.0),
            percent_change: payload.number_or(PERCENT_CHANGE, 0.0),
            mann_kendall,
        }
    }

    /// Fitted value for a calendar year.
    pub fn value_at(&self, year: i32) -> f64 {
        self.intercept + self.slope * f64::from(year)
    }
}
