use crate::{
    anomaly::AnomalySet, climatology::Climatology, forecast::ForecastResult,
    impact::ImpactAssessment, scenario::ScenarioSet, statistics::Statistics,
    time_series::TimeSeries, trend::TrendResult, year_range::YearRange,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything one analysis run produced.
///
/// Built once per run and never patched afterwards; a new run replaces it.
/// `time_series` and `statistics` are always present, every other part only
/// when it was requested and its call succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub variable: String,
    pub region: String,
    pub years: YearRange,
    pub created_at: DateTime<Utc>,
    pub time_series: TimeSeries,
    pub statistics: Statistics,
    pub climatology: Option<Climatology>,
    pub trend: Option<TrendResult>,
    pub anomalies: Option<AnomalySet>,
    pub forecast: Option<ForecastResult>,
    pub scenarios: Option<ScenarioSet>,
    pub impact: Option<ImpactAssessment>,
}

impl AnalysisResult {
    /// A result holding only the essential parts.
    pub fn new(
        variable: &str,
        region: &str,
        years: YearRange,
        created_at: DateTime<Utc>,
        time_series: TimeSeries,
        statistics: Statistics,
    ) -> AnalysisResult {
        AnalysisResult {
            variable: variable.to_string(),
            region: region.to_string(),
            years,
            created_at,
            time_series,
            statistics,
            climatology: None,
            trend: None,
            anomalies: None,
            forecast: None,
            scenarios: None,
            impact: None,
        }
    }
}
