//! Runs every call an analysis needs and assembles the result.

use chrono::Utc;
use hcx_core::analysis::AnalysisResult;
use hcx_core::anomaly::DEFAULT_ANOMALY_THRESHOLD;
use hcx_core::forecast::DEFAULT_FORECAST_YEARS;
use hcx_core::scenario::DEFAULT_SCENARIO_TARGET_YEAR;
use hcx_core::year_range::{DatasetSpan, TimePeriod, YearRange};
use hcx_core::{AnalyticsSource, GatewayError, SeriesQuery};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which optional calls a run makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub trend: bool,
    pub anomalies: bool,
    pub forecast: bool,
    pub scenarios: bool,
    pub impact: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            trend: true,
            anomalies: false,
            forecast: true,
            scenarios: true,
            impact: true,
        }
    }
}

/// Operation parameters sent with the optional calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub anomaly_threshold: f64,
    pub forecast_years: u32,
    pub scenario_target_year: i32,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        AnalysisParams {
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            forecast_years: DEFAULT_FORECAST_YEARS,
            scenario_target_year: DEFAULT_SCENARIO_TARGET_YEAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub variable: String,
    pub region: String,
    pub period: TimePeriod,
    /// Only read when `period` is [`TimePeriod::Custom`].
    pub custom_years: YearRange,
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    pub fn years(&self, dataset: DatasetSpan) -> YearRange {
        self.period.resolve(dataset, self.custom_years)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The time series or statistics call failed; nothing can be shown.
    #[error("Failed to fetch essential data ({})", .missing.join(", "))]
    EssentialData {
        missing: Vec<&'static str>,
        causes: Vec<GatewayError>,
    },
}

/// `Some` only when the call was made and succeeded.
fn settle_optional<T>(component: &str, outcome: Option<Result<T, GatewayError>>) -> Option<T> {
    match outcome? {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to fetch {}: {}", component, e);
            None
        }
    }
}

/// Run one analysis against `source`.
///
/// All calls are issued at once and every one is allowed to settle before
/// the result is assembled. Only a failed time series or statistics call
/// fails the run; any other failure just leaves its part empty.
pub async fn run_analysis<S>(
    source: &S,
    request: &AnalysisRequest,
    params: &AnalysisParams,
    dataset: DatasetSpan,
) -> Result<AnalysisResult, AnalysisError>
where
    S: AnalyticsSource + ?Sized,
{
    let years = request.years(dataset);
    let query = SeriesQuery::new(&request.variable, &request.region, Some(years));
    let options = request.options;
    let (variable, region) = (request.variable.as_str(), request.region.as_str());
    info!(
        "Running analysis for {} in {} over {} ({})",
        variable, region, years, request.period
    );

    let trend = async {
        if options.trend {
            Some(source.trend(&query).await)
        } else {
            None
        }
    };
    let anomalies = async {
        if options.anomalies {
            Some(source.anomalies(&query, Some(params.anomaly_threshold)).await)
        } else {
            None
        }
    };
    let forecast = async {
        if options.forecast {
            Some(source.forecast(variable, region, Some(params.forecast_years)).await)
        } else {
            None
        }
    };
    let scenarios = async {
        if options.scenarios {
            Some(
                source
                    .scenarios(variable, region, Some(params.scenario_target_year))
                    .await,
            )
        } else {
            None
        }
    };
    let impact = async {
        if options.impact {
            Some(source.impact(variable, region).await)
        } else {
            None
        }
    };

    let (time_series, statistics, climatology, trend, anomalies, forecast, scenarios, impact) =
        futures::join!(
            source.time_series(&query),
            source.statistics(&query),
            source.climatology(&query),
            trend,
            anomalies,
            forecast,
            scenarios,
            impact
        );

    let (time_series, statistics) = match (time_series, statistics) {
        (Ok(time_series), Ok(statistics)) => (time_series, statistics),
        (time_series, statistics) => {
            let mut missing = Vec::new();
            let mut causes = Vec::new();
            if let Err(e) = time_series {
                missing.push("time_series");
                causes.push(e);
            }
            if let Err(e) = statistics {
                missing.push("statistics");
                causes.push(e);
            }
            let err = AnalysisError::EssentialData { missing, causes };
            error!("{}", err);
            return Err(err);
        }
    };

    let mut result = AnalysisResult::new(
        variable,
        region,
        years,
        Utc::now(),
        time_series,
        statistics,
    );
    result.climatology = settle_optional("climatology", Some(climatology));
    result.trend = settle_optional("trend", trend);
    result.anomalies = settle_optional("anomalies", anomalies);
    result.forecast = settle_optional("forecast", forecast);
    result.scenarios = settle_optional("scenarios", scenarios);
    result.impact = settle_optional("impact", impact);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSource;

    fn request(options: AnalysisOptions) -> AnalysisRequest {
        AnalysisRequest {
            variable: "tmp".to_string(),
            region: "C4000".to_string(),
            period: TimePeriod::Last10,
            custom_years: YearRange::new(1950, 2020),
            options,
        }
    }

    fn everything() -> AnalysisOptions {
        AnalysisOptions {
            trend: true,
            anomalies: true,
            forecast: true,
            scenarios: true,
            impact: true,
        }
    }

    #[tokio::test]
    async fn test_all_parts_present() {
        let source = FakeSource::new();
        let result = run_analysis(
            &source,
            &request(everything()),
            &AnalysisParams::default(),
            DatasetSpan::default(),
        )
        .await
        .unwrap();
        assert_eq!(result.years, YearRange::new(2010, 2020));
        assert_eq!(result.time_series.len(), 3);
        assert!(result.climatology.is_some());
        assert!(result.trend.is_some());
        assert!(result.anomalies.is_some());
        assert!(result.forecast.is_some());
        assert!(result.scenarios.is_some());
        assert!(result.impact.is_some());
        assert_eq!(source.threshold_sent(), Some(2.0));
    }

    #[tokio::test]
    async fn test_disabled_options_are_not_called() {
        let source = FakeSource::new();
        let result = run_analysis(
            &source,
            &request(AnalysisOptions::default()),
            &AnalysisParams::default(),
            DatasetSpan::default(),
        )
        .await
        .unwrap();
        assert!(result.anomalies.is_none());
        assert!(!source.called("anomalies"));
        assert!(source.called("trend"));
    }

    #[tokio::test]
    async fn test_optional_failure_still_succeeds() {
        let source = FakeSource::failing(&["trend", "climatology", "impact"]);
        let result = run_analysis(
            &source,
            &request(everything()),
            &AnalysisParams::default(),
            DatasetSpan::default(),
        )
        .await
        .unwrap();
        assert!(result.trend.is_none());
        assert!(result.climatology.is_none());
        assert!(result.impact.is_none());
        assert!(result.forecast.is_some());
        assert_eq!(result.statistics.count, 3);
    }

    #[tokio::test]
    async fn test_essential_failure() {
        let source = FakeSource::failing(&["statistics"]);
        let err = run_analysis(
            &source,
            &request(everything()),
            &AnalysisParams::default(),
            DatasetSpan::default(),
        )
        .await
        .unwrap_err();
        let AnalysisError::EssentialData { missing, causes } = err;
        assert_eq!(missing, vec!["statistics"]);
        assert_eq!(causes.len(), 1);
        // every call is still allowed to settle
        assert!(source.called("scenarios"));
    }

    #[tokio::test]
    async fn test_both_essentials_missing() {
        let source = FakeSource::failing(&["time_series", "statistics"]);
        let err = run_analysis(
            &source,
            &request(everything()),
            &AnalysisParams::default(),
            DatasetSpan::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch essential data (time_series, statistics)"
        );
    }
}
