//! The seam between analysis logic and the analytics service.

use crate::{
    anomaly::AnomalySet, climatology::Climatology, error::GatewayError,
    forecast::ForecastResult, impact::ImpactAssessment, metadata::HealthStatus,
    scenario::ScenarioSet, statistics::Statistics, time_series::AnnualSeries,
    time_series::TimeSeries, trend::TrendResult, year_range::YearRange,
};
use async_trait::async_trait;

/// The `(variable, region, years)` key every data and analysis call shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    pub variable: String,
    pub region: String,
    /// `None` leaves the span to the service's default.
    pub years: Option<YearRange>,
}

impl SeriesQuery {
    pub fn new(variable: &str, region: &str, years: Option<YearRange>) -> SeriesQuery {
        SeriesQuery {
            variable: variable.to_string(),
            region: region.to_string(),
            years,
        }
    }
}

/// One async method per logical operation, each returning a canonical record.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn time_series(&self, query: &SeriesQuery) -> Result<TimeSeries, GatewayError>;

    async fn annual(&self, query: &SeriesQuery) -> Result<AnnualSeries, GatewayError>;

    async fn climatology(&self, query: &SeriesQuery) -> Result<Climatology, GatewayError>;

    async fn trend(&self, query: &SeriesQuery) -> Result<TrendResult, GatewayError>;

    async fn anomalies(
        &self,
        query: &SeriesQuery,
        threshold: Option<f64>,
    ) -> Result<AnomalySet, GatewayError>;

    async fn statistics(&self, query: &SeriesQuery) -> Result<Statistics, GatewayError>;

    async fn forecast(
        &self,
        variable: &str,
        region: &str,
        years: Option<u32>,
    ) -> Result<ForecastResult, GatewayError>;

    async fn scenarios(
        &self,
        variable: &str,
        region: &str,
        target_year: Option<i32>,
    ) -> Result<ScenarioSet, GatewayError>;

    async fn impact(&self, variable: &str, region: &str)
        -> Result<ImpactAssessment, GatewayError>;

    async fn variables(&self) -> Result<Vec<String>, GatewayError>;

    async fn regions(&self) -> Result<Vec<String>, GatewayError>;

    async fn health(&self) -> Result<HealthStatus, GatewayError>;
}
