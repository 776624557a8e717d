//! HTTP client for the climate analytics service.

use crate::{
    anomaly::AnomalySet,
    climatology::Climatology,
    error::GatewayError,
    forecast::ForecastResult,
    impact::ImpactAssessment,
    metadata::{regions_from_payload, variables_from_payload, HealthStatus},
    scenario::ScenarioSet,
    source::{AnalyticsSource, SeriesQuery},
    statistics::Statistics,
    time_series::{AnnualSeries, TimeSeries},
    trend::TrendResult,
};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Versioned prefix for every endpoint except health.
pub const API_PREFIX: &str = "/api/v1";

pub const DEFAULT_BASE_URL: &str = "https://web-production-2d8b0.up.railway.app";

/// Stateless client; each call is a single GET with no retries and no cache.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    client: Client,
    base_url: String,
}

impl AnalyticsClient {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<AnalyticsClient, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| GatewayError::Network {
            cause: e.to_string(),
        })?;
        Ok(AnalyticsClient::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> AnalyticsClient {
        AnalyticsClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` under the versioned prefix and return the decoded body.
    pub async fn fetch(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, GatewayError> {
        self.get(&format!("{}{}{}", self.base_url, API_PREFIX, path), params)
            .await
    }

    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value, GatewayError> {
        debug!("GET {} {:?}", url, params);
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!("Request failed for {}: {}", url, e);
                GatewayError::Network {
                    cause: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for {}: {}", url, status);
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read response body for {}: {}", url, e);
            GatewayError::Network {
                cause: e.to_string(),
            }
        })?;
        decode_body(&body).inspect_err(|e| warn!("Undecodable response for {}: {}", url, e))
    }
}

/// Bodies must be JSON objects.
pub fn decode_body(body: &str) -> Result<Value, GatewayError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(GatewayError::Decode(format!(
            "expected a JSON object, got {}",
            kind_of(&value)
        )))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `variable`, `region` and the optional year span, in that order.
pub fn series_params(query: &SeriesQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("variable", query.variable.clone()),
        ("region", query.region.clone()),
    ];
    if let Some(years) = query.years {
        params.push(("start_year", years.start.to_string()));
        params.push(("end_year", years.end.to_string()));
    }
    params
}

fn key_params(variable: &str, region: &str) -> Vec<(&'static str, String)> {
    vec![
        ("variable", variable.to_string()),
        ("region", region.to_string()),
    ]
}

#[async_trait]
impl AnalyticsSource for AnalyticsClient {
    async fn time_series(&self, query: &SeriesQuery) -> Result<TimeSeries, GatewayError> {
        let raw = self.fetch("/data/timeseries", &series_params(query)).await?;
        Ok(TimeSeries::from_payload(&raw))
    }

    async fn annual(&self, query: &SeriesQuery) -> Result<AnnualSeries, GatewayError> {
        let raw = self.fetch("/data/annual", &series_params(query)).await?;
        Ok(AnnualSeries::from_payload(&raw))
    }

    async fn climatology(&self, query: &SeriesQuery) -> Result<Climatology, GatewayError> {
        let raw = self.fetch("/data/climatology", &series_params(query)).await?;
        Ok(Climatology::from_payload(&raw))
    }

    async fn trend(&self, query: &SeriesQuery) -> Result<TrendResult, GatewayError> {
        let raw = self.fetch("/analysis/trend", &series_params(query)).await?;
        Ok(TrendResult::from_payload(&raw))
    }

    async fn anomalies(
        &self,
        query: &SeriesQuery,
        threshold: Option<f64>,
    ) -> Result<AnomalySet, GatewayError> {
        let mut params = series_params(query);
        if let Some(threshold) = threshold {
            params.push(("threshold", threshold.to_string()));
        }
        let raw = self.fetch("/analysis/anomalies", &params).await?;
        Ok(AnomalySet::from_payload(&raw))
    }

    async fn statistics(&self, query: &SeriesQuery) -> Result<Statistics, GatewayError> {
        let raw = self.fetch("/analysis/statistics", &series_params(query)).await?;
        Ok(Statistics::from_payload(&raw))
    }

    async fn forecast(
        &self,
        variable: &str,
        region: &str,
        years: Option<u32>,
    ) -> Result<ForecastResult, GatewayError> {
        let mut params = key_params(variable, region);
        if let Some(years) = years {
            params.push(("years", years.to_string()));
        }
        let raw = self.fetch("/forecast/prophet", &params).await?;
        Ok(ForecastResult::from_payload(&raw))
    }

    async fn scenarios(
        &self,
        variable: &str,
        region: &str,
        target_year: Option<i32>,
    ) -> Result<ScenarioSet, GatewayError> {
        let mut params = key_params(variable, region);
        if let Some(target_year) = target_year {
            params.push(("target_year", target_year.to_string()));
        }
        let raw = self.fetch("/forecast/scenarios", &params).await?;
        Ok(ScenarioSet::from_payload(&raw))
    }

    async fn impact(
        &self,
        variable: &str,
        region: &str,
    ) -> Result<ImpactAssessment, GatewayError> {
        let raw = self
            .fetch("/impact/assess", &key_params(variable, region))
            .await?;
        Ok(ImpactAssessment::from_payload(&raw))
    }

    async fn variables(&self) -> Result<Vec<String>, GatewayError> {
        let raw = self.fetch("/metadata/variables", &[]).await?;
        Ok(variables_from_payload(&raw))
    }

    async fn regions(&self) -> Result<Vec<String>, GatewayError> {
        let raw = self.fetch("/metadata/regions", &[]).await?;
        Ok(regions_from_payload(&raw))
    }

    async fn health(&self) -> Result<HealthStatus, GatewayError> {
        let raw = self.get(&format!("{}/health", self.base_url), &[]).await?;
        Ok(HealthStatus::from_payload(&raw))
    }
}
