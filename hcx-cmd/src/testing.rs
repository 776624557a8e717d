//! In-memory `AnalyticsSource` for orchestration tests.

use async_trait::async_trait;
use hcx_core::anomaly::AnomalySet;
use hcx_core::climatology::Climatology;
use hcx_core::forecast::ForecastResult;
use hcx_core::impact::ImpactAssessment;
use hcx_core::metadata::HealthStatus;
use hcx_core::scenario::ScenarioSet;
use hcx_core::statistics::Statistics;
use hcx_core::time_series::{AnnualSeries, TimeSeries};
use hcx_core::trend::TrendResult;
use hcx_core::{AnalyticsSource, GatewayError, SeriesQuery};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Default)]
pub struct FakeSource {
    failing: HashSet<&'static str>,
    /// Time series calls for these variables wait until the sender fires.
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<&'static str>>,
    threshold: Mutex<Option<f64>>,
}

impl FakeSource {
    pub fn new() -> FakeSource {
        FakeSource::default()
    }

    pub fn failing(operations: &[&'static str]) -> FakeSource {
        FakeSource {
            failing: operations.iter().copied().collect(),
            ..FakeSource::default()
        }
    }

    pub fn gate(&self, variable: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(variable.to_string(), rx);
        tx
    }

    pub fn called(&self, operation: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|call| *call == operation)
    }

    pub fn threshold_sent(&self) -> Option<f64> {
        *self.threshold.lock().unwrap()
    }

    fn record(&self, operation: &'static str) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(operation);
        if self.failing.contains(operation) {
            Err(GatewayError::HttpStatus {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AnalyticsSource for FakeSource {
    async fn time_series(&self, query: &SeriesQuery) -> Result<TimeSeries, GatewayError> {
        let gate = self.gates.lock().unwrap().remove(&query.variable);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.record("time_series")?;
        Ok(TimeSeries::from_payload(&json!({
            "data": {
                "times": ["2018-01-01", "2019-01-01", "2020-01-01"],
                "values": [14.5, 14.75, 15.25]
            }
        })))
    }

    async fn annual(&self, _query: &SeriesQuery) -> Result<AnnualSeries, GatewayError> {
        self.record("annual")?;
        Ok(AnnualSeries::from_payload(&json!({"years": [2019, 2020], "values": [14.75, 15.25]})))
    }

    async fn climatology(&self, _query: &SeriesQuery) -> Result<Climatology, GatewayError> {
        self.record("climatology")?;
        Ok(Climatology::from_payload(&json!({"values": [1.0, 2.0, 3.0]})))
    }

    async fn trend(&self, _query: &SeriesQuery) -> Result<TrendResult, GatewayError> {
        self.record("trend")?;
        Ok(TrendResult::from_payload(&json!({
            "trend": {"slope": 0.25, "intercept": -490.0, "p_value": 0.01}
        })))
    }

    async fn anomalies(
        &self,
        _query: &SeriesQuery,
        threshold: Option<f64>,
    ) -> Result<AnomalySet, GatewayError> {
        *self.threshold.lock().unwrap() = threshold;
        self.record("anomalies")?;
        Ok(AnomalySet::from_payload(&json!({"years": [2019], "values": [20.0], "z_scores": [3.1]})))
    }

    async fn statistics(&self, _query: &SeriesQuery) -> Result<Statistics, GatewayError> {
        self.record("statistics")?;
        Ok(Statistics::from_payload(&json!({
            "statistics": {
                "mean": 14.83, "median": 14.75, "min": 14.5, "max": 15.25, "std": 0.31, "count": 3
            }
        })))
    }

    async fn forecast(
        &self,
        _variable: &str,
        _region: &str,
        _years: Option<u32>,
    ) -> Result<ForecastResult, GatewayError> {
        self.record("forecast")?;
        Ok(ForecastResult::from_payload(&json!({"dates": ["2021-01-01"], "values": [15.4]})))
    }

    async fn scenarios(
        &self,
        _variable: &str,
        _region: &str,
        _target_year: Option<i32>,
    ) -> Result<ScenarioSet, GatewayError> {
        self.record("scenarios")?;
        Ok(ScenarioSet::from_payload(&json!({"ssp2": {"future_value": 16.1}})))
    }

    async fn impact(
        &self,
        _variable: &str,
        _region: &str,
    ) -> Result<ImpactAssessment, GatewayError> {
        self.record("impact")?;
        Ok(ImpactAssessment::from_payload(&json!({"risk_level": "high", "risk_score": 6.5})))
    }

    async fn variables(&self) -> Result<Vec<String>, GatewayError> {
        self.record("variables")?;
        Ok(vec!["tmp".to_string(), "pre".to_string()])
    }

    async fn regions(&self) -> Result<Vec<String>, GatewayError> {
        self.record("regions")?;
        Ok(vec!["C4000".to_string()])
    }

    async fn health(&self) -> Result<HealthStatus, GatewayError> {
        self.record("health")?;
        Ok(HealthStatus::from_payload(&json!({"status": "ok"})))
    }
}
