use crate::config::Settings;
use crate::state::{load_state, Selection};
use crate::{FetchOperation, MetadataKind, SelectionArgs};
use anyhow::Context;
use hcx_core::metadata::VariableInfo;
use hcx_core::year_range::YearRange;
use hcx_core::{AnalyticsSource, SeriesQuery};
use serde::Serialize;

/// Operation-specific parameters; each is sent only when given.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchParams {
    pub threshold: Option<f64>,
    pub years: Option<u32>,
    pub target_year: Option<i32>,
}

/// Variable and region fall back to the saved selection. The year span is
/// only sent when a start or end year is given; the missing bound comes from
/// the dataset.
pub fn fetch_query(
    settings: &Settings,
    saved: &Selection,
    selection: &SelectionArgs,
) -> SeriesQuery {
    let variable = selection.variable.as_deref().unwrap_or(&saved.variable);
    let region = selection.region.as_deref().unwrap_or(&saved.region);
    let years = match (selection.start_year, selection.end_year) {
        (None, None) => None,
        (start, end) => Some(YearRange::new(
            start.unwrap_or(settings.dataset.start_year),
            end.unwrap_or(settings.dataset.end_year),
        )),
    };
    SeriesQuery::new(variable.trim(), region.trim(), years)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run_fetch<S>(
    settings: &Settings,
    source: &S,
    operation: FetchOperation,
    selection: &SelectionArgs,
    params: &FetchParams,
) -> anyhow::Result<()>
where
    S: AnalyticsSource + ?Sized,
{
    let saved = load_state(&settings.state.path)?.selection;
    let query = fetch_query(settings, &saved, selection);
    let (variable, region) = (query.variable.as_str(), query.region.as_str());
    let context = || format!("failed to fetch {:?} for {} in {}", operation, variable, region);
    match operation {
        FetchOperation::TimeSeries => {
            print_json(&source.time_series(&query).await.with_context(context)?)
        }
        FetchOperation::Annual => print_json(&source.annual(&query).await.with_context(context)?),
        FetchOperation::Climatology => {
            print_json(&source.climatology(&query).await.with_context(context)?)
        }
        FetchOperation::Trend => print_json(&source.trend(&query).await.with_context(context)?),
        FetchOperation::Anomalies => print_json(
            &source
                .anomalies(&query, params.threshold)
                .await
                .with_context(context)?,
        ),
        FetchOperation::Statistics => {
            print_json(&source.statistics(&query).await.with_context(context)?)
        }
        FetchOperation::Forecast => print_json(
            &source
                .forecast(variable, region, params.years)
                .await
                .with_context(context)?,
        ),
        FetchOperation::Scenarios => print_json(
            &source
                .scenarios(variable, region, params.target_year)
                .await
                .with_context(context)?,
        ),
        FetchOperation::Impact => {
            print_json(&source.impact(variable, region).await.with_context(context)?)
        }
    }
}

pub async fn run_metadata<S>(source: &S, kind: MetadataKind) -> anyhow::Result<()>
where
    S: AnalyticsSource + ?Sized,
{
    match kind {
        MetadataKind::Variables => {
            let codes = source
                .variables()
                .await
                .context("failed to fetch variable metadata")?;
            for code in codes {
                let info = VariableInfo::lookup(&code);
                if info.unit.is_empty() {
                    println!("{}\t{}", info.code, info.name);
                } else {
                    println!("{}\t{} ({})", info.code, info.name, info.unit);
                }
            }
        }
        MetadataKind::Regions => {
            let codes = source
                .regions()
                .await
                .context("failed to fetch region metadata")?;
            for code in codes {
                println!("{}", code);
            }
        }
    }
    Ok(())
}

pub async fn run_health<S>(source: &S) -> anyhow::Result<()>
where
    S: AnalyticsSource + ?Sized,
{
    let health = source.health().await.context("health check failed")?;
    match &health.timestamp {
        Some(timestamp) => println!("{} ({})", health.status, timestamp),
        None => println!("{}", health.status),
    }
    if !health.is_healthy() {
        anyhow::bail!("service reported status {:?}", health.status);
    }
    Ok(())
}
