use crate::config::Settings;
use crate::session::AnalysisSession;
use crate::state::{load_state, save_state, DashboardState, PersistedState};
use crate::{OptionFlags, SelectionArgs, StateAction};
use anyhow::Context;
use hcx_core::metadata::VariableInfo;
use hcx_core::year_range::TimePeriod;
use hcx_core::AnalyticsSource;
use hcx_data::interpretation::interpret_trend;
use hcx_data::report::{generate_report, report_file_name};
use hcx_data::series::write_series_csv;
use hcx_data::tables::scenario_rows;
use hcx_utils::format::{format_number, format_percent, format_trend, DEFAULT_DECIMALS};
use log::info;
use std::fs::{self, File};
use std::path::PathBuf;

/// Files an analysis run may write besides its printed report.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    pub report: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub series_csv: Option<PathBuf>,
}

fn toggle(on: bool, off: bool, current: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => current,
    }
}

/// Fold command-line overrides into the saved state.
///
/// Giving a start or end year without a period selects a custom range.
pub fn apply_overrides(
    state: &mut DashboardState,
    selection: &SelectionArgs,
    period: Option<TimePeriod>,
    flags: &OptionFlags,
) {
    let current = &mut state.selection;
    if let Some(variable) = &selection.variable {
        current.variable = variable.trim().to_string();
    }
    if let Some(region) = &selection.region {
        current.region = region.trim().to_string();
    }
    if let Some(start) = selection.start_year {
        current.start_year = start;
    }
    if let Some(end) = selection.end_year {
        current.end_year = end;
    }
    match period {
        Some(period) => current.time_period = period,
        None if selection.start_year.is_some() || selection.end_year.is_some() => {
            current.time_period = TimePeriod::Custom
        }
        None => {}
    }

    let options = &mut state.options;
    options.trend = toggle(flags.trend, flags.no_trend, options.trend);
    options.anomalies = toggle(flags.anomalies, flags.no_anomalies, options.anomalies);
    options.forecast = toggle(flags.forecast, flags.no_forecast, options.forecast);
    options.scenarios = toggle(flags.scenarios, flags.no_scenarios, options.scenarios);
    options.impact = toggle(flags.impact, flags.no_impact, options.impact);
}

pub async fn run_analyze<S>(
    settings: &Settings,
    source: &S,
    selection: &SelectionArgs,
    period: Option<TimePeriod>,
    flags: &OptionFlags,
    outputs: &Outputs,
) -> anyhow::Result<()>
where
    S: AnalyticsSource + ?Sized,
{
    let state_path = &settings.state.path;
    let mut state = load_state(state_path)?;
    apply_overrides(&mut state, selection, period, flags);
    save_state(state_path, &state)?;

    let session = AnalysisSession::new();
    session
        .run(
            source,
            &state.request(),
            &settings.analysis,
            settings.dataset_span(),
        )
        .await;
    let snapshot = session.snapshot();
    if let Some(err) = snapshot.error {
        return Err(err).context("analysis failed");
    }
    let result = snapshot
        .result
        .context("analysis finished without a result")?;

    let report = generate_report(&result);
    print!("{}", report);

    let variable = VariableInfo::lookup(&result.variable);
    if let Some(trend) = &result.trend {
        let reading = interpret_trend(trend, &variable.name, &variable.unit);
        println!("{}", reading.summary);
        println!(
            "Trend: {} ({})",
            format_trend(trend.per_decade, &variable.unit),
            reading.significance_label
        );
    }
    if let Some(anomalies) = &result.anomalies {
        println!(
            "Anomalies: {} of {} years beyond {} standard deviations",
            anomalies.anomalies.len(),
            anomalies.entries.len(),
            format_number(anomalies.threshold, 1)
        );
    }
    if let Some(scenarios) = &result.scenarios {
        for row in scenario_rows(scenarios) {
            println!(
                "{}: {} {} ({})",
                row.name,
                format_number(row.future_value, DEFAULT_DECIMALS),
                variable.unit,
                format_percent(row.percent_change)
            );
        }
    }
    if let Some(impact) = &result.impact {
        println!(
            "Risk: {} ({}/10)",
            impact.risk_level,
            format_number(impact.risk_score, 1)
        );
    }

    let report_path = match (&outputs.report, &outputs.report_dir) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => Some(dir.join(report_file_name(&result))),
        (None, None) => None,
    };
    if let Some(path) = report_path {
        fs::write(&path, &report)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }
    if let Some(path) = &outputs.series_csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_series_csv(&result, file)?;
        info!("Series written to {}", path.display());
    }
    Ok(())
}

pub fn run_state(settings: &Settings, action: StateAction) -> anyhow::Result<()> {
    let path = &settings.state.path;
    match action {
        StateAction::Show => {
            let state = load_state(path)?;
            let persisted = PersistedState::from(&state);
            println!("{}", serde_json::to_string_pretty(&persisted)?);
        }
        StateAction::Reset => {
            save_state(path, &DashboardState::default())?;
            info!("State reset at {}", path.display());
        }
    }
    Ok(())
}
