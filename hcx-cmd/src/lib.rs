//! Command implementations for the HimClimX CLI.
//!
//! Runs climate analyses against the analytics service, fetches single
//! records and metadata, and manages the persisted dashboard selection.

use clap::{Args, Subcommand, ValueEnum};
use hcx_core::gateway::AnalyticsClient;
use hcx_core::year_range::TimePeriod;
use std::path::PathBuf;

pub mod analysis;
pub mod analyze;
pub mod config;
pub mod fetch;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

use config::Settings;

/// Selection overrides shared by `analyze` and `fetch`.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Climate variable code, e.g. tmp or pre
    #[arg(short, long)]
    pub variable: Option<String>,

    /// Region code, e.g. C4000
    #[arg(short, long)]
    pub region: Option<String>,

    /// First year of a custom range
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last year of a custom range
    #[arg(long)]
    pub end_year: Option<i32>,
}

/// `--x` turns an optional analysis on, `--no-x` off; omitted keeps the saved choice.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionFlags {
    /// Fetch the linear trend fit
    #[arg(long, overrides_with = "no_trend")]
    pub trend: bool,
    /// Skip the linear trend fit
    #[arg(long, overrides_with = "trend")]
    pub no_trend: bool,

    /// Fetch anomaly scores
    #[arg(long, overrides_with = "no_anomalies")]
    pub anomalies: bool,
    /// Skip anomaly scores
    #[arg(long, overrides_with = "anomalies")]
    pub no_anomalies: bool,

    /// Fetch the forecast
    #[arg(long, overrides_with = "no_forecast")]
    pub forecast: bool,
    /// Skip the forecast
    #[arg(long, overrides_with = "forecast")]
    pub no_forecast: bool,

    /// Fetch SSP scenario projections
    #[arg(long, overrides_with = "no_scenarios")]
    pub scenarios: bool,
    /// Skip SSP scenario projections
    #[arg(long, overrides_with = "scenarios")]
    pub no_scenarios: bool,

    /// Fetch the impact assessment
    #[arg(long, overrides_with = "no_impact")]
    pub impact: bool,
    /// Skip the impact assessment
    #[arg(long, overrides_with = "impact")]
    pub no_impact: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOperation {
    TimeSeries,
    Annual,
    Climatology,
    Trend,
    Anomalies,
    Statistics,
    Forecast,
    Scenarios,
    Impact,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Variables,
    Regions,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    /// Print the saved selection and preferences
    Show,
    /// Restore the default selection and preferences
    Reset,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a full analysis and print its report
    Analyze {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Year range preset: full, last30, last20, last10 or custom
        #[arg(short, long)]
        period: Option<TimePeriod>,

        #[command(flatten)]
        options: OptionFlags,

        /// Write the markdown report to this file
        #[arg(long, conflicts_with = "report_dir")]
        report: Option<PathBuf>,

        /// Write the markdown report into this directory under its default name
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Write the time series with its trend overlay as CSV
        #[arg(long)]
        series_csv: Option<PathBuf>,
    },

    /// Fetch one normalized record and print it as JSON
    Fetch {
        #[arg(value_enum)]
        operation: FetchOperation,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Anomaly threshold in standard deviations
        #[arg(long)]
        threshold: Option<f64>,

        /// Forecast horizon in years
        #[arg(long)]
        years: Option<u32>,

        /// Scenario target year
        #[arg(long)]
        target_year: Option<i32>,
    },

    /// List the variables or regions the service offers
    Metadata {
        #[arg(value_enum)]
        kind: MetadataKind,
    },

    /// Check that the analytics service is up
    Health,

    /// Show or reset the saved dashboard state
    State {
        #[command(subcommand)]
        action: StateAction,
    },
}

fn client(settings: &Settings) -> anyhow::Result<AnalyticsClient> {
    Ok(AnalyticsClient::new(
        &settings.api.base_url,
        settings.api.timeout(),
    )?)
}

pub async fn run(command: Command, settings: Settings) -> anyhow::Result<()> {
    match command {
        Command::Analyze {
            selection,
            period,
            options,
            report,
            report_dir,
            series_csv,
        } => {
            let outputs = analyze::Outputs {
                report,
                report_dir,
                series_csv,
            };
            analyze::run_analyze(
                &settings,
                &client(&settings)?,
                &selection,
                period,
                &options,
                &outputs,
            )
            .await
        }
        Command::Fetch {
            operation,
            selection,
            threshold,
            years,
            target_year,
        } => {
            let extra = fetch::FetchParams {
                threshold,
                years,
                target_year,
            };
            fetch::run_fetch(&settings, &client(&settings)?, operation, &selection, &extra).await
        }
        Command::Metadata { kind } => fetch::run_metadata(&client(&settings)?, kind).await,
        Command::Health => fetch::run_health(&client(&settings)?).await,
        Command::State { action } => analyze::run_state(&settings, action),
    }
}
