//! Markdown export of an analysis result.

use chrono::SecondsFormat;
use hcx_core::analysis::AnalysisResult;
use hcx_core::metadata::VariableInfo;
use hcx_core::statistics::Statistics;
use hcx_core::trend::TrendResult;
use hcx_utils::format::{
    format_number, format_p_value, format_percent, DEFAULT_DECIMALS, PLACEHOLDER,
};

/// `climate_report_<variable>_<region>.md`
pub fn report_file_name(result: &AnalysisResult) -> String {
    format!("climate_report_{}_{}.md", result.variable, result.region)
}

/// Render the report: header, key statistics, then trend analysis when a
/// trend fit is present.
///
/// Output depends only on `result`; the header timestamp is the result's
/// creation time.
pub fn generate_report(result: &AnalysisResult) -> String {
    let variable = VariableInfo::lookup(&result.variable);
    let mut report = String::new();

    report.push_str("# Climate Analysis Report\n\n");
    report.push_str(&format!(
        "**Generated:** {}\n",
        result.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    if variable.unit.is_empty() {
        report.push_str(&format!("**Variable:** {}\n", variable.name));
    } else {
        report.push_str(&format!(
            "**Variable:** {} ({})\n",
            variable.name, variable.unit
        ));
    }
    report.push_str(&format!("**Region:** {}\n", result.region));
    report.push_str(&format!("**Time Period:** {}\n\n", result.years));

    push_statistics(&mut report, &result.statistics, &variable.unit);
    if let Some(trend) = &result.trend {
        push_trend(&mut report, trend, &variable.unit);
    }
    report
}

fn with_unit(value: String, unit: &str) -> String {
    if unit.is_empty() || value == PLACEHOLDER {
        value
    } else {
        format!("{value} {unit}")
    }
}

fn push_statistics(report: &mut String, stats: &Statistics, unit: &str) {
    report.push_str("## Key Statistics\n\n");
    report.push_str("| Metric | Value |\n|--------|-------|\n");
    for (metric, value) in [
        ("Mean", stats.mean),
        ("Median", stats.median),
        ("Min", stats.min),
        ("Max", stats.max),
        ("Std Dev", stats.std),
    ] {
        report.push_str(&format!(
            "| {} | {} |\n",
            metric,
            with_unit(format_number(value, DEFAULT_DECIMALS), unit)
        ));
    }
    report.push('\n');
}

fn push_trend(report: &mut String, trend: &TrendResult, unit: &str) {
    report.push_str("## Trend Analysis\n\n");
    report.push_str(&format!(
        "- Trend per decade: {}\n",
        with_unit(format_number(trend.per_decade, 3), unit)
    ));
    report.push_str(&format!(
        "- Percent change: {}\n",
        format_percent(trend.percent_change)
    ));
    report.push_str(&format!(
        "- R-squared: {}\n",
        format_number(trend.r_squared, 3)
    ));
    report.push_str(&format!("- P-value: {}\n\n", format_p_value(trend.p_value)));
}
