//! Display-ready views derived from an analysis result.
//!
//! Every function here is pure and recomputed on demand; nothing is written
//! back into the canonical [`AnalysisResult`](hcx_core::analysis::AnalysisResult).

pub mod report;

/// Chart series built from the time series and its companions.
pub mod series {
    use anyhow::Context;
    use chrono::NaiveDateTime;
    use hcx_core::analysis::AnalysisResult;
    use hcx_core::anomaly::AnomalySet;
    use hcx_core::time_series::TimeSeries;
    use hcx_core::trend::TrendResult;
    use hcx_utils::dates::{format_date, year_of};
    use serde::Serialize;
    use std::io;

    /// A time-series point with its fitted trend value, when there is a fit.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct TrendPoint {
        pub timestamp: NaiveDateTime,
        pub value: f64,
        pub trend: Option<f64>,
    }

    /// Overlay `intercept + slope * year` on every point.
    pub fn trend_overlay(series: &TimeSeries, trend: Option<&TrendResult>) -> Vec<TrendPoint> {
        series
            .points
            .iter()
            .map(|point| TrendPoint {
                timestamp: point.timestamp,
                value: point.value,
                trend: trend.map(|fit| fit.value_at(year_of(&point.timestamp))),
            })
            .collect()
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct AnomalyFlag {
        pub year: i32,
        pub value: f64,
        pub z_score: f64,
        pub is_anomaly: bool,
    }

    /// One flag per entry, `|z_score| > threshold`.
    pub fn anomaly_flags(set: &AnomalySet) -> Vec<AnomalyFlag> {
        set.entries
            .iter()
            .map(|entry| AnomalyFlag {
                year: entry.year,
                value: entry.value,
                z_score: entry.z_score,
                is_anomaly: set.is_anomalous(entry),
            })
            .collect()
    }

    #[derive(Debug, Serialize)]
    struct SeriesRow {
        date: String,
        value: f64,
        trend: Option<f64>,
    }

    /// Write the chart data as `date,value,trend` CSV.
    ///
    /// The `trend` cell is empty when the result carries no trend fit.
    pub fn write_series_csv<W: io::Write>(
        result: &AnalysisResult,
        writer: W,
    ) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for point in trend_overlay(&result.time_series, result.trend.as_ref()) {
            wtr.serialize(SeriesRow {
                date: format_date(&point.timestamp.date()),
                value: point.value,
                trend: point.trend,
            })
            .context("failed to write series row")?;
        }
        wtr.flush().context("failed to flush series CSV")?;
        Ok(())
    }

}

/// Table rows for the climatology, forecast and scenario views.
pub mod tables {
    use chrono::NaiveDate;
    use hcx_core::climatology::Climatology;
    use hcx_core::forecast::ForecastResult;
    use hcx_core::scenario::ScenarioSet;

    #[derive(Debug, Clone, PartialEq)]
    pub struct ClimatologyRow {
        pub month: String,
        pub value: f64,
        pub std: f64,
    }

    pub fn climatology_rows(climatology: &Climatology) -> Vec<ClimatologyRow> {
        climatology
            .months
            .iter()
            .map(|month| ClimatologyRow {
                month: month.month_label.clone(),
                value: month.mean_value,
                std: month.std_value,
            })
            .collect()
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ForecastRow {
        pub date: NaiveDate,
        pub value: f64,
        pub lower: f64,
        pub upper: f64,
    }

    pub fn forecast_rows(forecast: &ForecastResult) -> Vec<ForecastRow> {
        forecast
            .points
            .iter()
            .map(|point| ForecastRow {
                date: point.date,
                value: point.point_estimate,
                lower: point.lower_bound,
                upper: point.upper_bound,
            })
            .collect()
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ScenarioRow {
        pub name: String,
        pub future_value: f64,
        pub percent_change: f64,
        pub display_color: String,
    }

    /// Always four rows: ssp1, ssp2, ssp3, ssp5.
    pub fn scenario_rows(scenarios: &ScenarioSet) -> Vec<ScenarioRow> {
        scenarios
            .branches
            .iter()
            .map(|branch| ScenarioRow {
                name: branch.name.clone(),
                future_value: branch.future_value,
                percent_change: branch.percent_change,
                display_color: branch.display_color.clone(),
            })
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use hcx_core::scenario::ScenarioId;
        use serde_json::json;

        #[test]
        fn test_scenario_rows_order() {
            let set = ScenarioSet::from_payload(&json!({
                "ssp5": {"name": "Worst", "future_value": 18.0},
                "ssp1": {"name": "Best", "future_value": 15.0}
            }));
            let rows = scenario_rows(&set);
            assert_eq!(rows.len(), 4);
            assert_eq!(rows[0].name, "Best");
            assert_eq!(rows[1].name, ScenarioId::Ssp2.default_name());
            assert_eq!(rows[2].display_color, ScenarioId::Ssp3.default_color());
            assert_eq!(rows[3].future_value, 18.0);
        }

        #[test]
        fn test_climatology_rows() {
            let climatology = Climatology::from_payload(&json!({
                "months": ["Jan"],
                "values": [1.5],
                "std": [0.2]
            }));
            let rows = climatology_rows(&climatology);
            assert_eq!(rows.len(), 12);
            assert_eq!(rows[0], ClimatologyRow { month: "Jan".to_string(), value: 1.5, std: 0.2 });
            assert_eq!(rows[11].month, "Dec");
        }

        #[test]
        fn test_forecast_rows() {
            let forecast = ForecastResult::from_payload(&json!({
                "dates": ["2021-01-01"], "values": [15.0], "lower": [14.0], "upper": [16.0]
            }));
            let rows = forecast_rows(&forecast);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].lower, 14.0);
            assert_eq!(rows[0].upper, 16.0);
        }
    }
}

/// Plain-language reading of a trend fit.
pub mod interpretation {
    use hcx_core::impact::RiskLevel;
    use hcx_core::trend::TrendResult;
    use hcx_utils::format::{format_number, format_percent};
    use std::fmt;

    /// p-value below which a trend counts as statistically significant.
    pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Direction {
        Increasing,
        Decreasing,
        Stable,
    }

    impl fmt::Display for Direction {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                Direction::Increasing => "increasing",
                Direction::Decreasing => "decreasing",
                Direction::Stable => "stable",
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct TrendInterpretation {
        pub direction: Direction,
        pub significant: bool,
        pub significance_label: &'static str,
        pub summary: String,
    }

    pub fn significance_label(p_value: f64) -> &'static str {
        if p_value < 0.001 {
            "Highly Significant"
        } else if p_value < 0.01 {
            "Very Significant"
        } else if p_value < SIGNIFICANCE_LEVEL {
            "Significant"
        } else if p_value < 0.1 {
            "Marginally Significant"
        } else {
            "Not Significant"
        }
    }

    pub fn direction(per_decade: f64) -> Direction {
        if per_decade > 0.0 {
            Direction::Increasing
        } else if per_decade < 0.0 {
            Direction::Decreasing
        } else {
            Direction::Stable
        }
    }

    pub fn interpret_trend(
        trend: &TrendResult,
        variable_name: &str,
        unit: &str,
    ) -> TrendInterpretation {
        let direction = direction(trend.per_decade);
        let rate = format_number(trend.per_decade.abs(), 3);
        let rate = if unit.is_empty() { rate } else { format!("{rate} {unit}") };
        TrendInterpretation {
            direction,
            significant: trend.p_value < SIGNIFICANCE_LEVEL,
            significance_label: significance_label(trend.p_value),
            summary: format!(
                "{variable_name} shows a {direction} trend of {rate} per decade ({} change).",
                format_percent(trend.percent_change)
            ),
        }
    }

    pub fn risk_color(level: RiskLevel) -> &'static str {
        level.color()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_significance_labels() {
            assert_eq!(significance_label(0.0005), "Highly Significant");
            assert_eq!(significance_label(0.005), "Very Significant");
            assert_eq!(significance_label(0.03), "Significant");
            assert_eq!(significance_label(0.05), "Marginally Significant");
            assert_eq!(significance_label(0.5), "Not Significant");
        }

        #[test]
        fn test_interpret_trend() {
            let trend = TrendResult {
                per_decade: -0.2346,
                percent_change: -1.0,
                p_value: 0.02,
                ..TrendResult::default()
            };
            let reading = interpret_trend(&trend, "Precipitation", "mm");
            assert_eq!(reading.direction, Direction::Decreasing);
            assert!(reading.significant);
            assert_eq!(
                reading.summary,
                "Precipitation shows a decreasing trend of 0.235 mm per decade (-1.0% change)."
            );
            assert_eq!(direction(0.0), Direction::Stable);
        }

        #[test]
        fn test_risk_colors() {
            assert_eq!(risk_color(RiskLevel::Critical), "#ef4444");
            assert_eq!(risk_color(RiskLevel::High), "#f97316");
            assert_eq!(risk_color(RiskLevel::Moderate), "#f59e0b");
            assert_eq!(risk_color(RiskLevel::Low), "#10b981");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use chrono::{TimeZone, Utc};
    use hcx_core::analysis::AnalysisResult;
    use hcx_core::statistics::Statistics;
    use hcx_core::time_series::TimeSeries;
    use hcx_core::trend::TrendResult;
    use hcx_core::year_range::YearRange;
    use serde_json::json;

    /// Three annual points, 2018-2020, with statistics but no trend.
    pub fn result() -> AnalysisResult {
        AnalysisResult::new(
            "tmp",
            "C4000",
            YearRange::new(2018, 2020),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            TimeSeries::from_payload(&json!({
                "times": ["2018-01-01", "2019-01-01", "2020-01-01"],
                "values": [14.5, 14.75, 15.25]
            })),
            Statistics::from_payload(&json!({
                "mean": 14.8333, "median": 14.75, "min": 14.5, "max": 15.25,
                "std": 0.3118, "count": 3
            })),
        )
    }

    /// slope 0.25/yr anchored so that 2020 maps to 15.0.
    pub fn trend() -> TrendResult {
        TrendResult::from_payload(&json!({
            "slope": 0.25, "intercept": -490.0, "r_squared": 0.9643, "p_value": 0.0032,
            "per_decade": 2.5, "percent_change": 3.456
        }))
    }
}
