//! Shared utility functions for HimClimX crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

    /// Formats accepted for full timestamps, tried in order.
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse an upstream timestamp string into a calendar instant.
    ///
    /// Accepts RFC 3339 (offset is converted to UTC), naive date-times,
    /// plain dates, and the year-month (`1950-01`) and bare-year (`1950`)
    /// forms the annual and monthly endpoints emit. Date-only forms land
    /// on midnight of the first day they name.
    pub fn parse_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.naive_utc());
        }
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(dt);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(date.and_time(NaiveTime::MIN));
        }
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
            return Ok(date.and_time(NaiveTime::MIN));
        }
        if let Ok(year) = s.parse::<i32>() {
            if let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
                return Ok(date.and_time(NaiveTime::MIN));
            }
        }
        anyhow::bail!("unrecognized timestamp: {s:?}")
    }

    /// Parse an upstream date string, discarding any time-of-day part.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(parse_timestamp(s)?.date())
    }

    /// Calendar year of a timestamp.
    pub fn year_of(timestamp: &NaiveDateTime) -> i32 {
        timestamp.year()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_timestamp_forms() {
            let jan16 = NaiveDate::from_ymd_opt(1950, 1, 16).unwrap();
            assert_eq!(parse_timestamp("1950-01-16").unwrap().date(), jan16);
            assert_eq!(
                parse_timestamp("1950-01-16T12:00:00").unwrap(),
                jan16.and_hms_opt(12, 0, 0).unwrap()
            );
            assert_eq!(
                parse_timestamp("1950-01-16T12:00:00+02:00").unwrap(),
                jan16.and_hms_opt(10, 0, 0).unwrap()
            );
            assert_eq!(
                parse_timestamp("1950-01-16 00:00:00").unwrap().date(),
                jan16
            );
            assert_eq!(
                parse_timestamp("1950-03").unwrap().date(),
                NaiveDate::from_ymd_opt(1950, 3, 1).unwrap()
            );
            assert_eq!(
                parse_timestamp("1987").unwrap().date(),
                NaiveDate::from_ymd_opt(1987, 1, 1).unwrap()
            );
        }

        #[test]
        fn test_parse_timestamp_rejects_garbage() {
            assert!(parse_timestamp("").is_err());
            assert!(parse_timestamp("soon").is_err());
            assert!(parse_timestamp("1950-13-40").is_err());
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_year_of() {
            let ts = parse_timestamp("2001-07-16").unwrap();
            assert_eq!(year_of(&ts), 2001);
        }
    }
}

/// Numeric formatting policy for all external-facing text.
///
/// Non-finite values render as [`format::PLACEHOLDER`] everywhere.
pub mod format {
    /// Rendered in place of NaN or infinite values.
    pub const PLACEHOLDER: &str = "-";

    /// Default precision for physical values.
    pub const DEFAULT_DECIMALS: usize = 2;

    /// Fixed-point rendering with the given number of decimals.
    pub fn format_number(value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return PLACEHOLDER.to_string();
        }
        format!("{value:.decimals$}")
    }

    /// Signed percentage with one decimal: `+3.5%`, `-1.0%`, `0.0%`.
    pub fn format_percent(value: f64) -> String {
        if !value.is_finite() {
            return PLACEHOLDER.to_string();
        }
        let sign = if value > 0.0 { "+" } else { "" };
        format!("{sign}{value:.1}%")
    }

    /// Signed per-decade rate with three decimals and a unit.
    pub fn format_trend(value: f64, unit: &str) -> String {
        if !value.is_finite() {
            return PLACEHOLDER.to_string();
        }
        let sign = if value > 0.0 { "+" } else { "" };
        format!("{sign}{value:.3} {unit}/decade")
    }

    /// Scientific notation with two digits after the point: `3.20e-3`.
    pub fn format_p_value(value: f64) -> String {
        if !value.is_finite() {
            return PLACEHOLDER.to_string();
        }
        format!("{value:.2e}")
    }

}
