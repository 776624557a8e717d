use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First year covered by the gridded dataset.
pub const DATASET_START_YEAR: i32 = 1950;

/// Last year covered by the gridded dataset.
pub const DATASET_END_YEAR: i32 = 2020;

/// Inclusive span of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Orders the bounds so that `start <= end`.
    pub fn new(a: i32, b: i32) -> YearRange {
        YearRange {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Number of calendar years covered, both bounds included.
    pub fn year_count(&self) -> usize {
        (self.end - self.start + 1) as usize
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Bounds of the data the service can answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpan {
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for DatasetSpan {
    fn default() -> Self {
        DatasetSpan {
            start_year: DATASET_START_YEAR,
            end_year: DATASET_END_YEAR,
        }
    }
}

/// A named preset or explicit year span selected for an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    #[default]
    Full,
    Last30,
    Last20,
    Last10,
    Custom,
}

impl TimePeriod {
    /// Trailing window length for the `lastN` presets.
    fn trailing_years(self) -> Option<i32> {
        match self {
            TimePeriod::Last30 => Some(30),
            TimePeriod::Last20 => Some(20),
            TimePeriod::Last10 => Some(10),
            TimePeriod::Full | TimePeriod::Custom => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::Full => "full",
            TimePeriod::Last30 => "last30",
            TimePeriod::Last20 => "last20",
            TimePeriod::Last10 => "last10",
            TimePeriod::Custom => "custom",
        }
    }

    /// Concrete years for this selection.
    ///
    /// `custom` uses `custom` as given (ordered); the presets ignore it.
    pub fn resolve(self, dataset: DatasetSpan, custom: YearRange) -> YearRange {
        match self {
            TimePeriod::Custom => YearRange::new(custom.start, custom.end),
            TimePeriod::Full => YearRange::new(dataset.start_year, dataset.end_year),
            preset => {
                let window = preset.trailing_years().unwrap_or(0);
                YearRange::new(
                    dataset.start_year.max(dataset.end_year - window),
                    dataset.end_year,
                )
            }
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(TimePeriod::Full),
            "last30" => Ok(TimePeriod::Last30),
            "last20" => Ok(TimePeriod::Last20),
            "last10" => Ok(TimePeriod::Last10),
            "custom" => Ok(TimePeriod::Custom),
            other => Err(format!(
                "unknown time period {other:?} (expected full, last30, last20, last10 or custom)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unused() -> YearRange {
        YearRange::new(1900, 1901)
    }

    #[test]
    fn test_presets_against_2020() {
        let dataset = DatasetSpan::default();
        assert_eq!(
            TimePeriod::Last10.resolve(dataset, unused()),
            YearRange { start: 2010, end: 2020 }
        );
        assert_eq!(
            TimePeriod::Full.resolve(dataset, unused()),
            YearRange { start: 1950, end: 2020 }
        );
        assert_eq!(TimePeriod::Last30.resolve(dataset, unused()).start, 1990);
        assert_eq!(TimePeriod::Last20.resolve(dataset, unused()).start, 2000);
    }

    #[test]
    fn test_preset_clamped_to_dataset_start() {
        let short = DatasetSpan {
            start_year: 2005,
            end_year: 2020,
        };
        assert_eq!(
            TimePeriod::Last30.resolve(short, unused()),
            YearRange { start: 2005, end: 2020 }
        );
    }

    #[test]
    fn test_custom_range_ordered() {
        let custom = YearRange {
            start: 2000,
            end: 1980,
        };
        let range = TimePeriod::Custom.resolve(DatasetSpan::default(), custom);
        assert_eq!(range, YearRange { start: 1980, end: 2000 });
        assert_eq!(range.year_count(), 21);
        assert_eq!(range.to_string(), "1980 - 2000");
    }

    #[test]
    fn test_parse_time_period() {
        assert_eq!("LAST10".parse::<TimePeriod>(), Ok(TimePeriod::Last10));
        assert!("last5".parse::<TimePeriod>().is_err());
        assert_eq!(TimePeriod::Custom.to_string(), "custom");
    }
}
