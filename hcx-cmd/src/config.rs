//! Settings loader: defaults, then `hcx.toml`, then environment, then flags.

use crate::analysis::AnalysisParams;
use hcx_core::gateway::DEFAULT_BASE_URL;
use hcx_core::year_range::{DatasetSpan, DATASET_END_YEAR, DATASET_START_YEAR};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "hcx.toml";
pub const DEFAULT_STATE_FILE: &str = "hcx-state.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "HCX_API_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "HCX_API_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{name} must be a non-negative integer, got {value:?}")]
    Env { name: &'static str, value: String },

    #[error("Invalid config:\n - {}", .0.join("\n - "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// `0` disables the request timeout.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        DatasetSettings {
            start_year: DATASET_START_YEAR,
            end_year: DATASET_END_YEAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    pub path: PathBuf,
}

impl Default for StateSettings {
    fn default() -> Self {
        StateSettings {
            path: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub dataset: DatasetSettings,
    pub analysis: AnalysisParams,
    pub state: StateSettings,
}

impl Settings {
    /// Read `path`, or `hcx.toml` when present, then apply the environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        let settings = match path {
            Some(path) => Settings::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Settings::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No {} found, using built-in settings", DEFAULT_CONFIG_FILE);
                Settings::default()
            }
        };
        settings.with_env(|name| std::env::var(name).ok())
    }

    pub fn from_file(path: &Path) -> Result<Settings, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides from `HCX_API_URL` and `HCX_API_TIMEOUT_SECS`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_API_TIMEOUT_SECS) {
            self.api.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::Env {
                name: ENV_API_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }

    pub fn dataset_span(&self) -> DatasetSpan {
        DatasetSpan {
            start_year: self.dataset.start_year,
            end_year: self.dataset.end_year,
        }
    }

    /// Collects every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues: Vec<String> = Vec::new();

        let url = self.api.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            issues.push(format!("api.base_url must start with http:// or https://, got {url:?}"));
        }
        if self.dataset.start_year > self.dataset.end_year {
            issues.push("dataset.start_year must be <= dataset.end_year".into());
        }
        let threshold = self.analysis.anomaly_threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            issues.push("analysis.anomaly_threshold must be > 0".into());
        }
        if self.analysis.forecast_years == 0 {
            issues.push("analysis.forecast_years must be > 0".into());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }
}
