//! Dashboard selection and preferences, persisted between invocations.

use crate::analysis::{AnalysisOptions, AnalysisRequest};
use hcx_core::year_range::{TimePeriod, YearRange, DATASET_END_YEAR, DATASET_START_YEAR};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_VARIABLE: &str = "tmp";
pub const DEFAULT_REGION: &str = "C4000";
pub const DEFAULT_ACTIVE_TAB: &str = "dashboard";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file {path} is not valid: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub variable: String,
    pub region: String,
    pub time_period: TimePeriod,
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            variable: DEFAULT_VARIABLE.to_string(),
            region: DEFAULT_REGION.to_string(),
            time_period: TimePeriod::Full,
            start_year: DATASET_START_YEAR,
            end_year: DATASET_END_YEAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub selection: Selection,
    pub options: AnalysisOptions,
    pub theme: Theme,
    pub sidebar_open: bool,
    /// Not persisted.
    pub active_tab: String,
    /// Not persisted.
    pub analyzing: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        DashboardState::from(PersistedState::default())
    }
}

impl DashboardState {
    pub fn request(&self) -> AnalysisRequest {
        AnalysisRequest {
            variable: self.selection.variable.clone(),
            region: self.selection.region.clone(),
            period: self.selection.time_period,
            custom_years: YearRange::new(self.selection.start_year, self.selection.end_year),
            options: self.options,
        }
    }
}

/// The fields of [`DashboardState`] that survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub selection: Selection,
    pub options: AnalysisOptions,
    pub theme: Theme,
    pub sidebar_open: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        PersistedState {
            selection: Selection::default(),
            options: AnalysisOptions::default(),
            theme: Theme::default(),
            sidebar_open: true,
        }
    }
}

impl From<&DashboardState> for PersistedState {
    fn from(state: &DashboardState) -> Self {
        PersistedState {
            selection: state.selection.clone(),
            options: state.options,
            theme: state.theme,
            sidebar_open: state.sidebar_open,
        }
    }
}

impl From<PersistedState> for DashboardState {
    fn from(persisted: PersistedState) -> Self {
        DashboardState {
            selection: persisted.selection,
            options: persisted.options,
            theme: persisted.theme,
            sidebar_open: persisted.sidebar_open,
            active_tab: DEFAULT_ACTIVE_TAB.to_string(),
            analyzing: false,
        }
    }
}

/// Defaults when `path` does not exist yet.
pub fn load_state(path: &Path) -> Result<DashboardState, StateError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No state file at {}, using defaults", path.display());
            return Ok(DashboardState::default());
        }
        Err(source) => {
            return Err(StateError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let persisted: PersistedState =
        serde_json::from_str(&contents).map_err(|source| StateError::Format {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(DashboardState::from(persisted))
}

pub fn save_state(path: &Path, state: &DashboardState) -> Result<(), StateError> {
    let json = serde_json::to_string_pretty(&PersistedState::from(state)).map_err(|source| {
        StateError::Format {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, json).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
