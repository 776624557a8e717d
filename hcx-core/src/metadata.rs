//! Variable catalog and the service's metadata and health responses.

use crate::payload::{Candidates, Payload};
use serde::Serialize;
use serde_json::Value;

const VARIABLES: Candidates = &["data.variables", "variables"];
const REGIONS: Candidates = &["data.regions", "regions"];
const STATUS: Candidates = &["data.status", "status"];
const TIMESTAMP: Candidates = &["data.timestamp", "timestamp"];

/// Display metadata for a climate variable code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableInfo {
    pub code: String,
    pub name: String,
    pub unit: String,
}

/// (code, name, unit) for the gridded variables the service serves.
const CATALOG: [(&str, &str, &str); 10] = [
    ("tmp", "Mean Temperature", "°C"),
    ("tmx", "Maximum Temperature", "°C"),
    ("tmn", "Minimum Temperature", "°C"),
    ("dtr", "Diurnal Temperature Range", "°C"),
    ("pre", "Precipitation", "mm"),
    ("wet", "Wet Day Frequency", "days"),
    ("frs", "Frost Day Frequency", "days"),
    ("vap", "Vapour Pressure", "hPa"),
    ("cld", "Cloud Cover", "%"),
    ("pet", "Potential Evapotranspiration", "mm/day"),
];

impl VariableInfo {
    /// Unknown codes keep the code as their name and have no unit.
    pub fn lookup(code: &str) -> VariableInfo {
        let code = code.trim();
        match CATALOG
            .iter()
            .find(|(known, _, _)| known.eq_ignore_ascii_case(code))
        {
            Some((known, name, unit)) => VariableInfo {
                code: known.to_string(),
                name: name.to_string(),
                unit: unit.to_string(),
            },
            None => VariableInfo {
                code: code.to_string(),
                name: code.to_string(),
                unit: String::new(),
            },
        }
    }

    pub fn catalog() -> Vec<VariableInfo> {
        CATALOG.iter().map(|(code, _, _)| VariableInfo::lookup(code)).collect()
    }
}

/// Variable codes offered by `/metadata/variables`.
pub fn variables_from_payload(raw: &Value) -> Vec<String> {
    codes(Payload::new(raw).strings(VARIABLES))
}

/// Region codes offered by `/metadata/regions`.
pub fn regions_from_payload(raw: &Value) -> Vec<String> {
    codes(Payload::new(raw).strings(REGIONS))
}

fn codes(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn from_payload(raw: &Value) -> HealthStatus {
        let payload = Payload::new(raw);
        HealthStatus {
            status: payload.string(STATUS).unwrap_or("unknown").to_string(),
            timestamp: payload.string(TIMESTAMP).map(str::to_string),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy")
    }
}
