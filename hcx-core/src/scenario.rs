//! Shared Socioeconomic Pathway projections.

use crate::payload::{Candidates, Payload};
use serde::Serialize;
use serde_json::Value;

/// Target year requested by a standard analysis run.
pub const DEFAULT_SCENARIO_TARGET_YEAR: i32 = 2050;

const BASELINE: Candidates = &["scenarios.baseline", "baseline"];

/// The four pathways every scenario set carries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioId {
    Ssp1,
    Ssp2,
    Ssp3,
    Ssp5,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 4] = [
        ScenarioId::Ssp1,
        ScenarioId::Ssp2,
        ScenarioId::Ssp3,
        ScenarioId::Ssp5,
    ];

    /// Wire key of the branch, e.g. `ssp2`.
    pub fn key(self) -> &'static str {
        match self {
            ScenarioId::Ssp1 => "ssp1",
            ScenarioId::Ssp2 => "ssp2",
            ScenarioId::Ssp3 => "ssp3",
            ScenarioId::Ssp5 => "ssp5",
        }
    }

    pub fn default_name(self) -> &'static str {
        match self {
            ScenarioId::Ssp1 => "SSP1-2.6 (Sustainability)",
            ScenarioId::Ssp2 => "SSP2-4.5 (Middle of the Road)",
            ScenarioId::Ssp3 => "SSP3-7.0 (Regional Rivalry)",
            ScenarioId::Ssp5 => "SSP5-8.5 (Fossil-fueled Development)",
        }
    }

    pub fn default_color(self) -> &'static str {
        match self {
            ScenarioId::Ssp1 => "#10b981",
            ScenarioId::Ssp2 => "#f59e0b",
            ScenarioId::Ssp3 => "#ef4444",
            ScenarioId::Ssp5 => "#b91c1c",
        }
    }

    /// Position within [`ScenarioId::ALL`].
    pub fn index(self) -> usize {
        match self {
            ScenarioId::Ssp1 => 0,
            ScenarioId::Ssp2 => 1,
            ScenarioId::Ssp3 => 2,
            ScenarioId::Ssp5 => 3,
        }
    }

    /// Nested dialect first, flat second.
    fn candidates(self) -> [String; 2] {
        [format!("scenarios.{}", self.key()), self.key().to_string()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioProjection {
    pub id: ScenarioId,
    pub name: String,
    pub projected_change: f64,
    pub future_value: f64,
    pub percent_change: f64,
    pub display_color: String,
}

impl ScenarioProjection {
    /// Placeholder used when the service omits the branch.
    pub fn placeholder(id: ScenarioId) -> ScenarioProjection {
        ScenarioProjection {
            id,
            name: id.default_name().to_string(),
            projected_change: 0.0,
            future_value: 0.0,
            percent_change: 0.0,
            display_color: id.default_color().to_string(),
        }
    }

    fn from_branch(id: ScenarioId, branch: Payload<'_>) -> ScenarioProjection {
        ScenarioProjection {
            id,
            name: branch
                .string(&["name"])
                .unwrap_or(id.default_name())
                .to_string(),
            projected_change: branch.number_or(&["projected_change"], 0.0),
            future_value: branch.number_or(&["future_value"], 0.0),
            percent_change: branch.number_or(&["percent_change"], 0.0),
            display_color: branch
                .string(&["color", "display_color"])
                .unwrap_or(id.default_color())
                .to_string(),
        }
    }
}

/// All four branches plus the shared baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSet {
    /// Ordered as [`ScenarioId::ALL`].
    pub branches: [ScenarioProjection; 4],
    pub baseline: f64,
}

impl ScenarioSet {
    pub fn from_payload(raw: &Value) -> ScenarioSet {
        let payload = Payload::new(raw);
        let branches = ScenarioId::ALL.map(|id| {
            let candidates = id.candidates();
            let paths = [candidates[0].as_str(), candidates[1].as_str()];
            match payload.object(&paths) {
                Some(branch) => ScenarioProjection::from_branch(id, branch),
                None => ScenarioProjection::placeholder(id),
            }
        });
        ScenarioSet {
            branches,
            baseline: payload.number_or(BASELINE, 0.0),
        }
    }

    pub fn branch(&self, id: ScenarioId) -> &ScenarioProjection {
        &self.branches[id.index()]
    }
}
