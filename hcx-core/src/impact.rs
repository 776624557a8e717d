use crate::payload::{as_f64, Candidates, Payload};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

const RISK_LEVEL: Candidates = &["impact.risk_level", "risk_level"];
const RISK_SCORE: Candidates = &["impact.risk_score", "risk_score"];
const IMPACT_AREAS: Candidates = &["impact.impact_areas", "impact_areas"];
const RECOMMENDATIONS: Candidates = &["impact.recommendations", "recommendations"];
const SECTOR_VULNERABILITY: Candidates = &["impact.sector_vulnerability", "sector_vulnerability"];

/// Upper bound of the risk score scale.
pub const MAX_RISK_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Case-insensitive; unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<RiskLevel> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "moderate" | "medium" => Some(RiskLevel::Moderate),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::Critical => "#ef4444",
            RiskLevel::High => "#f97316",
            RiskLevel::Moderate => "#f59e0b",
            RiskLevel::Low => "#10b981",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn parse(label: &str) -> Option<Priority> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" | "moderate" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImpactAssessment {
    pub risk_level: RiskLevel,
    /// Clamped to `[0, MAX_RISK_SCORE]`.
    pub risk_score: f64,
    /// Distinct labels, first occurrence order.
    pub impact_areas: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub sector_vulnerability: BTreeMap<String, f64>,
}

impl ImpactAssessment {
    pub fn from_payload(raw: &Value) -> ImpactAssessment {
        let payload = Payload::new(raw);
        let risk_score = payload.number_or(RISK_SCORE, 0.0);
        let risk_score = if risk_score.is_nan() {
            0.0
        } else {
            risk_score.clamp(0.0, MAX_RISK_SCORE)
        };

        let mut impact_areas: Vec<String> = Vec::new();
        for area in payload.strings(IMPACT_AREAS) {
            let area = area.trim();
            if !area.is_empty() && !impact_areas.iter().any(|a| a == area) {
                impact_areas.push(area.to_string());
            }
        }

        let recommendations = payload
            .array(RECOMMENDATIONS)
            .unwrap_or_default()
            .iter()
            .map(|item| {
                let item = Payload::new(item);
                Recommendation {
                    priority: item
                        .string(&["priority"])
                        .and_then(Priority::parse)
                        .unwrap_or_default(),
                    action: item.string(&["action"]).unwrap_or_default().to_string(),
                    category: item.string(&["category"]).unwrap_or_default().to_string(),
                }
            })
            .collect();

        let sector_vulnerability = payload
            .first(SECTOR_VULNERABILITY)
            .and_then(Value::as_object)
            .map(|sectors| {
                sectors
                    .iter()
                    .filter_map(|(sector, score)| as_f64(score).map(|s| (sector.clone(), s)))
                    .collect()
            })
            .unwrap_or_default();

        ImpactAssessment {
            risk_level: payload
                .string(RISK_LEVEL)
                .and_then(RiskLevel::parse)
                .unwrap_or_default(),
            risk_score,
            impact_areas,
            recommendations,
            sector_vulnerability,
        }
    }
}
