use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Overall risk rating attached to an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Hebrew display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "נמוך",
            Self::Medium => "בינוני",
            Self::High => "גבוה",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for RiskLevel {
    type Err = RiskLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(RiskLevelParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`RiskLevel`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid risk level: {0:?}")]
pub struct RiskLevelParseError(pub String);

/// Derived, non-authoritative assessment of one plan.
///
/// Never persisted: a session keeps at most one, and drops it when a new
/// search succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Plan type restated in display form.
    pub plan_type: String,
    pub objectives: Vec<String>,
    pub area_impact: String,
    pub challenges: Vec<String>,
    pub recommendations: Vec<String>,
    pub opportunities: Vec<String>,
    pub summary: String,
    pub risk_level: RiskLevel,
    pub timeline: String,
    pub budget_estimate: String,
    pub stakeholders: Vec<String>,
    /// Self-reported certainty in `[0, 1]`. Advisory only.
    pub confidence: f64,
    pub processing_time_ms: u64,
}

impl AnalysisResult {
    /// Confidence clamped into `[0, 1]`; NaN reads as zero.
    pub fn confidence_clamped(&self) -> f64 {
        if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_roundtrip_and_order() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            assert_eq!(level.to_string().parse::<RiskLevel>().unwrap(), level);
        }
        assert!(RiskLevel::Low < RiskLevel::High);
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn confidence_is_clamped() {
        let mut result = AnalysisResult {
            plan_type: String::new(),
            objectives: vec![],
            area_impact: String::new(),
            challenges: vec![],
            recommendations: vec![],
            opportunities: vec![],
            summary: String::new(),
            risk_level: RiskLevel::Low,
            timeline: String::new(),
            budget_estimate: String::new(),
            stakeholders: vec![],
            confidence: 1.7,
            processing_time_ms: 0,
        };
        assert_eq!(result.confidence_clamped(), 1.0);
        result.confidence = f64::NAN;
        assert_eq!(result.confidence_clamped(), 0.0);
        result.confidence = 0.42;
        assert_eq!(result.confidence_clamped(), 0.42);
    }
}
