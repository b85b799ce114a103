//! JSON export of the selected plan and its analysis.
//!
//! The document layout (`planData`, `analysis`, `metadata`) matches what
//! the dashboard offered as a download, so files exported here open in the
//! same tooling.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::plan::PlanRecord;

/// Tool name recorded as the exporter.
pub const TOOL_NAME: &str = "מנתח קווים כחולים";

/// Crate version recorded in every export.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level export artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub plan_data: PlanRecord,
    pub analysis: Option<AnalysisResult>,
    pub metadata: ExportMetadata,
}

/// Provenance block of an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub export_date: DateTime<Utc>,
    pub exported_by: String,
    pub version: String,
    /// Copied from the analysis, when there is one.
    pub confidence: Option<f64>,
    pub processing_time_ms: Option<u64>,
}

impl ExportDocument {
    /// Assemble an export stamped with `now`.
    pub fn new(plan: PlanRecord, analysis: Option<AnalysisResult>, now: DateTime<Utc>) -> Self {
        let metadata = ExportMetadata {
            export_date: now,
            exported_by: TOOL_NAME.to_owned(),
            version: TOOL_VERSION.to_owned(),
            confidence: analysis.as_ref().map(|a| a.confidence),
            processing_time_ms: analysis.as_ref().map(|a| a.processing_time_ms),
        };
        Self {
            plan_data: plan,
            analysis,
            metadata,
        }
    }

    /// `plan-analysis-<plan number, "/" -> "-">-<YYYY-MM-DD>.json`
    pub fn file_name(&self) -> String {
        export_file_name(&self.plan_data.plan_number, self.metadata.export_date)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize export document")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse export document")
    }

    /// Write the document into `dir` under [`Self::file_name`] and return
    /// the full path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create export directory {}", dir.display()))?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json_pretty()?)
            .with_context(|| format!("failed to write export file {}", path.display()))?;
        Ok(path)
    }
}

/// File name for an export of `plan_number` taken at `at`.
pub fn export_file_name(plan_number: &str, at: DateTime<Utc>) -> String {
    format!(
        "plan-analysis-{}-{}.json",
        plan_number.replace('/', "-"),
        at.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::analysis::RiskLevel;
    use crate::plan::{Coordinates, Location, PlanCategory, PlanStatus};

    fn plan() -> PlanRecord {
        PlanRecord {
            plan_number: "תמא/35/א/8".to_owned(),
            plan_name: "תכנית מתאר ארצית - חיזוק מרכזי עיר".to_owned(),
            category: PlanCategory::National,
            status: PlanStatus::InForce,
            area: "125,000 מ\"ר".to_owned(),
            location: Location::Point {
                address: "תל אביב-יפו".to_owned(),
                coordinates: Coordinates::new(32.0853, 34.7818),
            },
            municipality: "תל אביב-יפו".to_owned(),
            planning_authority: "המועצה הארצית לתכנון ובנייה".to_owned(),
            submission_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            approval_date: NaiveDate::from_ymd_opt(2023, 6, 20),
            description: "תכנית לחיזוק מרכזי עיר".to_owned(),
        }
    }

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            plan_type: "תכנית ארצית".to_owned(),
            objectives: vec!["a".to_owned(), "b".to_owned()],
            area_impact: "impact".to_owned(),
            challenges: vec!["c".to_owned()],
            recommendations: vec!["r".to_owned()],
            opportunities: vec!["o".to_owned()],
            summary: "summary".to_owned(),
            risk_level: RiskLevel::Medium,
            timeline: "5 years".to_owned(),
            budget_estimate: "1M".to_owned(),
            stakeholders: vec!["s".to_owned()],
            confidence: 0.87,
            processing_time_ms: 2003,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn file_name_replaces_slashes_and_appends_date() {
        let doc = ExportDocument::new(plan(), None, now());
        assert_eq!(doc.file_name(), "plan-analysis-תמא-35-א-8-2024-05-01.json");
    }

    #[test]
    fn metadata_copies_analysis_provenance() {
        let doc = ExportDocument::new(plan(), Some(analysis()), now());
        assert_eq!(doc.metadata.confidence, Some(0.87));
        assert_eq!(doc.metadata.processing_time_ms, Some(2003));
        assert_eq!(doc.metadata.exported_by, TOOL_NAME);
        assert_eq!(doc.metadata.version, TOOL_VERSION);
    }

    #[test]
    fn metadata_without_analysis_has_no_provenance() {
        let doc = ExportDocument::new(plan(), None, now());
        assert_eq!(doc.metadata.confidence, None);
        assert_eq!(doc.metadata.processing_time_ms, None);
    }

    #[test]
    fn json_roundtrip_preserves_every_field() {
        let doc = ExportDocument::new(plan(), Some(analysis()), now());
        let json = doc.to_json_pretty().unwrap();
        let back = ExportDocument::from_json(&json).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.plan_data, plan());
        assert_eq!(back.analysis, Some(analysis()));
    }

    #[test]
    fn json_layout_uses_dashboard_keys() {
        let doc = ExportDocument::new(plan(), None, now());
        let value: serde_json::Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["planData"]["planNumber"], "תמא/35/א/8");
        assert!(value["analysis"].is_null());
        assert_eq!(value["metadata"]["exportedBy"], TOOL_NAME);
        assert_eq!(value["metadata"]["exportDate"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn write_to_dir_creates_named_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let doc = ExportDocument::new(plan(), Some(analysis()), now());
        let path = doc.write_to_dir(&tmp.path().join("out")).unwrap();

        assert!(path.ends_with(doc.file_name()));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(ExportDocument::from_json(&written).unwrap(), doc);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(ExportDocument::from_json("{\"planData\": 1}").is_err());
    }
}
