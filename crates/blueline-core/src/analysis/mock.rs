//! Canned analysis backend with an artificial processing delay.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::Instant;
use tracing::debug;

use super::trait_def::PlanAnalyzer;
use super::types::{AnalysisResult, RiskLevel};
use crate::error::ServiceError;
use crate::plan::{PlanCategory, PlanRecord};

/// Analysis backend that returns a fixed urban-renewal assessment.
///
/// Only `plan_type`, `risk_level`, `confidence` and `processing_time_ms`
/// depend on the input or the call; the narrative is the same for every
/// plan.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    latency: Duration,
}

impl MockAnalyzer {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

    /// Lower and upper bound of the reported confidence.
    pub const CONFIDENCE_RANGE: (f64, f64) = (0.80, 0.95);

    pub fn new() -> Self {
        Self {
            latency: Self::DEFAULT_LATENCY,
        }
    }

    /// Override the simulated processing delay.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanAnalyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(
        &self,
        record: &PlanRecord,
        credential: &str,
    ) -> Result<AnalysisResult, ServiceError> {
        if credential.trim().is_empty() {
            return Err(ServiceError::InvalidCredential);
        }
        record
            .validate()
            .map_err(|e| ServiceError::MalformedInput(e.to_string()))?;

        let started = Instant::now();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let (low, high) = Self::CONFIDENCE_RANGE;
        let confidence = rand::rng().random_range(low..=high);
        let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            plan_number = %record.plan_number,
            confidence,
            processing_time_ms,
            "mock analysis complete"
        );

        Ok(canned_analysis(record, confidence, processing_time_ms))
    }
}

fn risk_for(category: PlanCategory) -> RiskLevel {
    match category {
        PlanCategory::National | PlanCategory::Infrastructure => RiskLevel::High,
        PlanCategory::District | PlanCategory::DetailedLocal => RiskLevel::Medium,
        PlanCategory::Online | PlanCategory::Offline | PlanCategory::Unclassified => {
            RiskLevel::Low
        }
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn canned_analysis(record: &PlanRecord, confidence: f64, processing_time_ms: u64) -> AnalysisResult {
    AnalysisResult {
        plan_type: format!("{} - {}", record.category.label(), record.plan_name),
        objectives: lines(&[
            "חיזוק מרכזי העיר והפיכתם לאזורים אטרקטיביים",
            "עידוד מגורים במרכזי ערים",
            "פיתוח מסחר ושירותים ברמה עירונית",
            "שיפור איכות החיים האורבנית",
        ]),
        area_impact: "התכנית תשפיע באופן חיובי על האזור דרך פיתוח מסחרי ומגורים איכותי, \
                      שיפור התחבורה הציבורית, ויצירת מרחבים ציבוריים. \
                      הצפיפות תגדל אך תישמר איכות החיים."
            .to_owned(),
        challenges: lines(&[
            "עלייה בצפיפות והעומס על התשתיות",
            "תחבורה וחניות - צורך בפתרונות יצירתיים",
            "השפעה על בעלי נכסים קיימים",
            "תיאום עם רשויות מקומיות",
        ]),
        recommendations: lines(&[
            "פיתוח תחבורה ציבורית משולבת",
            "יצירת מרחבים ציבוריים איכותיים",
            "הקפדה על עיצוב אדריכלי ברמה גבוהה",
            "תכנון שלבי ליישום הדרגתי",
        ]),
        opportunities: lines(&[
            "הגדלת היצע הדיור במרכז העיר",
            "משיכת עסקים ותעסוקה לאזור",
            "שדרוג תשתיות ציבוריות במימון יזמי",
        ]),
        summary: "תכנית מתקדמת ומקצועית לחיזוק מרכזי עיר. מספקת מסגרת חשובה לפיתוח עירוני \
                  איכותי תוך שמירה על איכות החיים. מומלץ לתמוך בתכנית עם דגש על יישום \
                  מדורג ותכנון תחבורה מתאים."
            .to_owned(),
        risk_level: risk_for(record.category),
        timeline: "5-10 שנים ליישום מלא".to_owned(),
        budget_estimate: "כ-1.2 מיליארד ₪".to_owned(),
        stakeholders: lines(&[
            record.planning_authority.as_str(),
            record.municipality.as_str(),
            "בעלי נכסים ותושבים באזור",
            "משרד התחבורה",
        ]),
        confidence,
        processing_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::plan::{Location, PlanStatus};

    fn record(number: &str, category: PlanCategory) -> PlanRecord {
        PlanRecord {
            plan_number: number.to_owned(),
            plan_name: "מתחם בדיקה".to_owned(),
            category,
            status: PlanStatus::InForce,
            area: "1 מ\"ר".to_owned(),
            location: Location::Address {
                address: "חולון".to_owned(),
            },
            municipality: "חולון".to_owned(),
            planning_authority: "הוועדה המקומית חולון".to_owned(),
            submission_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            approval_date: None,
            description: String::new(),
        }
    }

    fn analyzer() -> MockAnalyzer {
        MockAnalyzer::new().latency(Duration::ZERO)
    }

    #[tokio::test]
    async fn analyze_restates_plan_type_and_risk() {
        let result = analyzer()
            .analyze(&record("תמא/1", PlanCategory::National), "key")
            .await
            .unwrap();
        assert_eq!(result.plan_type, "תכנית ארצית - מתחם בדיקה");
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.objectives.len(), 4);
        assert!(!result.opportunities.is_empty());
        assert!(result.stakeholders.contains(&"חולון".to_owned()));
    }

    #[tokio::test]
    async fn confidence_stays_in_range() {
        let analyzer = analyzer();
        let plan = record("12345", PlanCategory::Online);
        for _ in 0..20 {
            let result = analyzer.analyze(&plan, "key").await.unwrap();
            assert!(
                (0.80..=0.95).contains(&result.confidence),
                "confidence out of range: {}",
                result.confidence
            );
        }
    }

    #[tokio::test]
    async fn empty_credential_is_rejected() {
        let err = analyzer()
            .analyze(&record("12345", PlanCategory::Online), "  ")
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::InvalidCredential);
    }

    #[tokio::test]
    async fn malformed_record_is_rejected() {
        let mut plan = record("12345", PlanCategory::Online);
        plan.approval_date = NaiveDate::from_ymd_opt(2020, 1, 1);
        let err = analyzer().analyze(&plan, "key").await.unwrap_err();
        assert!(matches!(err, ServiceError::MalformedInput(_)));
    }

    #[tokio::test]
    async fn processing_time_reflects_latency() {
        let analyzer = MockAnalyzer::new().latency(Duration::from_millis(30));
        let result = analyzer
            .analyze(&record("12345", PlanCategory::Online), "key")
            .await
            .unwrap();
        assert!(result.processing_time_ms >= 30);
    }

    #[test]
    fn risk_mapping() {
        assert_eq!(risk_for(PlanCategory::Infrastructure), RiskLevel::High);
        assert_eq!(risk_for(PlanCategory::District), RiskLevel::Medium);
        assert_eq!(risk_for(PlanCategory::Offline), RiskLevel::Low);
    }
}
