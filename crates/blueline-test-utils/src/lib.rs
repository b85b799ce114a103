//! Shared fixtures and fake backends for blueline tests.
//!
//! Fakes here model the failure and timing behaviour real backends can
//! show; the mock backends in `blueline-core` only ever succeed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use blueline_core::analysis::{AnalysisResult, MockAnalyzer, PlanAnalyzer, RiskLevel};
use blueline_core::error::ServiceError;
use blueline_core::lookup::{MockLookup, PlanLookup};
use blueline_core::plan::{Bounds, Coordinates, Location, PlanCategory, PlanRecord, PlanStatus};
use blueline_core::session::{Session, SessionOptions};
use blueline_core::settings::{MemorySettingsStore, Settings};

/// The national plan the dashboard used as its demonstration record.
pub fn sample_plan() -> PlanRecord {
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
        description: "תכנית לחיזוק מרכזי עיר ופיתוח מסחרי ומגורים".to_owned(),
    }
}

/// A plan whose approval predates its submission.
pub fn malformed_plan() -> PlanRecord {
    PlanRecord {
        approval_date: NaiveDate::from_ymd_opt(2020, 1, 1),
        ..sample_plan()
    }
}

pub fn sample_analysis() -> AnalysisResult {
    AnalysisResult {
        plan_type: "תכנית ארצית - חיזוק מרכזי עיר".to_owned(),
        objectives: vec!["עידוד מגורים במרכזי ערים".to_owned()],
        area_impact: "השפעה חיובית".to_owned(),
        challenges: vec!["עומס על התשתיות".to_owned()],
        recommendations: vec!["תחבורה ציבורית משולבת".to_owned()],
        opportunities: vec!["הגדלת היצע הדיור".to_owned()],
        summary: "מומלץ לתמוך בתכנית".to_owned(),
        risk_level: RiskLevel::High,
        timeline: "5-10 שנים".to_owned(),
        budget_estimate: "1.2 מיליארד ₪".to_owned(),
        stakeholders: vec!["המועצה הארצית לתכנון ובנייה".to_owned()],
        confidence: 0.9,
        processing_time_ms: 2000,
    }
}

/// Session over the zero-latency mocks and an in-memory settings store.
pub fn mock_session(settings: Settings) -> Session {
    session_with(
        Arc::new(MockLookup::new().latency(Duration::ZERO)),
        Arc::new(MockAnalyzer::new().latency(Duration::ZERO)),
        settings,
    )
}

/// Session over arbitrary backends and an in-memory settings store.
pub fn session_with(
    lookup: Arc<dyn PlanLookup>,
    analyzer: Arc<dyn PlanAnalyzer>,
    settings: Settings,
) -> Session {
    session_with_options(lookup, analyzer, settings, SessionOptions::default())
}

/// Like [`session_with`], with explicit options (e.g. a short timeout).
pub fn session_with_options(
    lookup: Arc<dyn PlanLookup>,
    analyzer: Arc<dyn PlanAnalyzer>,
    settings: Settings,
    options: SessionOptions,
) -> Session {
    Session::open(
        lookup,
        analyzer,
        Box::new(MemorySettingsStore::new(settings)),
        options,
    )
    .expect("in-memory settings store never fails to load")
}

/// Settings with an API key already configured.
pub fn keyed_settings() -> Settings {
    Settings {
        api_key: Some("test-key".to_owned()),
        ..Settings::default()
    }
}

// ---------------------------------------------------------------------------
// Fake backends
// ---------------------------------------------------------------------------

/// Lookup that fails every call with the given error.
pub struct FailingLookup {
    pub error: ServiceError,
}

impl FailingLookup {
    pub fn transport() -> Self {
        Self {
            error: ServiceError::Transport("connection reset by peer".to_owned()),
        }
    }
}

#[async_trait]
impl PlanLookup for FailingLookup {
    fn name(&self) -> &str {
        "failing"
    }

    async fn find_by_number(&self, _number: &str) -> Result<Option<PlanRecord>, ServiceError> {
        Err(self.error.clone())
    }

    async fn find_by_address(&self, _address: &str) -> Result<Vec<PlanRecord>, ServiceError> {
        Err(self.error.clone())
    }

    async fn find_in_area(&self, _bounds: Option<Bounds>) -> Result<Vec<PlanRecord>, ServiceError> {
        Err(self.error.clone())
    }
}

/// How a [`FlakyLookup`] misbehaves after its first call.
#[derive(Debug, Clone)]
pub enum Relapse {
    Fail(ServiceError),
    Stall(Duration),
}

/// Lookup that answers the first call from the catalog, then misbehaves.
pub struct FlakyLookup {
    inner: MockLookup,
    relapse: Relapse,
    calls: AtomicUsize,
}

impl FlakyLookup {
    pub fn new(relapse: Relapse) -> Self {
        Self {
            inner: MockLookup::new().latency(Duration::ZERO),
            relapse,
            calls: AtomicUsize::new(0),
        }
    }

    /// Later calls fail with a transport error.
    pub fn transport() -> Self {
        Self::new(Relapse::Fail(ServiceError::Transport(
            "connection reset by peer".to_owned(),
        )))
    }

    /// Later calls hang for `delay` before answering.
    pub fn stalling(delay: Duration) -> Self {
        Self::new(Relapse::Stall(delay))
    }

    async fn relapse(&self) -> Result<(), ServiceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(());
        }
        match &self.relapse {
            Relapse::Fail(error) => Err(error.clone()),
            Relapse::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl PlanLookup for FlakyLookup {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<PlanRecord>, ServiceError> {
        self.relapse().await?;
        self.inner.find_by_number(number).await
    }

    async fn find_by_address(&self, address: &str) -> Result<Vec<PlanRecord>, ServiceError> {
        self.relapse().await?;
        self.inner.find_by_address(address).await
    }

    async fn find_in_area(&self, bounds: Option<Bounds>) -> Result<Vec<PlanRecord>, ServiceError> {
        self.relapse().await?;
        self.inner.find_in_area(bounds).await
    }
}

/// Analyzer that fails every call with the given error.
pub struct FailingAnalyzer {
    pub error: ServiceError,
}

#[async_trait]
impl PlanAnalyzer for FailingAnalyzer {
    fn name(&self) -> &str {
        "failing"
    }

    async fn analyze(
        &self,
        _record: &PlanRecord,
        _credential: &str,
    ) -> Result<AnalysisResult, ServiceError> {
        Err(self.error.clone())
    }
}

/// Analyzer that counts calls and returns [`sample_analysis`].
#[derive(Default)]
pub struct CountingAnalyzer {
    calls: AtomicUsize,
}

impl CountingAnalyzer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlanAnalyzer for CountingAnalyzer {
    fn name(&self) -> &str {
        "counting"
    }

    async fn analyze(
        &self,
        _record: &PlanRecord,
        _credential: &str,
    ) -> Result<AnalysisResult, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(sample_analysis())
    }
}

/// Analyzer that succeeds once, then fails every later call.
#[derive(Default)]
pub struct FlakyAnalyzer {
    calls: AtomicUsize,
}

#[async_trait]
impl PlanAnalyzer for FlakyAnalyzer {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn analyze(
        &self,
        _record: &PlanRecord,
        _credential: &str,
    ) -> Result<AnalysisResult, ServiceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(sample_analysis())
        } else {
            Err(ServiceError::Backend("model overloaded".to_owned()))
        }
    }
}
