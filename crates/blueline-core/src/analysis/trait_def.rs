//! The `PlanAnalyzer` trait -- the adapter interface for analysis backends.

use async_trait::async_trait;

use super::types::AnalysisResult;
use crate::error::ServiceError;
use crate::plan::PlanRecord;

/// Produces an [`AnalysisResult`] for a plan.
///
/// Results are model-generated: two calls with the same input may differ.
/// Invalid credentials, an unreachable upstream and malformed records all
/// come back as a [`ServiceError`], never as a partial result.
///
/// Callers check that `credential` is non-empty before calling; backends
/// still reject an empty one.
#[async_trait]
pub trait PlanAnalyzer: Send + Sync {
    /// Short backend name for logs (e.g. "mock").
    fn name(&self) -> &str;

    async fn analyze(
        &self,
        record: &PlanRecord,
        credential: &str,
    ) -> Result<AnalysisResult, ServiceError>;
}

// Compile-time assertion: PlanAnalyzer must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanAnalyzer) {}
};
