//! Plan analysis: the [`PlanAnalyzer`] backend trait, the
//! [`AnalysisResult`] it produces, and the canned [`MockAnalyzer`].

pub mod mock;
pub mod trait_def;
pub mod types;

pub use mock::MockAnalyzer;
pub use trait_def::PlanAnalyzer;
pub use types::{AnalysisResult, RiskLevel, RiskLevelParseError};
