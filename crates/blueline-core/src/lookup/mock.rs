//! In-memory lookup backend with an artificial round-trip delay.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::catalog;
use super::trait_def::PlanLookup;
use crate::error::ServiceError;
use crate::plan::{Bounds, PlanRecord};

/// Lookup backend serving the fixed demonstration catalog.
///
/// Results are deterministic; the only moving part is the `latency` sleep
/// before each answer, which stands in for a registry round trip.
#[derive(Debug, Clone)]
pub struct MockLookup {
    records: Vec<PlanRecord>,
    latency: Duration,
}

impl MockLookup {
    /// Default delay, matching what the dashboard showed its users.
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);

    /// Catalog-backed lookup with [`Self::DEFAULT_LATENCY`].
    pub fn new() -> Self {
        Self::with_records(catalog::records())
    }

    /// Lookup over an explicit record set (no validation is applied).
    pub fn with_records(records: Vec<PlanRecord>) -> Self {
        Self {
            records,
            latency: Self::DEFAULT_LATENCY,
        }
    }

    /// Override the simulated round-trip delay.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn records(&self) -> &[PlanRecord] {
        &self.records
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanLookup for MockLookup {
    fn name(&self) -> &str {
        "mock"
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<PlanRecord>, ServiceError> {
        self.round_trip().await;
        let number = number.trim();
        let found = self
            .records
            .iter()
            .find(|r| r.plan_number == number)
            .cloned();
        debug!(number, found = found.is_some(), "mock lookup by number");
        Ok(found)
    }

    async fn find_by_address(&self, address: &str) -> Result<Vec<PlanRecord>, ServiceError> {
        self.round_trip().await;
        let needle = address.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let found: Vec<PlanRecord> = self
            .records
            .iter()
            .filter(|r| {
                r.location.address().to_lowercase().contains(&needle)
                    || r.municipality.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        debug!(address, hits = found.len(), "mock lookup by address");
        Ok(found)
    }

    async fn find_in_area(&self, bounds: Option<Bounds>) -> Result<Vec<PlanRecord>, ServiceError> {
        self.round_trip().await;
        let found: Vec<PlanRecord> = match bounds {
            Some(bounds) => self
                .records
                .iter()
                .filter(|r| r.location.coordinates().is_some_and(|c| bounds.contains(c)))
                .cloned()
                .collect(),
            None => self.records.clone(),
        };
        debug!(?bounds, hits = found.len(), "mock lookup in area");
        Ok(found)
    }
}
