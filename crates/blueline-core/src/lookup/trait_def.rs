//! The `PlanLookup` trait -- the adapter interface for planning registries.
//!
//! The trait is object-safe so a session can hold any backend as
//! `Arc<dyn PlanLookup>`.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::plan::{Bounds, PlanRecord};

/// Read-only access to a registry of planning records.
///
/// Every method either fully succeeds or returns a [`ServiceError`]; a
/// backend must never hand back a partial result set. An empty result is a
/// successful "no matches" answer.
#[async_trait]
pub trait PlanLookup: Send + Sync {
    /// Short backend name for logs (e.g. "mock").
    fn name(&self) -> &str;

    /// Find the single plan with this plan number, if any.
    async fn find_by_number(&self, number: &str) -> Result<Option<PlanRecord>, ServiceError>;

    /// Find all plans located at or near an address.
    async fn find_by_address(&self, address: &str) -> Result<Vec<PlanRecord>, ServiceError>;

    /// Find all plans inside `bounds`. `None` means the backend's default
    /// scope.
    async fn find_in_area(&self, bounds: Option<Bounds>) -> Result<Vec<PlanRecord>, ServiceError>;
}

// Compile-time assertion: PlanLookup must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanLookup) {}
};
