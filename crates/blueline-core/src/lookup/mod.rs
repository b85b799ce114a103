//! Plan lookup: the [`PlanLookup`] backend trait and the catalog-backed
//! [`MockLookup`].

mod catalog;
pub mod mock;
pub mod trait_def;

pub use mock::MockLookup;
pub use trait_def::PlanLookup;
