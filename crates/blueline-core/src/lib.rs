//! Core library for searching Israeli blue-line planning records and
//! attaching an analysis to a selected plan.
//!
//! - [`plan`]: record types and plan-number classification.
//! - [`lookup`]: the registry backend trait and its catalog-backed mock.
//! - [`analysis`]: the analysis backend trait and its canned mock.
//! - [`settings`]: credential and recent-search persistence.
//! - [`session`]: the stateful front door tying the above together.
//! - [`export`]: the JSON export artifact.

pub mod analysis;
pub mod error;
pub mod export;
pub mod lookup;
pub mod plan;
pub mod session;
pub mod settings;

pub use error::{ServiceError, SessionError, ValidationError};
