//! Plan records and plan-number classification.

pub mod classify;
pub mod types;

pub use classify::classify;
pub use types::{
    Bounds, BoundsParseError, Coordinates, Location, PlanCategory, PlanCategoryParseError,
    PlanRecord, PlanStatus, PlanStatusParseError, RecordError,
};
