use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Canonical plan category, derived from the plan number.
///
/// The authority-assigned free-text "plan type" is never stored as a
/// category; it only shows up as a display string in analysis output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanCategory {
    National,
    DetailedLocal,
    Infrastructure,
    District,
    Online,
    Offline,
    Unclassified,
}

impl PlanCategory {
    /// Every category, in classification rule order.
    pub const ALL: [PlanCategory; 7] = [
        Self::National,
        Self::DetailedLocal,
        Self::Infrastructure,
        Self::District,
        Self::Online,
        Self::Offline,
        Self::Unclassified,
    ];

    /// Hebrew display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::National => "תכנית ארצית",
            Self::DetailedLocal => "תכנית מקומית מפורטת",
            Self::Infrastructure => "תכנית תשתיות",
            Self::District => "תכנית מחוזית",
            Self::Online => "תכנית מקוונת",
            Self::Offline => "תכנית לא מקוונת",
            Self::Unclassified => "סוג לא מזוהה",
        }
    }
}

impl fmt::Display for PlanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::National => "national",
            Self::DetailedLocal => "detailed_local",
            Self::Infrastructure => "infrastructure",
            Self::District => "district",
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unclassified => "unclassified",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanCategory {
    type Err = PlanCategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "national" => Ok(Self::National),
            "detailed_local" => Ok(Self::DetailedLocal),
            "infrastructure" => Ok(Self::Infrastructure),
            "district" => Ok(Self::District),
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "unclassified" => Ok(Self::Unclassified),
            other => Err(PlanCategoryParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanCategory`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid plan category: {0:?}")]
pub struct PlanCategoryParseError(pub String);

// ---------------------------------------------------------------------------

/// Statutory status of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    InForce,
    InPreparation,
    Suspended,
    Unknown,
}

impl PlanStatus {
    /// Hebrew display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InForce => "בתוקף",
            Self::InPreparation => "בהכנה",
            Self::Suspended => "מושהית",
            Self::Unknown => "לא ידוע",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InForce => "in_force",
            Self::InPreparation => "in_preparation",
            Self::Suspended => "suspended",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanStatus {
    type Err = PlanStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_force" => Ok(Self::InForce),
            "in_preparation" => Ok(Self::InPreparation),
            "suspended" => Ok(Self::Suspended),
            "unknown" => Ok(Self::Unknown),
            other => Err(PlanStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanStatus`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid plan status: {0:?}")]
pub struct PlanStatusParseError(pub String);

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Axis-aligned bounding box. Containment is inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Build a box, rejecting inverted edges.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, BoundsParseError> {
        if [south, west, north, east].iter().any(|v| !v.is_finite()) {
            return Err(BoundsParseError::NotFinite);
        }
        if south > north {
            return Err(BoundsParseError::Inverted("south", "north"));
        }
        if west > east {
            return Err(BoundsParseError::Inverted("west", "east"));
        }
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lon >= self.west
            && point.lon <= self.east
    }
}

impl FromStr for Bounds {
    type Err = BoundsParseError;

    /// Parse `south,west,north,east`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BoundsParseError::WrongArity(parts.len()));
        }
        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BoundsParseError::InvalidNumber((*part).to_owned()))?;
        }
        Self::new(values[0], values[1], values[2], values[3])
    }
}

/// Error returned when a bounding box cannot be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundsParseError {
    #[error("expected 4 comma-separated values (south,west,north,east), got {0}")]
    WrongArity(usize),

    #[error("invalid coordinate value: {0:?}")]
    InvalidNumber(String),

    #[error("coordinates must be finite numbers")]
    NotFinite,

    #[error("{0} edge is greater than {1} edge")]
    Inverted(&'static str, &'static str),
}

/// Where a plan sits: a bare address, or an address with a coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    Address {
        address: String,
    },
    Point {
        address: String,
        coordinates: Coordinates,
    },
}

impl Location {
    pub fn address(&self) -> &str {
        match self {
            Self::Address { address } | Self::Point { address, .. } => address,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Address { .. } => None,
            Self::Point { coordinates, .. } => Some(*coordinates),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address { address } => f.write_str(address),
            Self::Point {
                address,
                coordinates,
            } => write!(
                f,
                "{address} ({:.4}, {:.4})",
                coordinates.lat, coordinates.lon
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A single planning case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecord {
    pub plan_number: String,
    pub plan_name: String,
    pub category: PlanCategory,
    pub status: PlanStatus,
    /// Free-form magnitude, e.g. `125,000 מ"ר`.
    pub area: String,
    pub location: Location,
    pub municipality: String,
    pub planning_authority: String,
    pub submission_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<NaiveDate>,
    pub description: String,
}

/// A record that breaks a data-model invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("plan number is empty")]
    EmptyPlanNumber,

    #[error("approval date {approved} is earlier than submission date {submitted}")]
    ApprovalBeforeSubmission {
        submitted: NaiveDate,
        approved: NaiveDate,
    },
}

impl PlanRecord {
    /// Check the record-level invariants.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.plan_number.trim().is_empty() {
            return Err(RecordError::EmptyPlanNumber);
        }
        match self.approval_date {
            Some(approved) if approved < self.submission_date => {
                Err(RecordError::ApprovalBeforeSubmission {
                    submitted: self.submission_date,
                    approved,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approval_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PlanRecord {
        PlanRecord {
            plan_number: "תמא/35/א/8".to_owned(),
            plan_name: "test".to_owned(),
            category: PlanCategory::National,
            status: PlanStatus::InForce,
            area: "1 מ\"ר".to_owned(),
            location: Location::Address {
                address: "תל אביב-יפו".to_owned(),
            },
            municipality: "תל אביב-יפו".to_owned(),
            planning_authority: "authority".to_owned(),
            submission_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            approval_date: NaiveDate::from_ymd_opt(2023, 6, 20),
            description: String::new(),
        }
    }

    #[test]
    fn category_display_fromstr_roundtrip() {
        for category in PlanCategory::ALL {
            let parsed: PlanCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn category_parse_rejects_unknown() {
        let err = "regional".parse::<PlanCategory>().unwrap_err();
        assert!(err.to_string().contains("regional"));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&PlanStatus::InPreparation).unwrap();
        assert_eq!(json, "\"in_preparation\"");
        assert_eq!("suspended".parse::<PlanStatus>().unwrap(), PlanStatus::Suspended);
    }

    #[test]
    fn bounds_parse_valid() {
        let b: Bounds = "31.9, 34.7, 32.2, 34.9".parse().unwrap();
        assert_eq!(b.south, 31.9);
        assert_eq!(b.east, 34.9);
        assert!(b.contains(Coordinates::new(32.0, 34.8)));
        assert!(b.contains(Coordinates::new(31.9, 34.7)), "edges are inclusive");
        assert!(!b.contains(Coordinates::new(33.0, 34.8)));
    }

    #[test]
    fn bounds_parse_rejects_bad_input() {
        assert_eq!(
            "1,2,3".parse::<Bounds>().unwrap_err(),
            BoundsParseError::WrongArity(3)
        );
        assert!(matches!(
            "a,2,3,4".parse::<Bounds>(),
            Err(BoundsParseError::InvalidNumber(_))
        ));
        assert_eq!(
            "32,34,31,35".parse::<Bounds>().unwrap_err(),
            BoundsParseError::Inverted("south", "north")
        );
        assert_eq!(
            "31,35,32,34".parse::<Bounds>().unwrap_err(),
            BoundsParseError::Inverted("west", "east")
        );
    }

    #[test]
    fn validate_accepts_ordered_dates() {
        assert_eq!(record().validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_missing_approval() {
        let mut r = record();
        r.approval_date = None;
        assert!(r.validate().is_ok());
        assert!(!r.is_approved());
    }

    #[test]
    fn validate_rejects_approval_before_submission() {
        let mut r = record();
        r.approval_date = NaiveDate::from_ymd_opt(2022, 12, 31);
        assert!(matches!(
            r.validate(),
            Err(RecordError::ApprovalBeforeSubmission { .. })
        ));
    }

    #[test]
    fn validate_rejects_blank_plan_number() {
        let mut r = record();
        r.plan_number = "   ".to_owned();
        assert_eq!(r.validate(), Err(RecordError::EmptyPlanNumber));
    }

    #[test]
    fn record_json_uses_camel_case_and_iso_dates() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["planNumber"], "תמא/35/א/8");
        assert_eq!(value["submissionDate"], "2023-01-15");
        assert_eq!(value["approvalDate"], "2023-06-20");
        assert_eq!(value["category"], "national");
        assert_eq!(value["location"]["kind"], "address");
    }

    #[test]
    fn location_accessors() {
        let loc = Location::Point {
            address: "רחובות".to_owned(),
            coordinates: Coordinates::new(31.89, 34.81),
        };
        assert_eq!(loc.address(), "רחובות");
        assert_eq!(loc.coordinates(), Some(Coordinates::new(31.89, 34.81)));
        assert!(loc.to_string().starts_with("רחובות ("));
    }
}
