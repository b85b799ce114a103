//! Fixed demonstration catalog served by [`super::MockLookup`].
//!
//! One record per category the classifier can produce for a real plan
//! number, spread over a few municipalities so address and area searches
//! have something to discriminate on.

use chrono::NaiveDate;

use crate::plan::{Coordinates, Location, PlanRecord, PlanStatus, classify};

struct CatalogEntry {
    plan_number: &'static str,
    plan_name: &'static str,
    status: PlanStatus,
    area: &'static str,
    address: &'static str,
    coordinates: Option<(f64, f64)>,
    municipality: &'static str,
    planning_authority: &'static str,
    submission_date: NaiveDate,
    approval_date: Option<NaiveDate>,
    description: &'static str,
}

/// Evaluated at compile time, so a bad literal fails the build.
const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid catalog date"),
    }
}

const ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        plan_number: "תמא/35/א/8",
        plan_name: "תכנית מתאר ארצית - חיזוק מרכזי עיר",
        status: PlanStatus::InForce,
        area: "125,000 מ\"ר",
        address: "תל אביב-יפו",
        coordinates: Some((32.0853, 34.7818)),
        municipality: "תל אביב-יפו",
        planning_authority: "המועצה הארצית לתכנון ובנייה",
        submission_date: ymd(2023, 1, 15),
        approval_date: Some(ymd(2023, 6, 20)),
        description: "תכנית לחיזוק מרכזי עיר ופיתוח מסחרי ומגורים",
    },
    CatalogEntry {
        plan_number: "תמל/1024",
        plan_name: "מתחם מגורים רמת השרון צפון",
        status: PlanStatus::InPreparation,
        area: "48,500 מ\"ר",
        address: "שדרות ביאליק, רמת השרון",
        coordinates: Some((32.1461, 34.8394)),
        municipality: "רמת השרון",
        planning_authority: "הוועדה הארצית לתכנון ולבנייה של קרקעות מועדפות לדיור",
        submission_date: ymd(2024, 3, 10),
        approval_date: None,
        description: "תכנית מפורטת להקמת כ-1,200 יחידות דיור, מבני ציבור ושטחים פתוחים",
    },
    CatalogEntry {
        plan_number: "תתל/101",
        plan_name: "קו רכבת קלה - הקו הסגול",
        status: PlanStatus::InForce,
        area: "2,300,000 מ\"ר",
        address: "גוש דן, תל אביב-יפו",
        coordinates: Some((32.0700, 34.8000)),
        municipality: "תל אביב-יפו",
        planning_authority: "הוועדה לתשתיות לאומיות",
        submission_date: ymd(2019, 5, 2),
        approval_date: Some(ymd(2021, 2, 14)),
        description: "תוואי רכבת קלה, תחנות, חניונים ומסדרונות תשתית נלווים",
    },
    CatalogEntry {
        plan_number: "תממ/5/2",
        plan_name: "תכנית מתאר מחוזית - מחוז תל אביב",
        status: PlanStatus::InForce,
        area: "171,000,000 מ\"ר",
        address: "מחוז תל אביב",
        coordinates: None,
        municipality: "מחוז תל אביב",
        planning_authority: "הוועדה המחוזית לתכנון ובנייה תל אביב",
        submission_date: ymd(2011, 9, 1),
        approval_date: Some(ymd(2016, 3, 29)),
        description: "מסגרת תכנונית מחוזית לייעודי קרקע, צפיפויות ומערכות תחבורה",
    },
    CatalogEntry {
        plan_number: "507-0271700",
        plan_name: "התחדשות עירונית רחוב הרצל",
        status: PlanStatus::Suspended,
        area: "6,200 מ\"ר",
        address: "רחוב הרצל 12, רחובות",
        coordinates: Some((31.8928, 34.8113)),
        municipality: "רחובות",
        planning_authority: "הוועדה המקומית לתכנון ובנייה רחובות",
        submission_date: ymd(2022, 11, 1),
        approval_date: None,
        description: "הריסה ובנייה מחדש של שלושה מבני מגורים בתוספת חזית מסחרית",
    },
    CatalogEntry {
        plan_number: "חפ/2000",
        plan_name: "תכנית מתאר מקומית חיפה",
        status: PlanStatus::Unknown,
        area: "63,700,000 מ\"ר",
        address: "חיפה",
        coordinates: Some((32.7940, 34.9896)),
        municipality: "חיפה",
        planning_authority: "הוועדה המקומית לתכנון ובנייה חיפה",
        submission_date: ymd(2008, 6, 12),
        approval_date: Some(ymd(2012, 1, 3)),
        description: "תכנית מתאר כוללנית לעיר חיפה",
    },
];

/// Build the catalog. Categories are derived from the plan numbers so the
/// records always agree with [`classify`].
pub(crate) fn records() -> Vec<PlanRecord> {
    ENTRIES.iter().map(to_record).collect()
}

fn to_record(entry: &CatalogEntry) -> PlanRecord {
    let location = match entry.coordinates {
        Some((lat, lon)) => Location::Point {
            address: entry.address.to_owned(),
            coordinates: Coordinates::new(lat, lon),
        },
        None => Location::Address {
            address: entry.address.to_owned(),
        },
    };

    PlanRecord {
        plan_number: entry.plan_number.to_owned(),
        plan_name: entry.plan_name.to_owned(),
        category: classify(entry.plan_number),
        status: entry.status,
        area: entry.area.to_owned(),
        location,
        municipality: entry.municipality.to_owned(),
        planning_authority: entry.planning_authority.to_owned(),
        submission_date: entry.submission_date,
        approval_date: entry.approval_date,
        description: entry.description.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::plan::PlanCategory;

    #[test]
    fn every_record_is_valid() {
        for record in records() {
            assert!(
                record.validate().is_ok(),
                "catalog record {} is invalid",
                record.plan_number
            );
        }
    }

    #[test]
    fn plan_numbers_are_unique() {
        let numbers: HashSet<String> = records().into_iter().map(|r| r.plan_number).collect();
        assert_eq!(numbers.len(), ENTRIES.len());
    }

    #[test]
    fn covers_every_real_category() {
        let categories: HashSet<PlanCategory> = records().iter().map(|r| r.category).collect();
        for category in PlanCategory::ALL {
            if category == PlanCategory::Unclassified {
                assert!(!categories.contains(&category));
            } else {
                assert!(categories.contains(&category), "missing {category}");
            }
        }
    }
}
