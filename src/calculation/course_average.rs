//! Per-course average of final grades.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Enrollment;

use super::lookup::CourseCatalog;
use super::rounding::round_half_up;

/// The mean final grade of one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAverage {
    /// Course identifier.
    pub course_id: String,
    /// Course display name.
    pub course_name: String,
    /// Arithmetic mean of final grades, 2 decimal places.
    pub average_grade: Decimal,
}

/// Ranks courses by the arithmetic mean of their records' final grades.
///
/// Only graded records with a normal status count. Each record weighs the
/// same regardless of credits. Courses missing from the catalog are left out.
/// The result is sorted by average descending, then course id ascending, and
/// truncated to `limit` entries.
pub fn course_averages<'a, I>(records: I, catalog: &CourseCatalog, limit: usize) -> Vec<CourseAverage>
where
    I: IntoIterator<Item = &'a Enrollment>,
{
    let mut totals: BTreeMap<&str, (Decimal, u32)> = BTreeMap::new();
    for record in records.into_iter().filter(|r| r.is_graded()) {
        let Some(final_grade) = record.final_grade() else {
            continue;
        };
        let entry = totals.entry(record.course_id()).or_insert((Decimal::ZERO, 0));
        entry.0 += final_grade;
        entry.1 += 1;
    }

    let mut averages: Vec<CourseAverage> = totals
        .into_iter()
        .filter_map(|(course_id, (sum, count))| {
            let course_name = catalog.name(course_id)?;
            Some(CourseAverage {
                course_id: course_id.to_string(),
                course_name: course_name.to_string(),
                average_grade: round_half_up(sum / Decimal::from(count), 2),
            })
        })
        .collect();

    averages.sort_by(|a, b| {
        b.average_grade
            .cmp(&a.average_grade)
            .then_with(|| a.course_id.cmp(&b.course_id))
    });
    averages.truncate(limit);
    averages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnrollmentKey, Scores};
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(student_id: &str, course_id: &str, score: Option<&str>) -> Enrollment {
        let key = EnrollmentKey {
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            class_id: "LOP01".to_string(),
            semester: "HK1-2024".parse().unwrap(),
        };
        let s = score.map(dec);
        Enrollment::new(key, Scores::new(s, s, s), Utc::now())
    }

    #[test]
    fn test_simple_mean_ignores_credits() {
        let catalog = CourseCatalog::from_entries([("MH00101", "Calculus", 3), ("MH00202", "Physics", 1)]);
        let records = vec![
            record("SV00001", "MH00101", Some("8")),
            record("SV00002", "MH00101", Some("7")),
            record("SV00003", "MH00101", None),
            record("SV00001", "MH00202", Some("9")),
        ];

        let averages = course_averages(&records, &catalog, 5);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].course_id, "MH00202");
        assert_eq!(averages[0].average_grade, dec("9"));
        assert_eq!(averages[1].course_name, "Calculus");
        assert_eq!(averages[1].average_grade, dec("7.5"));
    }

    #[test]
    fn test_average_rounds_to_two_places() {
        let catalog = CourseCatalog::from_entries([("MH00101", "Calculus", 3)]);
        let records = vec![
            record("SV00001", "MH00101", Some("8")),
            record("SV00002", "MH00101", Some("8")),
            record("SV00003", "MH00101", Some("7")),
        ];
        let averages = course_averages(&records, &catalog, 5);
        assert_eq!(averages[0].average_grade, dec("7.67"));
    }

    #[test]
    fn test_uncatalogued_course_dropped_and_limit_applied() {
        let catalog = CourseCatalog::from_entries([
            ("MH00101", "A", 3),
            ("MH00102", "B", 3),
            ("MH00103", "C", 3),
        ]);
        let records = vec![
            record("SV00001", "MH00101", Some("6")),
            record("SV00001", "MH00102", Some("6")),
            record("SV00001", "MH00103", Some("7")),
            record("SV00001", "MH00999", Some("10")),
        ];
        let averages = course_averages(&records, &catalog, 2);
        let ids: Vec<&str> = averages.iter().map(|a| a.course_id.as_str()).collect();
        assert_eq!(ids, vec!["MH00103", "MH00101"]);
    }

    #[test]
    fn test_no_graded_records_gives_empty_ranking() {
        let catalog = CourseCatalog::from_entries([("MH00101", "Calculus", 3)]);
        let records = vec![record("SV00001", "MH00101", None)];
        assert!(course_averages(&records, &catalog, 5).is_empty());
    }
}
