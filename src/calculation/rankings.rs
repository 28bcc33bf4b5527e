//! Top-N student ranking by credit-weighted final grade.
//!
//! Unlike [`calculate_gpa`](super::calculate_gpa), the ranking averages final
//! grades on the 10-point scale rather than grade points.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::Enrollment;

use super::lookup::{CourseCatalog, StudentDirectory};
use super::rounding::round_half_up;

/// One entry of the student ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRanking {
    /// Student identifier.
    pub student_id: String,
    /// Student display name, or the placeholder when unknown.
    pub student_name: String,
    /// Credit-weighted mean final grade, 2 decimal places.
    pub gpa: Decimal,
}

/// Ranks students by credit-weighted mean final grade.
///
/// Students whose graded records carry zero credits in total are excluded.
/// Ties are broken by student id ascending. Students missing from the
/// directory are listed under `unknown_name`.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use grade_engine::calculation::{CourseCatalog, StudentDirectory, top_students};
/// use grade_engine::models::{Enrollment, EnrollmentKey, Scores};
/// use rust_decimal::Decimal;
///
/// let key = EnrollmentKey {
///     student_id: "SV00001".to_string(),
///     course_id: "MH00101".to_string(),
///     class_id: "LOP01".to_string(),
///     semester: "HK1-2024".parse().unwrap(),
/// };
/// let eight = Some(Decimal::from(8));
/// let records = vec![Enrollment::new(key, Scores::new(eight, eight, eight), Utc::now())];
/// let catalog = CourseCatalog::from_entries([("MH00101", "Calculus", 3)]);
/// let directory = StudentDirectory::default();
///
/// let ranking = top_students(&records, &catalog, &directory, 5, "Unknown");
/// assert_eq!(ranking[0].student_name, "Unknown");
/// assert_eq!(ranking[0].gpa, Decimal::from(8));
/// ```
pub fn top_students<'a, I>(
    records: I,
    catalog: &CourseCatalog,
    directory: &StudentDirectory,
    limit: usize,
    unknown_name: &str,
) -> Vec<StudentRanking>
where
    I: IntoIterator<Item = &'a Enrollment>,
{
    let mut totals: BTreeMap<&str, (Decimal, u32)> = BTreeMap::new();
    for record in records.into_iter().filter(|r| r.is_graded()) {
        let Some(final_grade) = record.final_grade() else {
            continue;
        };
        let credits = catalog.credits(record.course_id());
        let entry = totals.entry(record.student_id()).or_insert((Decimal::ZERO, 0));
        entry.0 += final_grade * Decimal::from(credits);
        entry.1 += credits;
    }

    let mut ranking: Vec<StudentRanking> = totals
        .into_iter()
        .filter(|(_, (_, credits))| *credits > 0)
        .map(|(student_id, (weighted, credits))| {
            let student_name = match directory.name(student_id) {
                Some(name) => name.to_string(),
                None => {
                    warn!(student_id, "Student missing from directory; using placeholder name");
                    unknown_name.to_string()
                }
            };
            StudentRanking {
                student_id: student_id.to_string(),
                student_name,
                gpa: round_half_up(weighted / Decimal::from(credits), 2),
            }
        })
        .collect();

    ranking.sort_by(|a, b| b.gpa.cmp(&a.gpa).then_with(|| a.student_id.cmp(&b.student_id)));
    ranking.truncate(limit);
    ranking
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

    fn record(student_id: &str, course_id: &str, score: &str) -> Enrollment {
        let key = EnrollmentKey {
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            class_id: "LOP01".to_string(),
            semester: "HK1-2024".parse().unwrap(),
        };
        let s = Some(dec(score));
        Enrollment::new(key, Scores::new(s, s, s), Utc::now())
    }

    fn catalog() -> CourseCatalog {
        CourseCatalog::from_entries([("MH00101", "Calculus", 3), ("MH00202", "Physics", 1)])
    }

    #[test]
    fn test_returns_exactly_limit_sorted_descending() {
        let scores = ["6", "9", "7", "8", "5", "9", "4", "7.5"];
        let records: Vec<Enrollment> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| record(&format!("SV0000{}", i + 1), "MH00101", s))
            .collect();

        let ranking = top_students(&records, &catalog(), &StudentDirectory::default(), 5, "Unknown");
        let ids: Vec<&str> = ranking.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["SV00002", "SV00006", "SV00004", "SV00008", "SV00003"]);
        for pair in ranking.windows(2) {
            assert!(pair[0].gpa >= pair[1].gpa);
        }
    }

    #[test]
    fn test_weights_final_grade_by_credits() {
        // (9 * 3 + 5 * 1) / 4 = 8.0
        let records = vec![record("SV00001", "MH00101", "9"), record("SV00001", "MH00202", "5")];
        let directory = StudentDirectory::from_entries([("SV00001", "Tran Thi B")]);
        let ranking = top_students(&records, &catalog(), &directory, 5, "Unknown");
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].gpa, dec("8"));
        assert_eq!(ranking[0].student_name, "Tran Thi B");
    }

    #[test]
    fn test_student_with_only_uncatalogued_courses_excluded() {
        let records = vec![record("SV00001", "MH00999", "10"), record("SV00002", "MH00101", "6")];
        let ranking = top_students(&records, &catalog(), &StudentDirectory::default(), 5, "Unknown");
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].student_id, "SV00002");
    }

    #[test]
    fn test_missing_student_uses_placeholder() {
        let records = vec![record("SV00001", "MH00101", "7")];
        let ranking = top_students(&records, &catalog(), &StudentDirectory::default(), 5, "N/A");
        assert_eq!(ranking[0].student_name, "N/A");
    }
}
