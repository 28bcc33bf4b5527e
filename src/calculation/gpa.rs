//! Per-student GPA aggregation.
//!
//! GPA is the credit-weighted mean of grade points over a student's graded
//! records. Records with a disciplinary status or a pending grade do not
//! count.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::Enrollment;
use crate::repository::{CourseRepository, EnrollmentFilter, EnrollmentRepository};

use super::lookup::CourseCatalog;
use super::rounding::round_half_up;

/// A student's GPA and the credit-hours it was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GpaSummary {
    /// Credit-weighted grade point average, 2 decimal places.
    pub gpa: Decimal,
    /// Credit-hours of the qualifying records.
    pub total_credits: u32,
}

/// Computes the GPA over a set of records.
///
/// With no qualifying records, or only records whose course counts zero
/// credits, the result is `{gpa: 0, total_credits: 0}`.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use grade_engine::calculation::{CourseCatalog, calculate_gpa};
/// use grade_engine::models::{Enrollment, EnrollmentKey, Scores};
/// use rust_decimal::Decimal;
///
/// let graded = |course_id: &str, score: i64| {
///     let key = EnrollmentKey {
///         student_id: "SV00001".to_string(),
///         course_id: course_id.to_string(),
///         class_id: "LOP01".to_string(),
///         semester: "HK1-2024".parse().unwrap(),
///     };
///     let s = Some(Decimal::from(score));
///     Enrollment::new(key, Scores::new(s, s, s), Utc::now())
/// };
///
/// let catalog = CourseCatalog::from_entries([("MH00101", "Calculus", 3), ("MH00202", "Physics", 4)]);
/// // 9.0 -> 4.0 points over 3 credits, 6.0 -> 2.3 points over 4 credits
/// let records = vec![graded("MH00101", 9), graded("MH00202", 6)];
///
/// let summary = calculate_gpa(&records, &catalog);
/// assert_eq!(summary.total_credits, 7);
/// assert_eq!(summary.gpa, Decimal::new(303, 2));
/// ```
pub fn calculate_gpa<'a, I>(records: I, catalog: &CourseCatalog) -> GpaSummary
where
    I: IntoIterator<Item = &'a Enrollment>,
{
    let mut total_credits: u32 = 0;
    let mut weighted_sum = Decimal::ZERO;

    for record in records.into_iter().filter(|r| r.is_graded()) {
        let Some(grade_point) = record.grade_point() else {
            continue;
        };
        let credits = catalog.credits(record.course_id());
        total_credits += credits;
        weighted_sum += grade_point * Decimal::from(credits);
    }

    if total_credits == 0 {
        return GpaSummary::default();
    }

    GpaSummary {
        gpa: round_half_up(weighted_sum / Decimal::from(total_credits), 2),
        total_credits,
    }
}

/// Loads a student's records, optionally narrowed to a semester, and computes
/// their GPA against the current course catalog.
///
/// The semester filter is a case-insensitive substring of the semester code,
/// so `"2024"` covers every 2024 term.
pub fn student_gpa(
    enrollments: &dyn EnrollmentRepository,
    courses: &dyn CourseRepository,
    student_id: &str,
    semester: Option<&str>,
) -> EngineResult<GpaSummary> {
    let filter = EnrollmentFilter {
        semester: semester.map(str::to_string),
        ..EnrollmentFilter::for_student(student_id)
    };
    let records = enrollments.list_enrollments(&filter)?;
    let catalog = CourseCatalog::load(courses)?;
    Ok(calculate_gpa(&records, &catalog))
}
