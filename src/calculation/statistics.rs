//! Dashboard statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Student;

/// Record counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardTotals {
    /// Number of students.
    pub total_students: usize,
    /// Number of class sections.
    pub total_classes: usize,
    /// Number of courses.
    pub total_courses: usize,
    /// Number of enrollment records.
    pub total_enrollments: usize,
}

/// Number of students in one faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyCount {
    /// Faculty name.
    pub faculty: String,
    /// Number of students.
    pub count: usize,
}

/// Counts students per faculty, largest first (ties by faculty name), keeping `limit`.
pub fn students_by_faculty<'a, I>(students: I, limit: usize) -> Vec<FacultyCount>
where
    I: IntoIterator<Item = &'a Student>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for student in students {
        *counts.entry(student.faculty.as_str()).or_default() += 1;
    }

    let mut result: Vec<FacultyCount> = counts
        .into_iter()
        .map(|(faculty, count)| FacultyCount {
            faculty: faculty.to_string(),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.faculty.cmp(&b.faculty)));
    result.truncate(limit);
    result
}
