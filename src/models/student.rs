//! Student model and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Faculties a student may belong to.
pub const FACULTIES: [&str; 10] = [
    "CNTT",
    "Kinh tế",
    "Cơ khí",
    "Điện tử",
    "Xây dựng",
    "Hóa học",
    "Sinh học",
    "Luật",
    "Ngoại ngữ",
    "Y dược",
];

/// Represents a student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Student identifier (e.g., "SV00001").
    pub student_id: String,
    /// Display name.
    pub name: String,
    /// Upper-cased name of the student's home class (e.g., "CNTT01").
    pub class_name: String,
    /// Faculty, one of [`FACULTIES`].
    pub faculty: String,
    /// Year the student's cohort started.
    pub cohort_year: u16,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Student identifier.
    pub student_id: String,
    /// Display name.
    pub name: String,
    /// Home class name.
    pub class_name: String,
    /// Faculty.
    pub faculty: String,
    /// Cohort start year.
    pub cohort_year: u16,
}

/// Partial update of a student. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New home class name.
    pub class_name: Option<String>,
    /// New faculty.
    pub faculty: Option<String>,
    /// New cohort start year.
    pub cohort_year: Option<u16>,
}

impl StudentUpdate {
    /// Lays the update over `current`, giving the input to validate and store.
    pub fn merge(self, current: &Student) -> NewStudent {
        NewStudent {
            student_id: current.student_id.clone(),
            name: self.name.unwrap_or_else(|| current.name.clone()),
            class_name: self
                .class_name
                .unwrap_or_else(|| current.class_name.clone()),
            faculty: self.faculty.unwrap_or_else(|| current.faculty.clone()),
            cohort_year: self.cohort_year.unwrap_or(current.cohort_year),
        }
    }
}

impl Student {
    /// Builds a student from validated input, trimming and upper-casing
    /// where the record format requires it.
    pub fn from_new(input: NewStudent, created_at: DateTime<Utc>) -> Self {
        Student {
            student_id: input.student_id.trim().to_string(),
            name: input.name.trim().to_string(),
            class_name: input.class_name.trim().to_uppercase(),
            faculty: input.faculty.trim().to_string(),
            cohort_year: input.cohort_year,
            created_at,
        }
    }
}
