//! Course model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A course in the catalog.
///
/// Credit-hours are the weighting factor for GPA aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course identifier (e.g., "MH00101").
    pub course_id: String,
    /// Human-readable course name.
    pub name: String,
    /// Credit-hours, 1 to 10.
    pub credits: u32,
    /// When the course was added to the catalog.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
    /// Course identifier.
    pub course_id: String,
    /// Course name.
    pub name: String,
    /// Credit-hours.
    pub credits: u32,
}

/// Partial update of a course. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseUpdate {
    /// New course name.
    pub name: Option<String>,
    /// New credit-hours.
    pub credits: Option<u32>,
}

impl CourseUpdate {
    /// Lays the update over `current`, giving the input to validate and store.
    pub fn merge(self, current: &Course) -> NewCourse {
        NewCourse {
            course_id: current.course_id.clone(),
            name: self.name.unwrap_or_else(|| current.name.clone()),
            credits: self.credits.unwrap_or(current.credits),
        }
    }
}

impl Course {
    /// Builds a catalog entry from validated input, trimming the name.
    pub fn from_new(input: NewCourse, created_at: DateTime<Utc>) -> Self {
        Course {
            course_id: input.course_id.trim().to_string(),
            name: input.name.trim().to_string(),
            credits: input.credits,
            created_at,
        }
    }
}
