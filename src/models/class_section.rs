//! Class-section model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A class section that enrollments are attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSection {
    /// Class identifier (e.g., "LOP01").
    pub class_id: String,
    /// Upper-cased class name (e.g., "CNTT01").
    pub name: String,
    /// When the class was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a class section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClassSection {
    /// Class identifier.
    pub class_id: String,
    /// Class name.
    pub name: String,
}

/// Partial update of a class section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassUpdate {
    /// New class name; absent keeps the stored one.
    pub name: Option<String>,
}

impl ClassUpdate {
    /// Lays the update over `current`, giving the input to validate and store.
    pub fn merge(self, current: &ClassSection) -> NewClassSection {
        NewClassSection {
            class_id: current.class_id.clone(),
            name: self.name.unwrap_or_else(|| current.name.clone()),
        }
    }
}

/// A class section with the number of students whose home class it is.
///
/// The count is derived from the student records on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    /// The class itself.
    #[serde(flatten)]
    pub class: ClassSection,
    /// Students whose `class_name` equals the class name.
    pub student_count: usize,
}

impl ClassSection {
    /// Builds a class section from validated input, normalizing the name.
    pub fn from_new(input: NewClassSection, created_at: DateTime<Utc>) -> Self {
        ClassSection {
            class_id: input.class_id.trim().to_string(),
            name: input.name.trim().to_uppercase(),
            created_at,
        }
    }
}
