//! Read-only snapshots of the course and student catalogs used by aggregations.

use std::collections::HashMap;

use tracing::warn;

use crate::error::EngineResult;
use crate::repository::{CourseRepository, StudentRepository};

/// Credit-hours and names of every course, keyed by course id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCatalog {
    courses: HashMap<String, (String, u32)>,
}

impl CourseCatalog {
    /// Snapshots the catalog held by `courses`.
    pub fn load(courses: &dyn CourseRepository) -> EngineResult<Self> {
        let courses = courses
            .list_courses()?
            .into_iter()
            .map(|c| (c.course_id, (c.name, c.credits)))
            .collect();
        Ok(CourseCatalog { courses })
    }

    /// Builds a catalog from `(course_id, name, credits)` entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, u32)>,
        S: Into<String>,
    {
        let courses = entries
            .into_iter()
            .map(|(id, name, credits)| (id.into(), (name.into(), credits)))
            .collect();
        CourseCatalog { courses }
    }

    /// Returns true if the course is in the catalog.
    pub fn contains(&self, course_id: &str) -> bool {
        self.courses.contains_key(course_id)
    }

    /// Credit-hours of a course.
    ///
    /// A course missing from the catalog counts as zero credits, so records
    /// that reference it drop out of credit-weighted sums.
    pub fn credits(&self, course_id: &str) -> u32 {
        match self.courses.get(course_id) {
            Some((_, credits)) => *credits,
            None => {
                warn!(course_id, "Course missing from catalog; counting 0 credits");
                0
            }
        }
    }

    /// Display name of a course.
    pub fn name(&self, course_id: &str) -> Option<&str> {
        self.courses.get(course_id).map(|(name, _)| name.as_str())
    }
}

/// Display names of every student, keyed by student id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDirectory {
    names: HashMap<String, String>,
}

impl StudentDirectory {
    /// Snapshots the names held by `students`.
    pub fn load(students: &dyn StudentRepository) -> EngineResult<Self> {
        let names = students
            .list_students()?
            .into_iter()
            .map(|s| (s.student_id, s.name))
            .collect();
        Ok(StudentDirectory { names })
    }

    /// Builds a directory from `(student_id, name)` entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let names = entries
            .into_iter()
            .map(|(id, name)| (id.into(), name.into()))
            .collect();
        StudentDirectory { names }
    }

    /// Display name of a student.
    pub fn name(&self, student_id: &str) -> Option<&str> {
        self.names.get(student_id).map(String::as_str)
    }
}
