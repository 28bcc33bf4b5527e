//! Error types for the grade engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while managing grade records.

use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationErrors;

/// The main error type for the grade engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application. Grade
/// computation itself never fails; absent grades are a valid state.
///
/// # Example
///
/// ```
/// use grade_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A referenced student does not exist.
    #[error("Student not found: {student_id}")]
    StudentNotFound {
        /// The student identifier.
        student_id: String,
    },

    /// A referenced class section does not exist.
    #[error("Class not found: {class_id}")]
    ClassNotFound {
        /// The class identifier.
        class_id: String,
    },

    /// A referenced course does not exist.
    #[error("Course not found: {course_id}")]
    CourseNotFound {
        /// The course identifier.
        course_id: String,
    },

    /// No enrollment record has the given identifier.
    #[error("Enrollment not found: {id}")]
    EnrollmentNotFound {
        /// The record identifier.
        id: Uuid,
    },

    /// An enrollment already exists for the student, course, class and semester.
    #[error(
        "Grade already exists for student '{student_id}' in course '{course_id}', class '{class_id}', semester {semester}"
    )]
    DuplicateEnrollment {
        /// The student identifier.
        student_id: String,
        /// The course identifier.
        course_id: String,
        /// The class identifier.
        class_id: String,
        /// The semester code.
        semester: String,
    },

    /// A catalog entry addressed directly by identifier does not exist.
    #[error("{entity} '{id}' not found")]
    RecordNotFound {
        /// The kind of record (e.g. "Student").
        entity: &'static str,
        /// The requested identifier.
        id: String,
    },

    /// A catalog entry with the same identifier already exists.
    #[error("{entity} '{id}' already exists")]
    DuplicateRecord {
        /// The kind of record (e.g. "Student").
        entity: &'static str,
        /// The conflicting identifier.
        id: String,
    },

    /// The storage backend failed.
    #[error("Repository error: {message}")]
    Repository {
        /// A description of the failure.
        message: String,
    },

    /// The intent classifier returned output that could not be interpreted.
    #[error("Invalid classifier output: {message}")]
    ClassifierOutput {
        /// A description of the problem.
        message: String,
    },
}

impl From<ValidationErrors> for EngineError {
    fn from(errors: ValidationErrors) -> Self {
        EngineError::Validation(errors)
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
