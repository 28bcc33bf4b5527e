//! Per-entity validation.
//!
//! Each `validate_*` function checks one input type and returns every problem
//! it finds as a [`ValidationErrors`] list instead of stopping at the first.
//! Nothing here touches persistence, so reference checks (does the student
//! exist?) live in the gradebook service.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    FACULTIES, NewClassSection, NewCourse, NewEnrollment, NewStudent, ScoreUpdate, Scores,
    Semester,
};

/// Lowest accepted raw score.
pub const MIN_SCORE: Decimal = Decimal::ZERO;

/// Highest accepted raw score.
pub const MAX_SCORE: Decimal = Decimal::TEN;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

/// The list of failures found while validating one input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Creates an empty error list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list holding one error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Records an error for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns true when no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the recorded errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns true if any error concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Converts the list into a `Result`, `Ok` when empty.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Checks a student/class/course identifier: 5 to 10 characters of `A-Z0-9`.
fn check_identifier(errors: &mut ValidationErrors, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, "is required");
    } else if !(5..=10).contains(&value.len())
        || !value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        errors.push(
            field,
            format!("'{}' must be 5-10 uppercase letters or digits", value),
        );
    }
}

fn check_length(errors: &mut ValidationErrors, field: &str, value: &str, min: usize, max: usize) {
    let len = value.trim().chars().count();
    if len < min || len > max {
        errors.push(
            field,
            format!("must be between {} and {} characters", min, max),
        );
    }
}

fn check_scores(errors: &mut ValidationErrors, scores: &Scores) {
    for (field, score) in scores.named() {
        match score {
            Some(value) if value < MIN_SCORE || value > MAX_SCORE => {
                errors.push(field, format!("{} is outside 0-10", value));
            }
            _ => {}
        }
    }
}

/// Validates a new student.
///
/// # Example
///
/// ```
/// use grade_engine::models::NewStudent;
/// use grade_engine::validation::validate_student;
///
/// let student = NewStudent {
///     student_id: "sv1".to_string(),
///     name: "An".to_string(),
///     class_name: "CNTT01".to_string(),
///     faculty: "CNTT".to_string(),
///     cohort_year: 2022,
/// };
/// let errors = validate_student(&student).unwrap_err();
/// assert!(errors.has_field("student_id"));
/// assert!(errors.has_field("name"));
/// ```
pub fn validate_student(input: &NewStudent) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_identifier(&mut errors, "student_id", &input.student_id);
    check_length(&mut errors, "name", &input.name, 3, 50);
    check_length(&mut errors, "class_name", &input.class_name, 3, 50);
    if !FACULTIES.contains(&input.faculty.trim()) {
        errors.push("faculty", format!("unknown faculty '{}'", input.faculty.trim()));
    }
    if !(2000..=2100).contains(&input.cohort_year) {
        errors.push("cohort_year", "must be between 2000 and 2100");
    }
    errors.into_result()
}

/// Validates a new class section.
pub fn validate_class(input: &NewClassSection) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_identifier(&mut errors, "class_id", &input.class_id);
    check_length(&mut errors, "name", &input.name, 3, 50);
    errors.into_result()
}

/// Validates a new course.
pub fn validate_course(input: &NewCourse) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_identifier(&mut errors, "course_id", &input.course_id);
    check_length(&mut errors, "name", &input.name, 3, 100);
    if !(1..=10).contains(&input.credits) {
        errors.push("credits", "must be between 1 and 10");
    }
    errors.into_result()
}

/// Validates a new enrollment: identifier formats, semester code and score range.
pub fn validate_enrollment(input: &NewEnrollment) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_identifier(&mut errors, "student_id", &input.student_id);
    check_identifier(&mut errors, "course_id", &input.course_id);
    check_identifier(&mut errors, "class_id", &input.class_id);
    if let Err(err) = input.semester.trim().parse::<Semester>() {
        errors.push("semester", err.to_string());
    }
    check_scores(&mut errors, &input.scores());
    errors.into_result()
}

/// Validates a score update: every supplied score must be within range.
pub fn validate_score_update(update: &ScoreUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_scores(&mut errors, &update.scores());
    errors.into_result()
}
