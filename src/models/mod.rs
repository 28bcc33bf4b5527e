//! Core data models for the grade engine.
//!
//! This module contains the catalog entities (students, class sections,
//! courses), enrollment records with their derived grades, and audit types.

mod audit;
mod class_section;
mod course;
mod enrollment;
mod grade;
mod semester;
mod student;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use class_section::{ClassSection, ClassSummary, ClassUpdate, NewClassSection};
pub use course::{Course, CourseUpdate, NewCourse};
pub use enrollment::{
    Enrollment, EnrollmentKey, EnrollmentRecord, EnrollmentStatus, NewEnrollment, ScoreUpdate,
    Scores,
};
pub use grade::{DerivedGrade, GradeResult, LetterGrade, VerbalGrade};
pub use semester::{InvalidSemester, Semester};
pub use student::{FACULTIES, NewStudent, Student, StudentUpdate};
