//! Calculation logic for the grade engine.
//!
//! This module contains the pure computations of the engine: rounding, the
//! grading scale, grade derivation from raw scores (with an audited variant),
//! and the aggregations over stored records: per-student GPA, per-course
//! averages, top students and dashboard statistics.

mod course_average;
mod gpa;
mod grade;
mod grading_scale;
mod lookup;
mod rankings;
mod rounding;
mod statistics;

pub use course_average::{CourseAverage, course_averages};
pub use gpa::{GpaSummary, calculate_gpa, student_gpa};
pub use grade::{
    GradeComputation, SCORE_A_WEIGHT, SCORE_B_WEIGHT, SCORE_C_WEIGHT, compute_grade,
    compute_grade_audited, disciplinary_failure, weighted_final_grade,
};
pub use grading_scale::{FAILING_BAND, GRADING_SCALE, GradeBand, grade_band};
pub use lookup::{CourseCatalog, StudentDirectory};
pub use rankings::{StudentRanking, top_students};
pub use rounding::round_half_up;
pub use statistics::{DashboardTotals, FacultyCount, students_by_faculty};
