//! Enrollment records: one grade entry per student, course, class and semester.
//!
//! An [`Enrollment`] keeps its raw scores and derived grade private. The only
//! way to change scores or status after creation is [`Enrollment::update_scores`],
//! which recomputes the derived fields in the same call, so a stored record
//! can never hold a grade that disagrees with its scores.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::compute_grade;

use super::{DerivedGrade, GradeResult, LetterGrade, Semester, VerbalGrade};

/// Status flag of an enrollment record.
///
/// # Example
///
/// ```
/// use grade_engine::models::EnrollmentStatus;
///
/// assert_eq!(EnrollmentStatus::default(), EnrollmentStatus::Normal);
/// assert_eq!(
///     serde_json::to_string(&EnrollmentStatus::FailedDisciplinary).unwrap(),
///     "\"failed_disciplinary\""
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// Graded from its scores.
    #[default]
    Normal,
    /// Force-failed regardless of scores (e.g. academic dishonesty).
    FailedDisciplinary,
}

/// The three raw component scores of an enrollment.
///
/// Each score is a decimal in [0, 10] or absent. Range checks belong to
/// validation; this type only carries the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    /// Component weighted at 60%.
    #[serde(default)]
    pub score_a: Option<Decimal>,
    /// Component weighted at 30%.
    #[serde(default)]
    pub score_b: Option<Decimal>,
    /// Component weighted at 10%.
    #[serde(default)]
    pub score_c: Option<Decimal>,
}

impl Scores {
    /// Creates a score set from three optional components.
    pub fn new(score_a: Option<Decimal>, score_b: Option<Decimal>, score_c: Option<Decimal>) -> Self {
        Scores {
            score_a,
            score_b,
            score_c,
        }
    }

    /// Returns true when all three components are present.
    pub fn is_complete(&self) -> bool {
        self.score_a.is_some() && self.score_b.is_some() && self.score_c.is_some()
    }

    /// Returns the components paired with their field names.
    pub fn named(&self) -> [(&'static str, Option<Decimal>); 3] {
        [
            ("score_a", self.score_a),
            ("score_b", self.score_b),
            ("score_c", self.score_c),
        ]
    }
}

/// A change to an enrollment's raw scores and/or status.
///
/// Absent fields keep their stored value, so an update can only set scores,
/// never clear them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreUpdate {
    /// New value for `score_a`.
    #[serde(default)]
    pub score_a: Option<Decimal>,
    /// New value for `score_b`.
    #[serde(default)]
    pub score_b: Option<Decimal>,
    /// New value for `score_c`.
    #[serde(default)]
    pub score_c: Option<Decimal>,
    /// New status.
    #[serde(default)]
    pub status: Option<EnrollmentStatus>,
}

impl ScoreUpdate {
    /// Returns the scores that result from applying this update to `current`.
    pub fn apply_to(&self, current: Scores) -> Scores {
        Scores {
            score_a: self.score_a.or(current.score_a),
            score_b: self.score_b.or(current.score_b),
            score_c: self.score_c.or(current.score_c),
        }
    }

    /// Returns the score components carried by this update.
    pub fn scores(&self) -> Scores {
        Scores::new(self.score_a, self.score_b, self.score_c)
    }
}

/// Identifying key of an enrollment record.
///
/// At most one record exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrollmentKey {
    /// Student identifier.
    pub student_id: String,
    /// Course identifier.
    pub course_id: String,
    /// Class-section identifier.
    pub class_id: String,
    /// Semester of the enrollment.
    pub semester: Semester,
}

/// Input for creating an enrollment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEnrollment {
    /// Student identifier.
    pub student_id: String,
    /// Course identifier.
    pub course_id: String,
    /// Class-section identifier.
    pub class_id: String,
    /// Semester code, validated before use.
    pub semester: String,
    /// Component weighted at 60%.
    #[serde(default)]
    pub score_a: Option<Decimal>,
    /// Component weighted at 30%.
    #[serde(default)]
    pub score_b: Option<Decimal>,
    /// Component weighted at 10%.
    #[serde(default)]
    pub score_c: Option<Decimal>,
}

impl NewEnrollment {
    /// Returns the raw scores carried by this input.
    pub fn scores(&self) -> Scores {
        Scores::new(self.score_a, self.score_b, self.score_c)
    }
}

/// A persisted enrollment record with its derived grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "EnrollmentRecord")]
pub struct Enrollment {
    id: Uuid,
    key: EnrollmentKey,
    scores: Scores,
    status: EnrollmentStatus,
    grade: Option<GradeResult>,
    created_at: DateTime<Utc>,
}

impl Enrollment {
    /// Creates a new record with status [`EnrollmentStatus::Normal`] and its
    /// derived grade computed from `scores`.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use grade_engine::models::{Enrollment, EnrollmentKey, LetterGrade, Scores};
    /// use rust_decimal::Decimal;
    ///
    /// let key = EnrollmentKey {
    ///     student_id: "SV00001".to_string(),
    ///     course_id: "MH00101".to_string(),
    ///     class_id: "LOP01".to_string(),
    ///     semester: "HK1-2024".parse().unwrap(),
    /// };
    /// let ten = Some(Decimal::TEN);
    /// let enrollment = Enrollment::new(key, Scores::new(ten, ten, ten), Utc::now());
    ///
    /// assert_eq!(enrollment.grade().unwrap().letter_grade, LetterGrade::APlus);
    /// ```
    pub fn new(key: EnrollmentKey, scores: Scores, created_at: DateTime<Utc>) -> Self {
        let status = EnrollmentStatus::Normal;
        Enrollment {
            id: Uuid::new_v4(),
            grade: compute_grade(scores.score_a, scores.score_b, scores.score_c, status),
            key,
            scores,
            status,
            created_at,
        }
    }

    /// Returns the record identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the identifying key.
    pub fn key(&self) -> &EnrollmentKey {
        &self.key
    }

    /// Returns the student identifier.
    pub fn student_id(&self) -> &str {
        &self.key.student_id
    }

    /// Returns the course identifier.
    pub fn course_id(&self) -> &str {
        &self.key.course_id
    }

    /// Returns the class-section identifier.
    pub fn class_id(&self) -> &str {
        &self.key.class_id
    }

    /// Returns the semester.
    pub fn semester(&self) -> Semester {
        self.key.semester
    }

    /// Returns the raw scores.
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Returns the status flag.
    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    /// Returns the derived grade, or `None` while it cannot be computed.
    pub fn grade(&self) -> Option<&GradeResult> {
        self.grade.as_ref()
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the final grade if computed.
    pub fn final_grade(&self) -> Option<Decimal> {
        self.grade.map(|g| g.final_grade)
    }

    /// Returns the grade point if computed.
    pub fn grade_point(&self) -> Option<Decimal> {
        self.grade.map(|g| g.grade_point)
    }

    /// Returns true when the record counts towards aggregations: status is
    /// normal and a grade has been computed.
    pub fn is_graded(&self) -> bool {
        self.status == EnrollmentStatus::Normal && self.grade.is_some()
    }

    /// Applies a score/status change and recomputes the derived grade.
    ///
    /// This is the only mutator of an enrollment's scores and status.
    pub fn update_scores(&mut self, update: &ScoreUpdate) {
        self.scores = update.apply_to(self.scores);
        if let Some(status) = update.status {
            self.status = status;
        }
        self.grade = compute_grade(
            self.scores.score_a,
            self.scores.score_b,
            self.scores.score_c,
            self.status,
        );
    }

    /// Returns the flat wire form of this record.
    pub fn to_record(&self) -> EnrollmentRecord {
        EnrollmentRecord::from(self.clone())
    }
}

/// Flat wire form of an [`Enrollment`], with explicit nulls for a pending grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Student identifier.
    pub student_id: String,
    /// Course identifier.
    pub course_id: String,
    /// Class-section identifier.
    pub class_id: String,
    /// Semester code.
    pub semester: Semester,
    /// Component weighted at 60%.
    pub score_a: Option<Decimal>,
    /// Component weighted at 30%.
    pub score_b: Option<Decimal>,
    /// Component weighted at 10%.
    pub score_c: Option<Decimal>,
    /// Status flag.
    pub status: EnrollmentStatus,
    /// Derived final grade.
    pub final_grade: Option<Decimal>,
    /// Derived letter grade.
    pub letter_grade: Option<LetterGrade>,
    /// Derived verbal grade.
    pub verbal_grade: Option<VerbalGrade>,
    /// Derived grade point.
    pub grade_point: Option<Decimal>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Enrollment> for EnrollmentRecord {
    fn from(enrollment: Enrollment) -> Self {
        let derived = DerivedGrade::from(enrollment.grade);
        EnrollmentRecord {
            id: enrollment.id,
            student_id: enrollment.key.student_id,
            course_id: enrollment.key.course_id,
            class_id: enrollment.key.class_id,
            semester: enrollment.key.semester,
            score_a: enrollment.scores.score_a,
            score_b: enrollment.scores.score_b,
            score_c: enrollment.scores.score_c,
            status: enrollment.status,
            final_grade: derived.final_grade,
            letter_grade: derived.letter_grade,
            verbal_grade: derived.verbal_grade,
            grade_point: derived.grade_point,
            created_at: enrollment.created_at,
        }
    }
}
