//! The gradebook service.
//!
//! [`Gradebook`] is the single entry point for changing records: it runs
//! validation, checks that referenced entities exist, computes derived grades
//! and persists through the repository traits. It also exposes the
//! aggregation read paths used by the dashboard and the assistant.

mod import;
mod pagination;
mod student_query;

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{
    self, CourseAverage, CourseCatalog, DashboardTotals, FacultyCount, GpaSummary,
    GradeComputation, StudentDirectory, StudentRanking, compute_grade_audited,
};
use crate::config::{ConfigLoader, EngineSettings};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ClassSection, ClassSummary, ClassUpdate, Course, CourseUpdate, Enrollment, EnrollmentKey,
    EnrollmentStatus, NewClassSection, NewCourse, NewEnrollment, NewStudent, ScoreUpdate, Scores,
    Semester, Student, StudentUpdate,
};
use crate::repository::{
    ClassRepository, CourseRepository, EnrollmentFilter, EnrollmentRepository, InMemoryStore,
    StudentRepository,
};
use crate::validation::{
    ValidationErrors, validate_class, validate_course, validate_enrollment,
    validate_score_update, validate_student,
};

pub use import::{ImportReport, ImportRow, RowError};
pub use pagination::{Page, PageRequest};
pub use student_query::{StudentFilter, StudentSort, StudentSortField};

/// Rejects an empty id list given to a bulk delete.
fn require_ids(ids: &[String]) -> EngineResult<()> {
    if ids.is_empty() {
        return Err(ValidationErrors::single("ids", "at least one id is required").into());
    }
    Ok(())
}

/// Turns the number of removed records of a bulk delete into its result:
/// removing nothing is a not-found error.
fn bulk_deleted(entity: &'static str, ids: &[String], deleted: usize) -> EngineResult<usize> {
    if deleted == 0 {
        return Err(EngineError::RecordNotFound {
            entity,
            id: ids.join(","),
        });
    }
    info!(entity, requested = ids.len(), deleted, "Bulk delete");
    Ok(deleted)
}

/// The repositories a [`Gradebook`] works against.
#[derive(Clone)]
pub struct Repositories {
    /// Student storage.
    pub students: Arc<dyn StudentRepository>,
    /// Class-section storage.
    pub classes: Arc<dyn ClassRepository>,
    /// Course storage.
    pub courses: Arc<dyn CourseRepository>,
    /// Enrollment storage.
    pub enrollments: Arc<dyn EnrollmentRepository>,
}

impl Repositories {
    /// All four repositories backed by one fresh [`InMemoryStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            students: store.clone(),
            classes: store.clone(),
            courses: store.clone(),
            enrollments: store,
        }
    }
}

/// Dashboard statistics: record totals and the largest faculties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Record counts.
    #[serde(flatten)]
    pub totals: DashboardTotals,
    /// Largest faculties by student count.
    pub students_by_faculty: Vec<FacultyCount>,
}

/// Orchestrates validation, reference checks, grade computation and
/// persistence for every record-changing operation.
///
/// # Example
///
/// ```
/// use grade_engine::config::EngineSettings;
/// use grade_engine::gradebook::{Gradebook, Repositories};
/// use grade_engine::models::{NewClassSection, NewCourse, NewEnrollment, NewStudent, LetterGrade};
/// use rust_decimal::Decimal;
///
/// let gradebook = Gradebook::new(Repositories::in_memory(), EngineSettings::with_defaults("demo"));
/// gradebook.create_course(NewCourse {
///     course_id: "MH00101".to_string(),
///     name: "Calculus".to_string(),
///     credits: 3,
/// })?;
/// gradebook.create_class(NewClassSection { class_id: "LOP01".to_string(), name: "CNTT K22A".to_string() })?;
/// gradebook.create_student(NewStudent {
///     student_id: "SV00001".to_string(),
///     name: "Nguyen Van An".to_string(),
///     class_name: "CNTT K22A".to_string(),
///     faculty: "CNTT".to_string(),
///     cohort_year: 2022,
/// })?;
///
/// let nine = Some(Decimal::from(9));
/// let enrollment = gradebook.create_enrollment(NewEnrollment {
///     student_id: "SV00001".to_string(),
///     course_id: "MH00101".to_string(),
///     class_id: "LOP01".to_string(),
///     semester: "HK1-2024".to_string(),
///     score_a: nine,
///     score_b: nine,
///     score_c: nine,
/// })?;
/// assert_eq!(enrollment.grade().unwrap().letter_grade, LetterGrade::APlus);
///
/// let gpa = gradebook.student_gpa("SV00001", None)?;
/// assert_eq!(gpa.total_credits, 3);
/// # Ok::<(), grade_engine::error::EngineError>(())
/// ```
#[derive(Clone)]
pub struct Gradebook {
    repos: Repositories,
    settings: EngineSettings,
}

impl fmt::Debug for Gradebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gradebook")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Gradebook {
    /// Creates a gradebook over the given repositories.
    pub fn new(repos: Repositories, settings: EngineSettings) -> Self {
        Self { repos, settings }
    }

    /// Creates an in-memory gradebook and seeds it with the configured catalog.
    ///
    /// Seed entries go through the same validation as API input; an invalid
    /// or duplicated seed entry fails startup.
    pub fn from_config(config: &ConfigLoader) -> EngineResult<Self> {
        let gradebook = Self::new(Repositories::in_memory(), config.settings().clone());
        let seed = config.catalog();

        for course in &seed.courses {
            gradebook.create_course(course.clone())?;
        }
        for class in &seed.classes {
            gradebook.create_class(class.clone())?;
        }
        for student in &seed.students {
            gradebook.create_student(student.clone())?;
        }

        info!(
            courses = seed.courses.len(),
            classes = seed.classes.len(),
            students = seed.students.len(),
            "Seeded catalog from configuration"
        );
        Ok(gradebook)
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Validates and stores a new student.
    pub fn create_student(&self, input: NewStudent) -> EngineResult<Student> {
        validate_student(&input)?;
        let student = self
            .repos
            .students
            .insert_student(Student::from_new(input, Utc::now()))?;
        debug!(student_id = %student.student_id, "Created student");
        Ok(student)
    }

    /// Looks up a student.
    pub fn get_student(&self, student_id: &str) -> EngineResult<Student> {
        self.repos
            .students
            .get_student(student_id)?
            .ok_or_else(|| EngineError::RecordNotFound {
                entity: "Student",
                id: student_id.to_string(),
            })
    }

    /// Finds a student by display name, ignoring case and surrounding spaces.
    pub fn find_student_by_name(&self, name: &str) -> EngineResult<Option<Student>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .repos
            .students
            .list_students()?
            .into_iter()
            .find(|s| s.name.to_lowercase() == wanted))
    }

    /// Lists every student ordered by id.
    pub fn list_students(&self) -> EngineResult<Vec<Student>> {
        self.repos.students.list_students()
    }

    /// Returns one page of the students matching `filter`, in `sort` order.
    pub fn search_students(
        &self,
        filter: &StudentFilter,
        sort: StudentSort,
        request: PageRequest,
    ) -> EngineResult<Page<Student>> {
        let (page, limit) = request.resolve(&self.settings.pagination);
        let mut matching: Vec<Student> = self
            .repos
            .students
            .list_students()?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect();
        matching.sort_by(|a, b| sort.compare(a, b));
        Ok(Page::slice(matching, page, limit))
    }

    /// Applies a partial update to a student, validated like a new one.
    pub fn update_student(&self, student_id: &str, update: StudentUpdate) -> EngineResult<Student> {
        let current = self.get_student(student_id)?;
        let merged = update.merge(&current);
        validate_student(&merged)?;
        let student = self
            .repos
            .students
            .replace_student(Student::from_new(merged, current.created_at))?;
        info!(student_id, class_name = %student.class_name, "Updated student");
        Ok(student)
    }

    /// Deletes a student. Enrollment records are kept.
    pub fn delete_student(&self, student_id: &str) -> EngineResult<()> {
        if !self.repos.students.delete_student(student_id)? {
            return Err(EngineError::RecordNotFound {
                entity: "Student",
                id: student_id.to_string(),
            });
        }
        info!(student_id, "Deleted student");
        Ok(())
    }

    /// Deletes several students at once. Unknown ids are skipped; the call
    /// fails only when none of them exists. Enrollment records are kept.
    pub fn delete_students(&self, student_ids: &[String]) -> EngineResult<usize> {
        require_ids(student_ids)?;
        let deleted = self.repos.students.delete_students(student_ids)?;
        bulk_deleted("Student", student_ids, deleted)
    }

    /// Validates and stores a new class section.
    pub fn create_class(&self, input: NewClassSection) -> EngineResult<ClassSection> {
        validate_class(&input)?;
        let class = self
            .repos
            .classes
            .insert_class(ClassSection::from_new(input, Utc::now()))?;
        debug!(class_id = %class.class_id, "Created class");
        Ok(class)
    }

    /// Looks up a class section.
    pub fn get_class(&self, class_id: &str) -> EngineResult<ClassSection> {
        self.repos
            .classes
            .get_class(class_id)?
            .ok_or_else(|| EngineError::RecordNotFound {
                entity: "Class",
                id: class_id.to_string(),
            })
    }

    /// Lists every class section ordered by id.
    pub fn list_classes(&self) -> EngineResult<Vec<ClassSection>> {
        self.repos.classes.list_classes()
    }

    fn summarize(class: ClassSection, students: &[Student]) -> ClassSummary {
        let student_count = students
            .iter()
            .filter(|s| s.class_name == class.name)
            .count();
        ClassSummary {
            class,
            student_count,
        }
    }

    /// Looks up a class section with its student count.
    pub fn class_summary(&self, class_id: &str) -> EngineResult<ClassSummary> {
        let class = self.get_class(class_id)?;
        let students = self.repos.students.list_students()?;
        Ok(Self::summarize(class, &students))
    }

    /// Lists every class section with its student count, ordered by id.
    pub fn class_summaries(&self) -> EngineResult<Vec<ClassSummary>> {
        let students = self.repos.students.list_students()?;
        Ok(self
            .repos
            .classes
            .list_classes()?
            .into_iter()
            .map(|class| Self::summarize(class, &students))
            .collect())
    }

    /// Applies a partial update to a class section. Renaming a class moves
    /// the students whose home class carried the old name.
    pub fn update_class(&self, class_id: &str, update: ClassUpdate) -> EngineResult<ClassSection> {
        let current = self.get_class(class_id)?;
        let merged = update.merge(&current);
        validate_class(&merged)?;
        let class = self
            .repos
            .classes
            .replace_class(ClassSection::from_new(merged, current.created_at))?;

        if class.name != current.name {
            let mut moved = 0;
            for mut student in self.repos.students.list_students()? {
                if student.class_name == current.name {
                    student.class_name = class.name.clone();
                    self.repos.students.replace_student(student)?;
                    moved += 1;
                }
            }
            info!(class_id, from = %current.name, to = %class.name, moved, "Renamed class");
        }
        Ok(class)
    }

    /// Deletes a class section. Enrollment records are kept.
    pub fn delete_class(&self, class_id: &str) -> EngineResult<()> {
        if !self.repos.classes.delete_class(class_id)? {
            return Err(EngineError::RecordNotFound {
                entity: "Class",
                id: class_id.to_string(),
            });
        }
        info!(class_id, "Deleted class");
        Ok(())
    }

    /// Deletes several class sections at once. Unknown ids are skipped; the
    /// call fails only when none of them exists. Enrollment records are kept.
    pub fn delete_classes(&self, class_ids: &[String]) -> EngineResult<usize> {
        require_ids(class_ids)?;
        let deleted = self.repos.classes.delete_classes(class_ids)?;
        bulk_deleted("Class", class_ids, deleted)
    }

    /// Validates and stores a new course.
    pub fn create_course(&self, input: NewCourse) -> EngineResult<Course> {
        validate_course(&input)?;
        let course = self
            .repos
            .courses
            .insert_course(Course::from_new(input, Utc::now()))?;
        debug!(course_id = %course.course_id, credits = course.credits, "Created course");
        Ok(course)
    }

    /// Looks up a course.
    pub fn get_course(&self, course_id: &str) -> EngineResult<Course> {
        self.repos
            .courses
            .get_course(course_id)?
            .ok_or_else(|| EngineError::RecordNotFound {
                entity: "Course",
                id: course_id.to_string(),
            })
    }

    /// Lists every course ordered by id.
    pub fn list_courses(&self) -> EngineResult<Vec<Course>> {
        self.repos.courses.list_courses()
    }

    /// Applies a partial update to a course. New credit-hours take effect in
    /// every later aggregation.
    pub fn update_course(&self, course_id: &str, update: CourseUpdate) -> EngineResult<Course> {
        let current = self.get_course(course_id)?;
        let merged = update.merge(&current);
        validate_course(&merged)?;
        let course = self
            .repos
            .courses
            .replace_course(Course::from_new(merged, current.created_at))?;
        info!(course_id, credits = course.credits, "Updated course");
        Ok(course)
    }

    /// Deletes a course. Enrollment records are kept; they stop counting
    /// towards credit-weighted aggregates.
    pub fn delete_course(&self, course_id: &str) -> EngineResult<()> {
        if !self.repos.courses.delete_course(course_id)? {
            return Err(EngineError::RecordNotFound {
                entity: "Course",
                id: course_id.to_string(),
            });
        }
        info!(course_id, "Deleted course");
        Ok(())
    }

    /// Deletes several courses at once. Unknown ids are skipped; the call
    /// fails only when none of them exists.
    pub fn delete_courses(&self, course_ids: &[String]) -> EngineResult<usize> {
        require_ids(course_ids)?;
        let deleted = self.repos.courses.delete_courses(course_ids)?;
        bulk_deleted("Course", course_ids, deleted)
    }

    /// Snapshots the course catalog.
    pub fn course_catalog(&self) -> EngineResult<CourseCatalog> {
        CourseCatalog::load(self.repos.courses.as_ref())
    }

    /// Computes a grade without storing anything, recording how it was reached.
    pub fn explain_grade(
        &self,
        scores: Scores,
        status: EnrollmentStatus,
    ) -> EngineResult<GradeComputation> {
        validate_score_update(&ScoreUpdate {
            score_a: scores.score_a,
            score_b: scores.score_b,
            score_c: scores.score_c,
            status: None,
        })?;
        Ok(compute_grade_audited(
            scores.score_a,
            scores.score_b,
            scores.score_c,
            status,
            1,
        ))
    }

    /// Builds the key of a validated enrollment input and checks that the
    /// student, class and course it references exist.
    fn resolve_key(&self, input: &NewEnrollment) -> EngineResult<EnrollmentKey> {
        let semester = input
            .semester
            .trim()
            .parse::<Semester>()
            .map_err(|e| ValidationErrors::single("semester", e.to_string()))?;
        let key = EnrollmentKey {
            student_id: input.student_id.trim().to_string(),
            course_id: input.course_id.trim().to_string(),
            class_id: input.class_id.trim().to_string(),
            semester,
        };

        if self.repos.students.get_student(&key.student_id)?.is_none() {
            return Err(EngineError::StudentNotFound {
                student_id: key.student_id,
            });
        }
        if self.repos.classes.get_class(&key.class_id)?.is_none() {
            return Err(EngineError::ClassNotFound {
                class_id: key.class_id,
            });
        }
        if self.repos.courses.get_course(&key.course_id)?.is_none() {
            return Err(EngineError::CourseNotFound {
                course_id: key.course_id,
            });
        }
        Ok(key)
    }

    /// Validates and stores a new enrollment with its derived grade.
    pub fn create_enrollment(&self, input: NewEnrollment) -> EngineResult<Enrollment> {
        validate_enrollment(&input)?;
        let key = self.resolve_key(&input)?;
        let enrollment = Enrollment::new(key, input.scores(), Utc::now());
        let stored = self.repos.enrollments.insert_enrollment(enrollment)?;

        info!(
            enrollment_id = %stored.id(),
            student_id = stored.student_id(),
            course_id = stored.course_id(),
            semester = %stored.semester(),
            graded = stored.grade().is_some(),
            "Created enrollment"
        );
        Ok(stored)
    }

    /// Looks up an enrollment.
    pub fn get_enrollment(&self, id: Uuid) -> EngineResult<Enrollment> {
        self.repos
            .enrollments
            .get_enrollment(id)?
            .ok_or(EngineError::EnrollmentNotFound { id })
    }

    /// Applies a score/status change and recomputes the grade.
    ///
    /// Absent fields keep their stored value.
    pub fn update_scores(&self, id: Uuid, update: ScoreUpdate) -> EngineResult<Enrollment> {
        validate_score_update(&update)?;
        let updated = self.repos.enrollments.update_scores(id, &update)?;
        info!(
            enrollment_id = %id,
            status = ?updated.status(),
            final_grade = ?updated.final_grade(),
            "Updated enrollment scores"
        );
        Ok(updated)
    }

    /// Applies several updates. Every update is validated first; one invalid
    /// entry or unknown id rejects the whole batch.
    pub fn update_scores_batch(
        &self,
        updates: &[(Uuid, ScoreUpdate)],
    ) -> EngineResult<Vec<Enrollment>> {
        let mut errors = ValidationErrors::new();
        for (index, (_, update)) in updates.iter().enumerate() {
            if let Err(found) = validate_score_update(update) {
                for error in found.errors() {
                    errors.push(format!("updates[{}].{}", index, error.field), error.message.clone());
                }
            }
        }
        errors.into_result()?;

        let updated = self.repos.enrollments.update_scores_batch(updates)?;
        info!(count = updated.len(), "Applied batch score update");
        Ok(updated)
    }

    /// Deletes an enrollment.
    pub fn delete_enrollment(&self, id: Uuid) -> EngineResult<()> {
        if !self.repos.enrollments.delete_enrollment(id)? {
            return Err(EngineError::EnrollmentNotFound { id });
        }
        info!(enrollment_id = %id, "Deleted enrollment");
        Ok(())
    }

    /// Returns every enrollment matching `filter`, unpaged.
    pub fn enrollments(&self, filter: &EnrollmentFilter) -> EngineResult<Vec<Enrollment>> {
        self.repos.enrollments.list_enrollments(filter)
    }

    /// Returns one page of the enrollments matching `filter`.
    pub fn list_enrollments(
        &self,
        filter: &EnrollmentFilter,
        request: PageRequest,
    ) -> EngineResult<Page<Enrollment>> {
        let (page, limit) = request.resolve(&self.settings.pagination);
        let all = self.repos.enrollments.list_enrollments(filter)?;
        Ok(Page::slice(all, page, limit))
    }

    /// Credit-weighted GPA of a student, optionally narrowed to a semester.
    ///
    /// Computed from the stored records alone: an unknown or deleted student
    /// is not an error.
    pub fn student_gpa(&self, student_id: &str, semester: Option<&str>) -> EngineResult<GpaSummary> {
        calculation::student_gpa(
            self.repos.enrollments.as_ref(),
            self.repos.courses.as_ref(),
            student_id,
            semester,
        )
    }

    /// Courses ranked by mean final grade.
    pub fn course_averages(&self) -> EngineResult<Vec<CourseAverage>> {
        let records = self.repos.enrollments.list_enrollments(&EnrollmentFilter::default())?;
        let catalog = self.course_catalog()?;
        Ok(calculation::course_averages(
            &records,
            &catalog,
            self.settings.rankings.limit,
        ))
    }

    /// Students ranked by credit-weighted mean final grade.
    pub fn top_students(&self) -> EngineResult<Vec<StudentRanking>> {
        let records = self.repos.enrollments.list_enrollments(&EnrollmentFilter::default())?;
        let catalog = self.course_catalog()?;
        let directory = StudentDirectory::load(self.repos.students.as_ref())?;
        Ok(calculation::top_students(
            &records,
            &catalog,
            &directory,
            self.settings.rankings.limit,
            &self.settings.rankings.unknown_student_name,
        ))
    }

    /// Largest faculties by student count.
    pub fn students_by_faculty(&self) -> EngineResult<Vec<FacultyCount>> {
        let students = self.repos.students.list_students()?;
        Ok(calculation::students_by_faculty(
            &students,
            self.settings.rankings.limit,
        ))
    }

    /// Record totals and the largest faculties.
    pub fn dashboard(&self) -> EngineResult<Dashboard> {
        let students = self.repos.students.list_students()?;
        let totals = DashboardTotals {
            total_students: students.len(),
            total_classes: self.repos.classes.list_classes()?.len(),
            total_courses: self.repos.courses.list_courses()?.len(),
            total_enrollments: self.repos.enrollments.count_enrollments()?,
        };
        Ok(Dashboard {
            totals,
            students_by_faculty: calculation::students_by_faculty(
                &students,
                self.settings.rankings.limit,
            ),
        })
    }
}
