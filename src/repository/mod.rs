//! Repository interfaces for the gradebook's persisted entities.
//!
//! Each entity has its own trait so aggregations and services can be handed
//! exactly the collaborators they need. All traits are object safe and
//! `Send + Sync`, so they can be shared as `Arc<dyn ...>` across request
//! handlers. [`InMemoryStore`] implements all four.

mod memory;

use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{ClassSection, Course, Enrollment, EnrollmentKey, ScoreUpdate, Student};

pub use memory::InMemoryStore;

/// Storage for student records.
pub trait StudentRepository: Send + Sync {
    /// Inserts a student; fails with `DuplicateRecord` if the id is taken.
    fn insert_student(&self, student: Student) -> EngineResult<Student>;
    /// Looks up a student by id.
    fn get_student(&self, student_id: &str) -> EngineResult<Option<Student>>;
    /// Returns every student, ordered by id.
    fn list_students(&self) -> EngineResult<Vec<Student>>;
    /// Replaces a stored student; fails with `RecordNotFound` if it is gone.
    fn replace_student(&self, student: Student) -> EngineResult<Student>;
    /// Deletes a student; returns whether one was removed.
    fn delete_student(&self, student_id: &str) -> EngineResult<bool>;
    /// Deletes every listed student in one write; returns how many existed.
    fn delete_students(&self, student_ids: &[String]) -> EngineResult<usize>;
}

/// Storage for class sections.
pub trait ClassRepository: Send + Sync {
    /// Inserts a class; fails with `DuplicateRecord` if the id is taken.
    fn insert_class(&self, class: ClassSection) -> EngineResult<ClassSection>;
    /// Looks up a class by id.
    fn get_class(&self, class_id: &str) -> EngineResult<Option<ClassSection>>;
    /// Returns every class, ordered by id.
    fn list_classes(&self) -> EngineResult<Vec<ClassSection>>;
    /// Replaces a stored class; fails with `RecordNotFound` if it is gone.
    fn replace_class(&self, class: ClassSection) -> EngineResult<ClassSection>;
    /// Deletes a class; returns whether one was removed.
    fn delete_class(&self, class_id: &str) -> EngineResult<bool>;
    /// Deletes every listed class in one write; returns how many existed.
    fn delete_classes(&self, class_ids: &[String]) -> EngineResult<usize>;
}

/// Storage for the course catalog.
pub trait CourseRepository: Send + Sync {
    /// Inserts a course; fails with `DuplicateRecord` if the id is taken.
    fn insert_course(&self, course: Course) -> EngineResult<Course>;
    /// Looks up a course by id.
    fn get_course(&self, course_id: &str) -> EngineResult<Option<Course>>;
    /// Returns every course, ordered by id.
    fn list_courses(&self) -> EngineResult<Vec<Course>>;
    /// Replaces a stored course; fails with `RecordNotFound` if it is gone.
    fn replace_course(&self, course: Course) -> EngineResult<Course>;
    /// Deletes a course; returns whether one was removed.
    fn delete_course(&self, course_id: &str) -> EngineResult<bool>;
    /// Deletes every listed course in one write; returns how many existed.
    fn delete_courses(&self, course_ids: &[String]) -> EngineResult<usize>;
}

/// Filter for listing enrollments. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentFilter {
    /// Exact student id.
    pub student_id: Option<String>,
    /// Exact class id.
    pub class_id: Option<String>,
    /// Exact course id.
    pub course_id: Option<String>,
    /// Case-insensitive substring of the semester code.
    pub semester: Option<String>,
}

impl EnrollmentFilter {
    /// A filter selecting one student's records.
    pub fn for_student(student_id: impl Into<String>) -> Self {
        EnrollmentFilter {
            student_id: Some(student_id.into()),
            ..Default::default()
        }
    }

    /// Returns true if `enrollment` passes the filter.
    pub fn matches(&self, enrollment: &Enrollment) -> bool {
        self.student_id
            .as_deref()
            .is_none_or(|id| enrollment.student_id() == id)
            && self
                .class_id
                .as_deref()
                .is_none_or(|id| enrollment.class_id() == id)
            && self
                .course_id
                .as_deref()
                .is_none_or(|id| enrollment.course_id() == id)
            && self
                .semester
                .as_deref()
                .is_none_or(|s| enrollment.semester().matches(s))
    }
}

/// Storage for enrollment records.
///
/// There is no way to overwrite a stored record's scores other
/// than [`EnrollmentRepository::update_scores`], which must apply the update
/// and recompute the derived grade within a single write.
pub trait EnrollmentRepository: Send + Sync {
    /// Inserts a record; fails with `DuplicateEnrollment` if its key is taken.
    fn insert_enrollment(&self, enrollment: Enrollment) -> EngineResult<Enrollment>;
    /// Inserts a batch in one write. Fails without inserting anything if any
    /// key is already taken or repeated within the batch.
    fn insert_enrollments(&self, batch: Vec<Enrollment>) -> EngineResult<usize>;
    /// Looks up a record by id.
    fn get_enrollment(&self, id: Uuid) -> EngineResult<Option<Enrollment>>;
    /// Looks up a record by its identifying key.
    fn find_by_key(&self, key: &EnrollmentKey) -> EngineResult<Option<Enrollment>>;
    /// Returns matching records ordered by student, course, semester and class.
    fn list_enrollments(&self, filter: &EnrollmentFilter) -> EngineResult<Vec<Enrollment>>;
    /// Applies a score/status update and recomputes the grade atomically.
    fn update_scores(&self, id: Uuid, update: &ScoreUpdate) -> EngineResult<Enrollment>;
    /// Applies several updates atomically: if any id is unknown nothing changes.
    fn update_scores_batch(&self, updates: &[(Uuid, ScoreUpdate)]) -> EngineResult<Vec<Enrollment>>;
    /// Deletes a record; returns whether one was removed.
    fn delete_enrollment(&self, id: Uuid) -> EngineResult<bool>;
    /// Returns the number of stored records.
    fn count_enrollments(&self) -> EngineResult<usize>;
}
