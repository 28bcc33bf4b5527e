//! In-memory repository implementation.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{ClassSection, Course, Enrollment, EnrollmentKey, ScoreUpdate, Student};

use super::{
    ClassRepository, CourseRepository, EnrollmentFilter, EnrollmentRepository, StudentRepository,
};

/// A process-local store implementing every repository trait.
///
/// Each collection sits behind its own `RwLock`. Enrollment writes that
/// change scores hold the write lock for the whole read-modify-recompute
/// cycle, so concurrent updates to one record cannot interleave.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use grade_engine::models::{Course, NewCourse};
/// use grade_engine::repository::{CourseRepository, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// let course = Course::from_new(
///     NewCourse { course_id: "MH00101".to_string(), name: "Calculus".to_string(), credits: 3 },
///     Utc::now(),
/// );
/// store.insert_course(course).unwrap();
/// assert_eq!(store.get_course("MH00101").unwrap().unwrap().credits, 3);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    students: RwLock<BTreeMap<String, Student>>,
    classes: RwLock<BTreeMap<String, ClassSection>>,
    courses: RwLock<BTreeMap<String, Course>>,
    enrollments: RwLock<EnrollmentTable>,
}

/// Enrollment records plus the index enforcing key uniqueness. Both maps
/// change together under one write lock.
#[derive(Debug, Default)]
struct EnrollmentTable {
    records: HashMap<Uuid, Enrollment>,
    by_key: HashMap<EnrollmentKey, Uuid>,
}

impl EnrollmentTable {
    fn insert(&mut self, enrollment: Enrollment) {
        self.by_key.insert(enrollment.key().clone(), enrollment.id());
        self.records.insert(enrollment.id(), enrollment);
    }

    fn remove(&mut self, id: Uuid) -> bool {
        match self.records.remove(&id) {
            Some(removed) => {
                self.by_key.remove(removed.key());
                true
            }
            None => false,
        }
    }
}

fn read<'a, T>(lock: &'a RwLock<T>, name: &str) -> EngineResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| EngineError::Repository {
        message: format!("{} store lock poisoned", name),
    })
}

fn write<'a, T>(lock: &'a RwLock<T>, name: &str) -> EngineResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| EngineError::Repository {
        message: format!("{} store lock poisoned", name),
    })
}

/// Overwrites an existing entry of a catalog map.
fn replace_entry<T>(
    map: &mut BTreeMap<String, T>,
    entity: &'static str,
    id: &str,
    value: T,
) -> EngineResult<()> {
    match map.get_mut(id) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(EngineError::RecordNotFound {
            entity,
            id: id.to_string(),
        }),
    }
}

fn remove_all<T>(map: &mut BTreeMap<String, T>, ids: &[String]) -> usize {
    ids.iter().filter(|id| map.remove(id.as_str()).is_some()).count()
}

fn duplicate_of(key: &EnrollmentKey) -> EngineError {
    EngineError::DuplicateEnrollment {
        student_id: key.student_id.clone(),
        course_id: key.course_id.clone(),
        class_id: key.class_id.clone(),
        semester: key.semester.to_string(),
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StudentRepository for InMemoryStore {
    fn insert_student(&self, student: Student) -> EngineResult<Student> {
        let mut students = write(&self.students, "student")?;
        if students.contains_key(&student.student_id) {
            return Err(EngineError::DuplicateRecord {
                entity: "Student",
                id: student.student_id,
            });
        }
        students.insert(student.student_id.clone(), student.clone());
        Ok(student)
    }

    fn get_student(&self, student_id: &str) -> EngineResult<Option<Student>> {
        Ok(read(&self.students, "student")?.get(student_id).cloned())
    }

    fn list_students(&self) -> EngineResult<Vec<Student>> {
        Ok(read(&self.students, "student")?.values().cloned().collect())
    }

    fn replace_student(&self, student: Student) -> EngineResult<Student> {
        let mut students = write(&self.students, "student")?;
        replace_entry(&mut students, "Student", &student.student_id, student.clone())?;
        Ok(student)
    }

    fn delete_student(&self, student_id: &str) -> EngineResult<bool> {
        Ok(write(&self.students, "student")?.remove(student_id).is_some())
    }

    fn delete_students(&self, student_ids: &[String]) -> EngineResult<usize> {
        Ok(remove_all(&mut *write(&self.students, "student")?, student_ids))
    }
}

impl ClassRepository for InMemoryStore {
    fn insert_class(&self, class: ClassSection) -> EngineResult<ClassSection> {
        let mut classes = write(&self.classes, "class")?;
        if classes.contains_key(&class.class_id) {
            return Err(EngineError::DuplicateRecord {
                entity: "Class",
                id: class.class_id,
            });
        }
        classes.insert(class.class_id.clone(), class.clone());
        Ok(class)
    }

    fn get_class(&self, class_id: &str) -> EngineResult<Option<ClassSection>> {
        Ok(read(&self.classes, "class")?.get(class_id).cloned())
    }

    fn list_classes(&self) -> EngineResult<Vec<ClassSection>> {
        Ok(read(&self.classes, "class")?.values().cloned().collect())
    }

    fn replace_class(&self, class: ClassSection) -> EngineResult<ClassSection> {
        let mut classes = write(&self.classes, "class")?;
        replace_entry(&mut classes, "Class", &class.class_id, class.clone())?;
        Ok(class)
    }

    fn delete_class(&self, class_id: &str) -> EngineResult<bool> {
        Ok(write(&self.classes, "class")?.remove(class_id).is_some())
    }

    fn delete_classes(&self, class_ids: &[String]) -> EngineResult<usize> {
        Ok(remove_all(&mut *write(&self.classes, "class")?, class_ids))
    }
}

impl CourseRepository for InMemoryStore {
    fn insert_course(&self, course: Course) -> EngineResult<Course> {
        let mut courses = write(&self.courses, "course")?;
        if courses.contains_key(&course.course_id) {
            return Err(EngineError::DuplicateRecord {
                entity: "Course",
                id: course.course_id,
            });
        }
        courses.insert(course.course_id.clone(), course.clone());
        Ok(course)
    }

    fn get_course(&self, course_id: &str) -> EngineResult<Option<Course>> {
        Ok(read(&self.courses, "course")?.get(course_id).cloned())
    }

    fn list_courses(&self) -> EngineResult<Vec<Course>> {
        Ok(read(&self.courses, "course")?.values().cloned().collect())
    }

    fn replace_course(&self, course: Course) -> EngineResult<Course> {
        let mut courses = write(&self.courses, "course")?;
        replace_entry(&mut courses, "Course", &course.course_id, course.clone())?;
        Ok(course)
    }

    fn delete_course(&self, course_id: &str) -> EngineResult<bool> {
        Ok(write(&self.courses, "course")?.remove(course_id).is_some())
    }

    fn delete_courses(&self, course_ids: &[String]) -> EngineResult<usize> {
        Ok(remove_all(&mut *write(&self.courses, "course")?, course_ids))
    }
}

impl EnrollmentRepository for InMemoryStore {
    fn insert_enrollment(&self, enrollment: Enrollment) -> EngineResult<Enrollment> {
        let mut table = write(&self.enrollments, "enrollment")?;
        if table.by_key.contains_key(enrollment.key()) {
            return Err(duplicate_of(enrollment.key()));
        }
        table.insert(enrollment.clone());
        Ok(enrollment)
    }

    fn insert_enrollments(&self, batch: Vec<Enrollment>) -> EngineResult<usize> {
        let mut table = write(&self.enrollments, "enrollment")?;

        let mut seen: HashSet<&EnrollmentKey> = HashSet::with_capacity(batch.len());
        for enrollment in &batch {
            if table.by_key.contains_key(enrollment.key()) || !seen.insert(enrollment.key()) {
                return Err(duplicate_of(enrollment.key()));
            }
        }
        drop(seen);

        let count = batch.len();
        for enrollment in batch {
            table.insert(enrollment);
        }
        debug!(count, "Inserted enrollment batch");
        Ok(count)
    }

    fn get_enrollment(&self, id: Uuid) -> EngineResult<Option<Enrollment>> {
        Ok(read(&self.enrollments, "enrollment")?.records.get(&id).cloned())
    }

    fn find_by_key(&self, key: &EnrollmentKey) -> EngineResult<Option<Enrollment>> {
        let table = read(&self.enrollments, "enrollment")?;
        Ok(table
            .by_key
            .get(key)
            .and_then(|id| table.records.get(id))
            .cloned())
    }

    fn list_enrollments(&self, filter: &EnrollmentFilter) -> EngineResult<Vec<Enrollment>> {
        let mut matching: Vec<Enrollment> = read(&self.enrollments, "enrollment")?
            .records
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.student_id()
                .cmp(b.student_id())
                .then_with(|| a.course_id().cmp(b.course_id()))
                .then_with(|| a.semester().cmp(&b.semester()))
                .then_with(|| a.class_id().cmp(b.class_id()))
        });
        Ok(matching)
    }

    fn update_scores(&self, id: Uuid, update: &ScoreUpdate) -> EngineResult<Enrollment> {
        let mut table = write(&self.enrollments, "enrollment")?;
        let enrollment = table
            .records
            .get_mut(&id)
            .ok_or(EngineError::EnrollmentNotFound { id })?;
        enrollment.update_scores(update);
        Ok(enrollment.clone())
    }

    fn update_scores_batch(
        &self,
        updates: &[(Uuid, ScoreUpdate)],
    ) -> EngineResult<Vec<Enrollment>> {
        let mut table = write(&self.enrollments, "enrollment")?;
        if let Some((id, _)) = updates.iter().find(|(id, _)| !table.records.contains_key(id)) {
            return Err(EngineError::EnrollmentNotFound { id: *id });
        }

        let mut updated = Vec::with_capacity(updates.len());
        for (id, update) in updates {
            if let Some(enrollment) = table.records.get_mut(id) {
                enrollment.update_scores(update);
                updated.push(enrollment.clone());
            }
        }
        Ok(updated)
    }

    fn delete_enrollment(&self, id: Uuid) -> EngineResult<bool> {
        Ok(write(&self.enrollments, "enrollment")?.remove(id))
    }

    fn count_enrollments(&self) -> EngineResult<usize> {
        Ok(read(&self.enrollments, "enrollment")?.records.len())
    }
}
