//! Answers classified intents from gradebook data.

use tracing::debug;

use crate::calculation::course_averages;
use crate::error::{EngineError, EngineResult};
use crate::gradebook::Gradebook;
use crate::models::{Enrollment, Student};
use crate::repository::EnrollmentFilter;

use super::intent::{ClassifiedIntent, ClassifierResponse, Entities, IntentKind};

/// Answer given when neither the data nor the classifier produced any text.
pub const FALLBACK_ANSWER: &str = "Không hiểu câu hỏi. Vui lòng hỏi lại!";

/// Builds the reply for a classifier response.
///
/// Data intents are answered from the gradebook. Any other intent, or a data
/// intent whose student cannot be found, uses the classifier's text. Answers
/// are joined by blank lines; an empty result falls back to the classifier's
/// combined text and then to [`FALLBACK_ANSWER`].
pub fn answer(gradebook: &Gradebook, response: &ClassifierResponse) -> EngineResult<String> {
    let mut parts = Vec::with_capacity(response.intents.len());
    for intent in &response.intents {
        if let Some(text) = answer_intent(gradebook, intent)? {
            parts.push(text);
        }
    }

    if parts.is_empty() {
        return Ok(response
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(FALLBACK_ANSWER)
            .to_string());
    }
    Ok(parts.join("\n\n"))
}

fn answer_intent(gradebook: &Gradebook, intent: &ClassifiedIntent) -> EngineResult<Option<String>> {
    let from_data = match intent.intent {
        IntentKind::ViewStudentDetail => student_detail(gradebook, &intent.entities)?,
        IntentKind::GetStudentGrade => student_grades(gradebook, &intent.entities)?,
        IntentKind::GetCourseAverage => Some(course_average(gradebook, &intent.entities)?),
        IntentKind::GetStudentClass => student_class(gradebook, &intent.entities)?,
        IntentKind::Other => None,
    };
    debug!(intent = ?intent.intent, answered_from_data = from_data.is_some(), "Answered intent");

    Ok(from_data.or_else(|| {
        intent
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }))
}

/// Resolves the student an intent refers to, by id first and then by name.
fn find_student(gradebook: &Gradebook, entities: &Entities) -> EngineResult<Option<Student>> {
    if let Some(id) = entities.student_id.as_deref() {
        match gradebook.get_student(id.trim()) {
            Ok(student) => return Ok(Some(student)),
            Err(EngineError::RecordNotFound { .. }) => {}
            Err(err) => return Err(err),
        }
    }
    match entities.student_name.as_deref() {
        Some(name) => gradebook.find_student_by_name(name),
        None => Ok(None),
    }
}

/// Resolves the course an intent refers to, by id or by name.
fn find_course_id(gradebook: &Gradebook, entities: &Entities) -> EngineResult<Option<String>> {
    if let Some(id) = entities.course_id.as_deref() {
        return Ok(Some(id.trim().to_string()));
    }
    let Some(name) = entities.course_name.as_deref() else {
        return Ok(None);
    };
    let wanted = name.trim().to_lowercase();
    Ok(gradebook
        .list_courses()?
        .into_iter()
        .find(|c| c.name.to_lowercase() == wanted)
        .map(|c| c.course_id))
}

fn student_detail(gradebook: &Gradebook, entities: &Entities) -> EngineResult<Option<String>> {
    let Some(student) = find_student(gradebook, entities)? else {
        return Ok(None);
    };
    let gpa = gradebook.student_gpa(&student.student_id, None)?;
    Ok(Some(format!(
        "📛 Họ và tên: {}\n🆔 Mã sinh viên: {}\n🏫 Lớp: {}\n🎓 Khoa: {}\n📊 Tổng số tín chỉ tích lũy: {}\n⭐ Điểm trung bình tích lũy (GPA): {:.2}",
        student.name, student.student_id, student.class_name, student.faculty, gpa.total_credits, gpa.gpa
    )))
}

fn grade_line(enrollment: &Enrollment, course_name: Option<&str>) -> String {
    let course = match course_name {
        Some(name) => format!("{} ({})", name, enrollment.course_id()),
        None => enrollment.course_id().to_string(),
    };
    match enrollment.grade() {
        Some(grade) => format!(
            "📘 {} - {}: {:.1} ({}, {})",
            course,
            enrollment.semester(),
            grade.final_grade,
            grade.letter_grade,
            grade.verbal_grade
        ),
        None => format!("📘 {} - {}: chưa có điểm", course, enrollment.semester()),
    }
}

fn student_grades(gradebook: &Gradebook, entities: &Entities) -> EngineResult<Option<String>> {
    let Some(student) = find_student(gradebook, entities)? else {
        return Ok(None);
    };
    let filter = EnrollmentFilter {
        course_id: find_course_id(gradebook, entities)?,
        semester: entities.semester.clone(),
        ..EnrollmentFilter::for_student(student.student_id.clone())
    };
    let records = gradebook.enrollments(&filter)?;
    if records.is_empty() {
        return Ok(Some(format!(
            "Sinh viên {} ({}) chưa có điểm phù hợp.",
            student.name, student.student_id
        )));
    }

    let catalog = gradebook.course_catalog()?;
    let lines: Vec<String> = records
        .iter()
        .map(|r| grade_line(r, catalog.name(r.course_id())))
        .collect();
    Ok(Some(format!(
        "Điểm của {} ({}):\n{}",
        student.name,
        student.student_id,
        lines.join("\n")
    )))
}

fn course_average(gradebook: &Gradebook, entities: &Entities) -> EngineResult<String> {
    let averages = match find_course_id(gradebook, entities)? {
        Some(course_id) => {
            let records = gradebook.enrollments(&EnrollmentFilter {
                course_id: Some(course_id),
                ..Default::default()
            })?;
            course_averages(&records, &gradebook.course_catalog()?, 1)
        }
        None => gradebook.course_averages()?,
    };

    if averages.is_empty() {
        return Ok("Chưa có dữ liệu điểm trung bình môn học.".to_string());
    }
    let lines: Vec<String> = averages
        .iter()
        .map(|a| format!("⭐ {} ({}): {:.2}", a.course_name, a.course_id, a.average_grade))
        .collect();
    Ok(format!("Điểm trung bình môn học:\n{}", lines.join("\n")))
}

fn student_class(gradebook: &Gradebook, entities: &Entities) -> EngineResult<Option<String>> {
    Ok(find_student(gradebook, entities)?.map(|student| {
        format!(
            "🏫 Sinh viên {} ({}) thuộc lớp {}.",
            student.name, student.student_id, student.class_name
        )
    }))
}
