//! The intent classifier's output format.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Intents the assistant knows how to act on.
///
/// Everything else the classifier may return (`greet`, `help`, `invalid`,
/// write intents...) is answered with the classifier's own text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Profile, credits and GPA of a student.
    ViewStudentDetail,
    /// Grades of a student, optionally for one course or semester.
    GetStudentGrade,
    /// Average final grade per course.
    GetCourseAverage,
    /// Class of a student.
    GetStudentClass,
    /// Any intent answered from the classifier's text.
    #[serde(other)]
    Other,
}

/// Entities extracted by the classifier. Keys follow the classifier's
/// naming; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entities {
    /// Student identifier.
    #[serde(rename = "maSV", default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Student name.
    #[serde(rename = "tenSV", default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    /// Course identifier.
    #[serde(rename = "maMonHoc", default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    /// Course name.
    #[serde(rename = "tenMonHoc", default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    /// Class identifier.
    #[serde(rename = "maLop", default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    /// Class name.
    #[serde(rename = "tenLop", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Semester code or fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
}

/// One classified request within a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedIntent {
    /// What the user asked for.
    pub intent: IntentKind,
    /// Extracted entities.
    #[serde(default)]
    pub entities: Entities,
    /// The classifier's own answer for this intent.
    #[serde(default)]
    pub text: Option<String>,
}

/// The full classifier response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassifierResponse {
    /// Intents found in the question, in order.
    #[serde(default)]
    pub intents: Vec<ClassifiedIntent>,
    /// The classifier's combined answer.
    #[serde(default)]
    pub text: Option<String>,
}

/// Parses the classifier's raw output, which may be wrapped in a
/// ```` ```json ```` fence.
///
/// # Example
///
/// ```
/// use grade_engine::assistant::{IntentKind, parse_classifier_output};
///
/// let raw = "```json\n{\"intents\":[{\"intent\":\"get_student_class\",\"entities\":{\"maSV\":\"SV00001\"}}]}\n```";
/// let response = parse_classifier_output(raw).unwrap();
/// assert_eq!(response.intents[0].intent, IntentKind::GetStudentClass);
/// assert_eq!(response.intents[0].entities.student_id.as_deref(), Some("SV00001"));
/// ```
pub fn parse_classifier_output(raw: &str) -> EngineResult<ClassifierResponse> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```"))
        .unwrap_or(trimmed)
        .trim();

    if !body.starts_with('{') {
        return Err(EngineError::ClassifierOutput {
            message: "response does not start with a JSON object".to_string(),
        });
    }

    serde_json::from_str(body).map_err(|e| EngineError::ClassifierOutput {
        message: e.to_string(),
    })
}
