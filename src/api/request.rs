//! Request types for the grade engine API.
//!
//! Bodies for record creation reuse the model input types
//! ([`NewEnrollment`](crate::models::NewEnrollment), [`NewStudent`](crate::models::NewStudent)...);
//! this module holds the bodies and query strings specific to the HTTP layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gradebook::{ImportRow, PageRequest, StudentFilter, StudentSort};
use crate::models::{EnrollmentStatus, ScoreUpdate, Scores};
use crate::repository::EnrollmentFilter;
use crate::validation::ValidationErrors;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request body for `POST /grades/compute`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputeRequest {
    /// Component weighted at 60%.
    #[serde(default)]
    pub score_a: Option<Decimal>,
    /// Component weighted at 30%.
    #[serde(default)]
    pub score_b: Option<Decimal>,
    /// Component weighted at 10%.
    #[serde(default)]
    pub score_c: Option<Decimal>,
    /// Status flag; normal when absent.
    #[serde(default)]
    pub status: EnrollmentStatus,
}

impl ComputeRequest {
    /// Returns the raw scores of the request.
    pub fn scores(&self) -> Scores {
        Scores::new(self.score_a, self.score_b, self.score_c)
    }
}

/// Query string for `GET /grades`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEnrollmentsQuery {
    /// Exact student id.
    pub student_id: Option<String>,
    /// Exact class id.
    pub class_id: Option<String>,
    /// Exact course id.
    pub course_id: Option<String>,
    /// Semester code fragment.
    pub semester: Option<String>,
    /// Page number, from 1.
    pub page: Option<usize>,
    /// Page size.
    pub limit: Option<usize>,
}

impl ListEnrollmentsQuery {
    /// Splits the query into a filter and a page request. Blank values are ignored.
    pub fn into_parts(self) -> (EnrollmentFilter, PageRequest) {
        let filter = EnrollmentFilter {
            student_id: non_blank(self.student_id),
            class_id: non_blank(self.class_id),
            course_id: non_blank(self.course_id),
            semester: non_blank(self.semester),
        };
        let page = PageRequest {
            page: self.page,
            limit: self.limit,
        };
        (filter, page)
    }
}

/// Query string for `GET /students`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStudentsQuery {
    /// Student id fragment.
    pub student_id: Option<String>,
    /// Name fragment.
    pub name: Option<String>,
    /// Home class name fragment.
    pub class_name: Option<String>,
    /// Comma-separated faculties; a student in any of them matches.
    pub faculty: Option<String>,
    /// Exact cohort start year.
    pub cohort_year: Option<u16>,
    /// Ordering as `field:direction`, e.g. `name:-1`.
    pub sort: Option<String>,
    /// Page number, from 1.
    pub page: Option<usize>,
    /// Page size.
    pub limit: Option<usize>,
}

impl ListStudentsQuery {
    /// Splits the query into a filter, an ordering and a page request.
    /// Blank values are ignored; an unknown sort key is a validation error.
    pub fn into_parts(self) -> Result<(StudentFilter, StudentSort, PageRequest), ValidationErrors> {
        let sort = match non_blank(self.sort) {
            Some(sort) => sort.parse::<StudentSort>()?,
            None => StudentSort::default(),
        };
        let faculties = self
            .faculty
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        let filter = StudentFilter {
            student_id: non_blank(self.student_id),
            name: non_blank(self.name),
            class_name: non_blank(self.class_name),
            faculties,
            cohort_year: self.cohort_year,
        };
        let page = PageRequest {
            page: self.page,
            limit: self.limit,
        };
        Ok((filter, sort, page))
    }
}

/// Request body for the catalog `delete-many` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    /// Ids of the records to delete.
    pub ids: Vec<String>,
}

/// Query string for `GET /students/:id/gpa`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpaQuery {
    /// Semester code fragment.
    pub semester: Option<String>,
}

/// One entry of a `POST /grades/batch-update` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUpdateItem {
    /// Enrollment record id.
    pub id: Uuid,
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

impl From<BatchUpdateItem> for (Uuid, ScoreUpdate) {
    fn from(item: BatchUpdateItem) -> Self {
        (
            item.id,
            ScoreUpdate {
                score_a: item.score_a,
                score_b: item.score_b,
                score_c: item.score_c,
                status: item.status,
            },
        )
    }
}

/// Request body for `POST /grades/import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Rows to import, in spreadsheet order.
    pub rows: Vec<ImportRow>,
}

/// Request body for `POST /chatbot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotRequest {
    /// Raw text returned by the intent classifier.
    pub classifier_output: String,
}
