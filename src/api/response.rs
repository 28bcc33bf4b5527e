//! Response types for the grade engine API.
//!
//! This module defines the response bodies, the error response structure
//! and the mapping from engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AuditTrace, DerivedGrade};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for a path identifier that is not a valid UUID.
    pub fn invalid_id(id: &str) -> Self {
        Self::with_details(
            "INVALID_ID",
            format!("Invalid record id: {}", id),
            "Record ids are UUIDs",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            EngineError::Validation(errors) => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError {
                    code: "VALIDATION_ERROR".to_string(),
                    message,
                    details: serde_json::to_value(&errors).ok(),
                },
            },
            EngineError::StudentNotFound { .. } => ApiErrorResponse::bad_request(ApiError::new(
                "STUDENT_NOT_FOUND",
                message,
            )),
            EngineError::ClassNotFound { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("CLASS_NOT_FOUND", message))
            }
            EngineError::CourseNotFound { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("COURSE_NOT_FOUND", message))
            }
            EngineError::EnrollmentNotFound { .. } | EngineError::RecordNotFound { .. } => {
                ApiErrorResponse {
                    status: StatusCode::NOT_FOUND,
                    error: ApiError::new("NOT_FOUND", message),
                }
            }
            EngineError::DuplicateEnrollment { .. } | EngineError::DuplicateRecord { .. } => {
                ApiErrorResponse {
                    status: StatusCode::CONFLICT,
                    error: ApiError::new("DUPLICATE", message),
                }
            }
            EngineError::Repository { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            },
            EngineError::ClassifierOutput { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CLASSIFIER_ERROR",
                    "Could not interpret the intent classifier's response",
                    message,
                ),
            },
        }
    }
}

/// Response body for `POST /grades/compute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeResponse {
    /// The derived grade; every field is null when the grade is pending.
    #[serde(flatten)]
    pub grade: DerivedGrade,
    /// How the grade was reached.
    pub audit_trace: AuditTrace,
}

/// Response body for `GET /students/:id/gpa`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpaResponse {
    /// Student identifier.
    pub student_id: String,
    /// Semester filter that was applied, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    /// Credit-weighted GPA.
    pub gpa: Decimal,
    /// Credit-hours counted.
    pub total_credits: u32,
}

/// Response body for the catalog `delete-many` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    /// Number of records removed.
    pub deleted: usize,
}

/// Response body for `POST /chatbot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotResponse {
    /// The answer text.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrors;
    use uuid::Uuid;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_validation_error_lists_fields_in_details() {
        let engine_error: EngineError =
            ValidationErrors::single("score_a", "11 is outside 0-10").into();
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "VALIDATION_ERROR");
        assert_eq!(
            api_error.error.details,
            Some(serde_json::json!([{"field": "score_a", "message": "11 is outside 0-10"}]))
        );
    }

    #[test]
    fn test_engine_error_status_codes() {
        let cases = [
            (
                EngineError::StudentNotFound {
                    student_id: "SV00009".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                EngineError::EnrollmentNotFound { id: Uuid::new_v4() },
                StatusCode::NOT_FOUND,
            ),
            (
                EngineError::RecordNotFound {
                    entity: "Course",
                    id: "MH00999".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                EngineError::DuplicateRecord {
                    entity: "Course",
                    id: "MH00101".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                EngineError::Repository {
                    message: "lock poisoned".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            let api_error: ApiErrorResponse = error.into();
            assert_eq!(api_error.status, expected);
        }
    }
}
