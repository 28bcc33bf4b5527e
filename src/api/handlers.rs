//! HTTP request handlers for the grade engine API.
//!
//! This module contains the router, the grade and statistics handlers and
//! the helpers every handler shares for body parsing and responses. Catalog
//! handlers live in [`super::catalog`].

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assistant::{answer, parse_classifier_output};
use crate::error::EngineResult;
use crate::models::{AuditTrace, DerivedGrade, NewEnrollment, ScoreUpdate};

use super::catalog;
use super::request::{
    BatchUpdateItem, ChatbotRequest, ComputeRequest, GpaQuery, ImportRequest,
    ListEnrollmentsQuery,
};
use super::response::{ApiError, ApiErrorResponse, ChatbotResponse, ComputeResponse, GpaResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/grades", post(create_grade_handler).get(list_grades_handler))
        .route("/grades/compute", post(compute_handler))
        .route("/grades/batch-update", post(batch_update_handler))
        .route("/grades/import", post(import_handler))
        .route(
            "/grades/:id",
            patch(update_grade_handler).delete(delete_grade_handler),
        )
        .route("/students/:id/gpa", get(student_gpa_handler))
        .route("/stats", get(dashboard_handler))
        .route("/stats/students-by-faculty", get(students_by_faculty_handler))
        .route("/stats/average-by-course", get(average_by_course_handler))
        .route("/stats/top-students-by-gpa", get(top_students_handler))
        .route("/chatbot", post(chatbot_handler))
        .merge(catalog::routes())
        .with_state(state)
}

/// Builds a JSON response with an explicit content type.
pub(super) fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Unwraps a JSON body, turning a rejection into a 400 response.
pub(super) fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(error_response(ApiErrorResponse::bad_request(error)))
}

/// Unwraps a query string, turning a rejection into a 400 response.
pub(super) fn parse_query<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, Response> {
    query.map(|Query(q)| q).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Invalid query string"
        );
        error_response(ApiErrorResponse::bad_request(ApiError::new(
            "INVALID_QUERY",
            rejection.body_text(),
        )))
    })
}

/// Parses an enrollment id taken from the path.
fn parse_id(correlation_id: Uuid, raw: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(raw).map_err(|_| {
        warn!(correlation_id = %correlation_id, id = %raw, "Invalid record id");
        error_response(ApiErrorResponse::bad_request(ApiError::invalid_id(raw)))
    })
}

/// Turns an engine result into a response, logging the outcome.
pub(super) fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    started: Instant,
    status: StatusCode,
    result: EngineResult<T>,
) -> Response {
    let duration_us = started.elapsed().as_micros();
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                duration_us,
                "Request completed successfully"
            );
            json_response(status, body)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                duration_us,
                error = %err,
                "Request failed"
            );
            error_response(err.into())
        }
    }
}

/// Like [`respond`] for operations without a body; success is `204 No Content`.
pub(super) fn respond_empty(
    correlation_id: Uuid,
    operation: &'static str,
    started: Instant,
    result: EngineResult<()>,
) -> Response {
    match result {
        Ok(()) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                duration_us = started.elapsed().as_micros(),
                "Request completed successfully"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => respond::<()>(correlation_id, operation, started, StatusCode::OK, Err(err)),
    }
}

/// Handler for POST /grades/compute.
///
/// Computes a grade with its audit steps without storing anything.
async fn compute_handler(
    State(state): State<AppState>,
    payload: Result<Json<ComputeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing grade computation");
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let started = Instant::now();
    let result = state
        .gradebook()
        .explain_grade(request.scores(), request.status)
        .map(|computation| ComputeResponse {
            grade: DerivedGrade::from(computation.grade),
            audit_trace: AuditTrace {
                steps: computation.audit_steps,
                warnings: vec![],
                duration_us: started.elapsed().as_micros() as u64,
            },
        });
    respond(correlation_id, "compute_grade", started, StatusCode::OK, result)
}

/// Handler for POST /grades.
async fn create_grade_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewEnrollment>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing grade creation");
    let input = match parse_body(correlation_id, payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    let started = Instant::now();
    let result = state.gradebook().create_enrollment(input);
    respond(correlation_id, "create_grade", started, StatusCode::CREATED, result)
}

/// Handler for GET /grades.
async fn list_grades_handler(
    State(state): State<AppState>,
    query: Result<Query<ListEnrollmentsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(correlation_id, query) {
        Ok(query) => query,
        Err(response) => return response,
    };

    let started = Instant::now();
    let (filter, page) = query.into_parts();
    let result = state.gradebook().list_enrollments(&filter, page);
    respond(correlation_id, "list_grades", started, StatusCode::OK, result)
}

/// Handler for PATCH /grades/:id.
async fn update_grade_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ScoreUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, enrollment_id = %id, "Processing score update");
    let id = match parse_id(correlation_id, &id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let update = match parse_body(correlation_id, payload) {
        Ok(update) => update,
        Err(response) => return response,
    };

    let started = Instant::now();
    let result = state.gradebook().update_scores(id, update);
    respond(correlation_id, "update_grade", started, StatusCode::OK, result)
}

/// Handler for POST /grades/batch-update.
async fn batch_update_handler(
    State(state): State<AppState>,
    payload: Result<Json<Vec<BatchUpdateItem>>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let items = match parse_body(correlation_id, payload) {
        Ok(items) => items,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, count = items.len(), "Processing batch score update");

    let started = Instant::now();
    let updates: Vec<(Uuid, ScoreUpdate)> = items.into_iter().map(Into::into).collect();
    let result = state.gradebook().update_scores_batch(&updates);
    respond(correlation_id, "batch_update", started, StatusCode::OK, result)
}

/// Handler for DELETE /grades/:id.
async fn delete_grade_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = match parse_id(correlation_id, &id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let started = Instant::now();
    let result = state.gradebook().delete_enrollment(id);
    respond_empty(correlation_id, "delete_grade", started, result)
}

/// Handler for POST /grades/import.
///
/// Row failures are reported in the body; the request itself succeeds.
async fn import_handler(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    info!(correlation_id = %correlation_id, rows = request.rows.len(), "Processing grade import");

    let started = Instant::now();
    let result = state.gradebook().import_enrollments(request.rows);
    if let Ok(report) = &result {
        info!(
            correlation_id = %correlation_id,
            imported = report.imported,
            rejected = report.errors.len(),
            "Import finished"
        );
    }
    respond(correlation_id, "import_grades", started, StatusCode::OK, result)
}

/// Handler for GET /students/:id/gpa.
async fn student_gpa_handler(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    query: Result<Query<GpaQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(correlation_id, query) {
        Ok(query) => query,
        Err(response) => return response,
    };

    let started = Instant::now();
    let semester = query
        .semester
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let result = state
        .gradebook()
        .student_gpa(&student_id, semester.as_deref())
        .map(|summary| GpaResponse {
            student_id: student_id.clone(),
            semester: semester.clone(),
            gpa: summary.gpa,
            total_credits: summary.total_credits,
        });
    respond(correlation_id, "student_gpa", started, StatusCode::OK, result)
}

/// Handler for GET /stats.
async fn dashboard_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().dashboard();
    respond(correlation_id, "dashboard", started, StatusCode::OK, result)
}

/// Handler for GET /stats/students-by-faculty.
async fn students_by_faculty_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().students_by_faculty();
    respond(correlation_id, "students_by_faculty", started, StatusCode::OK, result)
}

/// Handler for GET /stats/average-by-course.
async fn average_by_course_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().course_averages();
    respond(correlation_id, "average_by_course", started, StatusCode::OK, result)
}

/// Handler for GET /stats/top-students-by-gpa.
async fn top_students_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().top_students();
    respond(correlation_id, "top_students", started, StatusCode::OK, result)
}

/// Handler for POST /chatbot.
///
/// Takes the intent classifier's raw output and answers from gradebook data
/// where it can.
async fn chatbot_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatbotRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing chatbot request");
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let started = Instant::now();
    let result = parse_classifier_output(&request.classifier_output)
        .and_then(|classified| answer(state.gradebook(), &classified))
        .map(|text| ChatbotResponse { text });
    respond(correlation_id, "chatbot", started, StatusCode::OK, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradebook::tests::{new_enrollment, seeded_gradebook};
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        create_router(AppState::new(seeded_gradebook()))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn json_dec(value: &serde_json::Value) -> Decimal {
        Decimal::from_str(value.as_str().unwrap()).unwrap()
    }

    fn enrollment_body(student_id: &str, course_id: &str) -> serde_json::Value {
        serde_json::json!({
            "student_id": student_id,
            "course_id": course_id,
            "class_id": "LOP01",
            "semester": "HK1-2024",
            "score_a": "8",
            "score_b": "7",
            "score_c": "9"
        })
    }

    #[tokio::test]
    async fn test_compute_returns_grade_and_audit_trace() {
        let router = create_test_router();
        let response = router
            .oneshot(json_request(
                "POST",
                "/grades/compute",
                serde_json::json!({"score_a": "9.4", "score_b": "9.4", "score_c": "9.4"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let json = body_json(response).await;
        assert_eq!(json_dec(&json["final_grade"]), Decimal::from_str("9.4").unwrap());
        assert_eq!(json["letter_grade"], "A+");
        assert!(!json["audit_trace"]["steps"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compute_with_missing_score_is_pending() {
        let router = create_test_router();
        let response = router
            .oneshot(json_request(
                "POST",
                "/grades/compute",
                serde_json::json!({"score_a": "9", "score_b": null}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["final_grade"].is_null());
        assert!(json["grade_point"].is_null());
    }

    #[tokio::test]
    async fn test_compute_rejects_out_of_range_score() {
        let router = create_test_router();
        let response = router
            .oneshot(json_request(
                "POST",
                "/grades/compute",
                serde_json::json!({"score_a": "10.5", "score_b": "5", "score_c": "5"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"][0]["field"], "score_a");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/grades")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_content_type_returns_400() {
        let router = create_test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/grades")
                    .body(Body::from(enrollment_body("SV00001", "MH00101").to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let router = create_test_router();
        let response = router
            .oneshot(json_request(
                "POST",
                "/grades",
                serde_json::json!({"student_id": "SV00001"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_grade_then_duplicate_conflicts() {
        let router = create_test_router();
        let response = router
            .clone()
            .oneshot(json_request("POST", "/grades", enrollment_body("SV00001", "MH00101")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json_dec(&json["final_grade"]), Decimal::from_str("7.8").unwrap());
        assert_eq!(json["status"], "normal");

        let response = router
            .oneshot(json_request("POST", "/grades", enrollment_body("SV00001", "MH00101")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_grade_for_unknown_student_is_400() {
        let router = create_test_router();
        let response = router
            .oneshot(json_request("POST", "/grades", enrollment_body("SV09999", "MH00101")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "STUDENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_grade_recomputes() {
        let state = AppState::new(seeded_gradebook());
        let router = create_router(state.clone());
        let created = state
            .gradebook()
            .create_enrollment(new_enrollment(
                "SV00001",
                "MH00101",
                Some("8"),
            ))
            .unwrap();

        let response = router
            .oneshot(json_request(
                "PATCH",
                &format!("/grades/{}", created.id()),
                serde_json::json!({"status": "failed_disciplinary"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json_dec(&json["final_grade"]), Decimal::ZERO);
        assert_eq!(json["letter_grade"], "F");
        assert_eq!(json_dec(&json["score_a"]), Decimal::from(8));
    }

    #[tokio::test]
    async fn test_update_unknown_grade_is_404() {
        let router = create_test_router();
        let response = router
            .oneshot(json_request(
                "PATCH",
                &format!("/grades/{}", Uuid::new_v4()),
                serde_json::json!({"score_a": "5"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_id_is_400() {
        let router = create_test_router();
        let response = router
            .oneshot(empty_request("DELETE", "/grades/not-a-uuid"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_delete_grade_returns_204() {
        let state = AppState::new(seeded_gradebook());
        let created = state
            .gradebook()
            .create_enrollment(new_enrollment(
                "SV00002",
                "MH00101",
                None,
            ))
            .unwrap();

        let response = create_router(state.clone())
            .oneshot(empty_request("DELETE", &format!("/grades/{}", created.id())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.gradebook().get_enrollment(created.id()).is_err());
    }

    #[tokio::test]
    async fn test_batch_update_rejects_whole_batch() {
        let state = AppState::new(seeded_gradebook());
        let created = state
            .gradebook()
            .create_enrollment(new_enrollment(
                "SV00001",
                "MH00101",
                Some("6"),
            ))
            .unwrap();

        let response = create_router(state.clone())
            .oneshot(json_request(
                "POST",
                "/grades/batch-update",
                serde_json::json!([
                    {"id": created.id(), "score_a": "9"},
                    {"id": created.id(), "score_b": "11"}
                ]),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["details"][0]["field"], "updates[1].score_b");
        let stored = state.gradebook().get_enrollment(created.id()).unwrap();
        assert_eq!(stored.scores().score_a, created.scores().score_a);
    }

    #[tokio::test]
    async fn test_list_grades_filters_and_pages() {
        let state = AppState::new(seeded_gradebook());
        for (student, course) in [
            ("SV00001", "MH00101"),
            ("SV00001", "MH00202"),
            ("SV00002", "MH00101"),
        ] {
            state
                .gradebook()
                .create_enrollment(new_enrollment(
                    student,
                    course,
                    Some("7"),
                ))
                .unwrap();
        }

        let response = create_router(state)
            .oneshot(empty_request("GET", "/grades?student_id=SV00001&limit=1&page=2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 2);
        assert_eq!(json["total_pages"], 2);
        assert_eq!(json["items"][0]["course_id"], "MH00202");
    }

    #[tokio::test]
    async fn test_import_reports_row_errors() {
        let router = create_test_router();
        let response = router
            .oneshot(json_request(
                "POST",
                "/grades/import",
                serde_json::json!({"rows": [
                    {"maSV": "SV00001", "maLop": "LOP01", "maMonHoc": "MH00101", "semester": "HK1-2024", "diemA": "8"},
                    {"maSV": "SV00404", "maLop": "LOP01", "maMonHoc": "MH00101", "semester": "HK1-2024"}
                ]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["imported"], 1);
        assert_eq!(json["errors"][0]["row"], 2);
    }

    #[tokio::test]
    async fn test_student_gpa_endpoint() {
        let state = AppState::new(seeded_gradebook());
        state
            .gradebook()
            .create_enrollment(new_enrollment(
                "SV00001",
                "MH00101",
                Some("9"),
            ))
            .unwrap();

        let response = create_router(state.clone())
            .oneshot(empty_request("GET", "/students/SV00001/gpa?semester=2024"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json_dec(&json["gpa"]), Decimal::from(4));
        assert_eq!(json["total_credits"], 3);
        assert_eq!(json["semester"], "2024");

        let response = create_router(state)
            .oneshot(empty_request("GET", "/students/SV09999/gpa"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json_dec(&json["gpa"]), Decimal::ZERO);
        assert_eq!(json["total_credits"], 0);
    }

    #[tokio::test]
    async fn test_stats_endpoints() {
        let router = create_test_router();
        let response = router
            .clone()
            .oneshot(empty_request("GET", "/stats"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total_students"], 3);
        assert_eq!(json["total_enrollments"], 0);

        let response = router
            .clone()
            .oneshot(empty_request("GET", "/stats/students-by-faculty"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json[0]["faculty"], "CNTT");
        assert_eq!(json[0]["count"], 2);

        for uri in ["/stats/average-by-course", "/stats/top-students-by-gpa"] {
            let response = router.clone().oneshot(empty_request("GET", uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let json = body_json(response).await;
            assert_eq!(json, serde_json::json!([]));
        }
    }

    #[tokio::test]
    async fn test_chatbot_answers_from_data() {
        let router = create_test_router();
        let classifier_output = "```json\n{\"intents\":[{\"intent\":\"get_student_class\",\"entities\":{\"maSV\":\"SV00002\"}}]}\n```";
        let response = router
            .oneshot(json_request(
                "POST",
                "/chatbot",
                serde_json::json!({"classifier_output": classifier_output}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["text"].as_str().unwrap().contains("Tran Thi Binh"));
    }

    #[tokio::test]
    async fn test_chatbot_rejects_unparseable_classifier_output() {
        let router = create_test_router();
        let response = router
            .oneshot(json_request(
                "POST",
                "/chatbot",
                serde_json::json!({"classifier_output": "I am not JSON"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["code"], "CLASSIFIER_ERROR");
    }
}
