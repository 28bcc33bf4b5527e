//! Catalog endpoints: students, classes and courses.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use tracing::info;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{
    ClassUpdate, CourseUpdate, NewClassSection, NewCourse, NewStudent, StudentUpdate,
};

use super::handlers::{parse_body, parse_query, respond, respond_empty};
use super::request::{BulkDeleteRequest, ListStudentsQuery};
use super::response::BulkDeleteResponse;
use super::state::AppState;

/// Routes for catalog records, merged into the main router.
pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students_handler).post(create_student_handler))
        .route("/students/delete-many", post(delete_students_handler))
        .route(
            "/students/:id",
            get(get_student_handler)
                .patch(update_student_handler)
                .delete(delete_student_handler),
        )
        .route("/classes", get(list_classes_handler).post(create_class_handler))
        .route("/classes/delete-many", post(delete_classes_handler))
        .route(
            "/classes/:id",
            get(get_class_handler)
                .patch(update_class_handler)
                .delete(delete_class_handler),
        )
        .route("/courses", get(list_courses_handler).post(create_course_handler))
        .route("/courses/delete-many", post(delete_courses_handler))
        .route(
            "/courses/:id",
            get(get_course_handler)
                .patch(update_course_handler)
                .delete(delete_course_handler),
        )
}

async fn create_student_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing student creation");
    let input = match parse_body(correlation_id, payload) {
        Ok(input) => input,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = state.gradebook().create_student(input);
    respond(correlation_id, "create_student", started, StatusCode::CREATED, result)
}

/// Handler for GET /students.
///
/// Filters on id, name and class fragments, a faculty list and the cohort
/// year, then sorts and pages the result.
async fn list_students_handler(
    State(state): State<AppState>,
    query: Result<Query<ListStudentsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match parse_query(correlation_id, query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = query
        .into_parts()
        .map_err(EngineError::from)
        .and_then(|(filter, sort, page)| state.gradebook().search_students(&filter, sort, page));
    respond(correlation_id, "list_students", started, StatusCode::OK, result)
}

async fn get_student_handler(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().get_student(&student_id);
    respond(correlation_id, "get_student", started, StatusCode::OK, result)
}

async fn update_student_handler(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    payload: Result<Json<StudentUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, student_id = %student_id, "Processing student update");
    let update = match parse_body(correlation_id, payload) {
        Ok(update) => update,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = state.gradebook().update_student(&student_id, update);
    respond(correlation_id, "update_student", started, StatusCode::OK, result)
}

async fn delete_student_handler(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().delete_student(&student_id);
    respond_empty(correlation_id, "delete_student", started, result)
}

async fn delete_students_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = state
        .gradebook()
        .delete_students(&request.ids)
        .map(|deleted| BulkDeleteResponse { deleted });
    respond(correlation_id, "delete_students", started, StatusCode::OK, result)
}

async fn create_class_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewClassSection>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing class creation");
    let input = match parse_body(correlation_id, payload) {
        Ok(input) => input,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = state.gradebook().create_class(input);
    respond(correlation_id, "create_class", started, StatusCode::CREATED, result)
}

/// Handler for GET /classes. Each class carries its student count.
async fn list_classes_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().class_summaries();
    respond(correlation_id, "list_classes", started, StatusCode::OK, result)
}

async fn get_class_handler(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().class_summary(&class_id);
    respond(correlation_id, "get_class", started, StatusCode::OK, result)
}

async fn update_class_handler(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    payload: Result<Json<ClassUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, class_id = %class_id, "Processing class update");
    let update = match parse_body(correlation_id, payload) {
        Ok(update) => update,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = state.gradebook().update_class(&class_id, update);
    respond(correlation_id, "update_class", started, StatusCode::OK, result)
}

async fn delete_class_handler(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().delete_class(&class_id);
    respond_empty(correlation_id, "delete_class", started, result)
}

async fn delete_classes_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = state
        .gradebook()
        .delete_classes(&request.ids)
        .map(|deleted| BulkDeleteResponse { deleted });
    respond(correlation_id, "delete_classes", started, StatusCode::OK, result)
}

async fn create_course_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewCourse>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing course creation");
    let input = match parse_body(correlation_id, payload) {
        Ok(input) => input,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = state.gradebook().create_course(input);
    respond(correlation_id, "create_course", started, StatusCode::CREATED, result)
}

async fn list_courses_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().list_courses();
    respond(correlation_id, "list_courses", started, StatusCode::OK, result)
}

async fn get_course_handler(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().get_course(&course_id);
    respond(correlation_id, "get_course", started, StatusCode::OK, result)
}

/// Handler for PATCH /courses/:id.
///
/// A credit change reweights every later GPA and ranking.
async fn update_course_handler(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    payload: Result<Json<CourseUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, course_id = %course_id, "Processing course update");
    let update = match parse_body(correlation_id, payload) {
        Ok(update) => update,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = state.gradebook().update_course(&course_id, update);
    respond(correlation_id, "update_course", started, StatusCode::OK, result)
}

async fn delete_course_handler(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state.gradebook().delete_course(&course_id);
    respond_empty(correlation_id, "delete_course", started, result)
}

async fn delete_courses_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let started = Instant::now();
    let result = state
        .gradebook()
        .delete_courses(&request.ids)
        .map(|deleted| BulkDeleteResponse { deleted });
    respond(correlation_id, "delete_courses", started, StatusCode::OK, result)
}

#[cfg(test)]
mod tests {
    use crate::api::{AppState, create_router};
    use crate::gradebook::tests::seeded_gradebook;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_course() {
        let router = create_router(AppState::new(seeded_gradebook()));
        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/courses",
                Some(serde_json::json!({"course_id": "MH00404", "name": "  Statistics ", "credits": 3})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .oneshot(request("GET", "/courses/MH00404", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["name"], "Statistics");
        assert_eq!(json["credits"], 3);
    }

    #[tokio::test]
    async fn test_invalid_course_is_rejected() {
        let router = create_router(AppState::new(seeded_gradebook()));
        let response = router
            .oneshot(request(
                "POST",
                "/courses",
                Some(serde_json::json!({"course_id": "mh1", "name": "Statistics", "credits": 11})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        let fields: Vec<&str> = json["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["course_id", "credits"]);
    }

    #[tokio::test]
    async fn test_duplicate_student_conflicts() {
        let router = create_router(AppState::new(seeded_gradebook()));
        let response = router
            .oneshot(request(
                "POST",
                "/students",
                Some(serde_json::json!({
                    "student_id": "SV00001",
                    "name": "Someone Else",
                    "class_name": "CNTT K22A",
                    "faculty": "CNTT",
                    "cohort_year": 2023
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_list_and_delete_classes() {
        let router = create_router(AppState::new(seeded_gradebook()));
        let response = router
            .clone()
            .oneshot(request("GET", "/classes", None))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["student_count"], 0);

        let response = router
            .clone()
            .oneshot(request("DELETE", "/classes/LOP02", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .oneshot(request("GET", "/classes/LOP02", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_student_is_404() {
        let router = create_router(AppState::new(seeded_gradebook()));
        let response = router
            .oneshot(request("DELETE", "/students/SV09999", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_students_filters_and_pages() {
        let router = create_router(AppState::new(seeded_gradebook()));
        let response = router
            .clone()
            .oneshot(request(
                "GET",
                "/students?faculty=CNTT&sort=name:-1&limit=1",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 2);
        assert_eq!(json["limit"], 1);
        assert_eq!(json["items"][0]["student_id"], "SV00002");

        let response = router
            .oneshot(request("GET", "/students?sort=password", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_patch_course_changes_credits() {
        let router = create_router(AppState::new(seeded_gradebook()));
        let response = router
            .clone()
            .oneshot(request(
                "PATCH",
                "/courses/MH00101",
                Some(serde_json::json!({"credits": 5})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["credits"], 5);
        assert_eq!(json["name"], "Calculus");

        let response = router
            .clone()
            .oneshot(request(
                "PATCH",
                "/courses/MH00101",
                Some(serde_json::json!({"credits": 0})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(request(
                "PATCH",
                "/courses/MH00999",
                Some(serde_json::json!({"name": "Nothing"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_student_updates_class_count() {
        let router = create_router(AppState::new(seeded_gradebook()));
        let response = router
            .clone()
            .oneshot(request(
                "PATCH",
                "/students/SV00003",
                Some(serde_json::json!({"class_name": "Class LOP02"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["class_name"], "CLASS LOP02");
        assert_eq!(json["faculty"], "Luật");

        let response = router
            .oneshot(request("GET", "/classes/LOP02", None))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["name"], "CLASS LOP02");
        assert_eq!(json["student_count"], 1);
    }

    #[tokio::test]
    async fn test_delete_many_students() {
        let router = create_router(AppState::new(seeded_gradebook()));
        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/students/delete-many",
                Some(serde_json::json!({"ids": ["SV00001", "SV00002", "SV09999"]})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["deleted"], 2);

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/students/delete-many",
                Some(serde_json::json!({"ids": []})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(request(
                "POST",
                "/courses/delete-many",
                Some(serde_json::json!({"ids": ["MH00999"]})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
