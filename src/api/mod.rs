//! HTTP API module for the grade engine.
//!
//! This module provides the REST endpoints for grade computation, enrollment
//! records, catalog maintenance, statistics and the chatbot lookup.

mod catalog;
mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BatchUpdateItem, BulkDeleteRequest, ChatbotRequest, ComputeRequest, GpaQuery, ImportRequest,
    ListEnrollmentsQuery, ListStudentsQuery,
};
pub use response::{
    ApiError, ApiErrorResponse, BulkDeleteResponse, ChatbotResponse, ComputeResponse,
    GpaResponse,
};
pub use state::AppState;
