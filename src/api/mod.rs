//! API handlers for the lending REST endpoints

pub mod books;
pub mod borrowings;
pub mod extract;
pub mod health;
pub mod members;
pub mod openapi;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::AppState;

/// Outcome of a delete; a missing record is reported here rather than as an error
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub(crate) fn reply(deleted: bool, entity: &str) -> (StatusCode, Json<Self>) {
        if deleted {
            (
                StatusCode::OK,
                Json(Self {
                    success: true,
                    message: format!("{} deleted", entity),
                }),
            )
        } else {
            (
                StatusCode::NOT_FOUND,
                Json(Self {
                    success: false,
                    message: format!("{} not found", entity),
                }),
            )
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        // Members
        .route("/members", get(members::list_members).post(members::create_member))
        .route(
            "/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route("/members/:id/borrowings", get(members::list_member_borrowings))
        // Borrowings
        .route("/borrowings", post(borrowings::borrow_book))
        .route("/borrowings/:id", get(borrowings::get_borrowing))
        .route("/borrowings/:id/return", post(borrowings::return_book))
        // Gateway-style aliases
        .route("/borrow", post(borrowings::borrow_book))
        .route("/return", post(borrowings::return_book_by_body))
        .route("/member/:id/borrowed", get(members::list_member_borrowings))
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_v1)
        .route("/health", get(health::health_check))
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
