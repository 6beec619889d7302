//! Borrowing endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::borrowing::{BorrowRequest, Borrowing, ReturnRequest},
};

use super::extract::{ApiJson, ApiPath};

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrowings",
    tag = "borrowings",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = Borrowing),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book or member not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book already borrowed", body = crate::error::ErrorResponse),
        (status = 503, description = "No database connection available", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    ApiJson(request): ApiJson<BorrowRequest>,
) -> AppResult<(StatusCode, Json<Borrowing>)> {
    let params = request.into_params()?;
    let borrowing = state.services.lending.borrow(params).await?;
    Ok((StatusCode::CREATED, Json(borrowing)))
}

/// Get borrowing details by ID
#[utoipa::path(
    get,
    path = "/borrowings/{id}",
    tag = "borrowings",
    params(
        ("id" = i64, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Borrowing details", body = Borrowing),
        (status = 404, description = "Borrowing not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_borrowing(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Borrowing>> {
    let borrowing = state.services.lending.get(id).await?;
    Ok(Json(borrowing))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrowings/{id}/return",
    tag = "borrowings",
    params(
        ("id" = i64, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = Borrowing),
        (status = 404, description = "Borrowing not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Borrowing>> {
    let borrowing = state.services.lending.return_book(id).await?;
    Ok(Json(borrowing))
}

/// Return a borrowed book, borrowing id in the body
#[utoipa::path(
    post,
    path = "/return",
    tag = "borrowings",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = Borrowing),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Borrowing not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book_by_body(
    State(state): State<crate::AppState>,
    ApiJson(request): ApiJson<ReturnRequest>,
) -> AppResult<Json<Borrowing>> {
    validator::Validate::validate(&request)?;
    let borrowing = state.services.lending.return_book(request.borrowing_id).await?;
    Ok(Json(borrowing))
}
