//! Member management endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{
        borrowing::Borrowing,
        member::{Member, MemberRequest},
    },
};

use super::{
    extract::{ApiJson, ApiPath},
    DeleteResponse,
};

/// List all members (no pagination)
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    responses(
        (status = 200, description = "All members ordered by id", body = Vec<Member>)
    )
)]
pub async fn list_members(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Member>>> {
    let members = state.services.members.list().await?;
    Ok(Json(members))
}

/// Get member details by ID
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member details", body = Member),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.get(id).await?;
    Ok(Json(member))
}

/// Create a new member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = MemberRequest,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or phone already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    ApiJson(request): ApiJson<MemberRequest>,
) -> AppResult<(StatusCode, Json<Member>)> {
    let params = request.into_params()?;
    let created = state.services.members.create(params).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing member
#[utoipa::path(
    put,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    request_body = MemberRequest,
    responses(
        (status = 200, description = "Member updated", body = Member),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or phone already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<MemberRequest>,
) -> AppResult<Json<Member>> {
    let params = request.into_params()?;
    let updated = state.services.members.update(id, params).await?;
    Ok(Json(updated))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member deleted", body = DeleteResponse),
        (status = 404, description = "Member not found", body = DeleteResponse),
        (status = 409, description = "Member has active borrowings", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<DeleteResponse>)> {
    let deleted = state.services.members.delete(id).await?;
    Ok(DeleteResponse::reply(deleted, "Member"))
}

/// Books a member currently has out
#[utoipa::path(
    get,
    path = "/members/{id}/borrowings",
    tag = "borrowings",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Active borrowings, oldest first", body = Vec<Borrowing>)
    )
)]
pub async fn list_member_borrowings(
    State(state): State<crate::AppState>,
    ApiPath(member_id): ApiPath<i64>,
) -> AppResult<Json<Vec<Borrowing>>> {
    let borrowings = state.services.lending.list_active_by_member(member_id).await?;
    Ok(Json(borrowings))
}
