//! Admin user management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use shoestore_core::audit::AuditEvent;
use shoestore_core::domain::{NewUser, User, UserChanges};
use shoestore_shared::Paginated;

use crate::error::ApiError;
use crate::extractors::{CurrentUser, Paging};
use crate::response::{created, ApiResponse};
use crate::state::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<NewUser>,
) -> Result<Response, ApiError> {
    let user = state.users.create(payload).await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("CREATE")
            .entity("user")
            .entity_id(user.id)
            .details(format!("Created user: {}", user.full_name)),
    );
    Ok(created(user))
}

pub async fn list_users(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> Result<ApiResponse<Paginated<User>>, ApiError> {
    let (users, total) = state.repos.users.list(page).await?;
    Ok(ApiResponse::success(Paginated::new(users, page, total)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<User>, ApiError> {
    let user = state
        .repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(ApiResponse::success(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<UserChanges>,
) -> Result<ApiResponse<User>, ApiError> {
    let user = state.users.update(id, payload).await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("UPDATE")
            .entity("user")
            .entity_id(id)
            .details(format!("Updated user: {}", user.full_name)),
    );
    Ok(ApiResponse::success(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(id).await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("DELETE")
            .entity("user")
            .entity_id(id)
            .details(format!("Deleted user with ID: {}", id)),
    );
    Ok(StatusCode::NO_CONTENT)
}
