//! Audit log browsing

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use shoestore_core::domain::AuditEntry;
use shoestore_shared::Paginated;

use crate::error::ApiError;
use crate::extractors::Paging;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn list_logs(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> Result<ApiResponse<Paginated<AuditEntry>>, ApiError> {
    let (entries, total) = state.repos.audit.list(page).await?;
    Ok(ApiResponse::success(Paginated::new(entries, page, total)))
}

pub async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<AuditEntry>, ApiError> {
    let entry = state
        .repos
        .audit
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Log entry"))?;
    Ok(ApiResponse::success(entry))
}

pub async fn delete_log(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    if !state.repos.audit.delete(id).await? {
        return Err(ApiError::not_found("Log entry"));
    }
    Ok(StatusCode::NO_CONTENT)
}
