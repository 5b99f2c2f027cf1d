//! Authentication HTTP handlers (login, register)

use axum::{extract::State, response::Response, Json};
use tracing::info;

use shoestore_core::audit::AuditEvent;
use shoestore_core::domain::NewUser;
use shoestore_core::services::LoginResult;

use crate::dto::LoginRequest;
use crate::error::ApiError;
use crate::extractors::MaybeUser;
use crate::response::{created, ApiResponse};
use crate::state::AppState;

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResult>, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    }

    let result = state.auth.login(payload.email.trim(), &payload.password).await?;
    Ok(ApiResponse::success(result))
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    caller: MaybeUser,
    Json(payload): Json<NewUser>,
) -> Result<Response, ApiError> {
    let user = state.auth.register(payload).await?;
    info!("Registered user {}", user.id);

    state.audit.record(
        caller.user_id(),
        AuditEvent::new("REGISTER")
            .entity("user")
            .entity_id(user.id)
            .details(format!("Registered user: {}", user.full_name)),
    );
    Ok(created(user))
}
