//! Password reset (anonymous) and password change (signed in) flows

use axum::{extract::State, Json};

use shoestore_core::audit::AuditEvent;

use crate::dto::{ChangeConfirmRequest, ChangeRequest, ResetConfirmRequest, ResetRequest};
use crate::error::ApiError;
use crate::extractors::{CurrentUser, MaybeUser};
use crate::response::Ack;
use crate::state::AppState;

fn required(value: &str, name: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", name)));
    }
    Ok(())
}

/// POST /password/reset
pub async fn request_reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<Ack>, ApiError> {
    required(&payload.email, "Email")?;
    state.passwords.request_reset(payload.email.trim()).await?;
    Ok(Json(Ack::ok("Reset code sent to email")))
}

/// POST /password/reset/confirm
pub async fn confirm_reset(
    State(state): State<AppState>,
    caller: MaybeUser,
    Json(payload): Json<ResetConfirmRequest>,
) -> Result<Json<Ack>, ApiError> {
    required(&payload.email, "Email")?;
    required(&payload.code, "Code")?;

    let email = payload.email.trim();
    state
        .passwords
        .confirm_reset(email, payload.code.trim(), &payload.password)
        .await?;

    state.audit.record(
        caller.user_id(),
        AuditEvent::new("PASSWORD_RESET")
            .entity("user")
            .details(format!("Password reset for {}", email)),
    );
    Ok(Json(Ack::ok("Password updated successfully")))
}

/// POST /password/change
pub async fn request_change(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<ChangeRequest>,
) -> Result<Json<Ack>, ApiError> {
    if payload.old_password.is_empty() || payload.new_password.is_empty() {
        return Err(ApiError::BadRequest("Old and new password are required".into()));
    }
    state
        .passwords
        .request_change(identity.user_id, &payload.old_password, &payload.new_password)
        .await?;
    Ok(Json(Ack::ok("Confirmation code sent to email")))
}

/// POST /password/change/confirm
pub async fn confirm_change(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<ChangeConfirmRequest>,
) -> Result<Json<Ack>, ApiError> {
    required(&payload.code, "Code")?;
    let email = state
        .passwords
        .confirm_change(identity.user_id, payload.code.trim())
        .await?;

    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("PASSWORD_CHANGE")
            .entity("user")
            .entity_id(identity.user_id)
            .details(format!("Password changed for {}", email)),
    );
    Ok(Json(Ack::ok("Password changed successfully")))
}
