//! Storefront support form

use axum::{extract::State, Json};

use shoestore_core::audit::AuditEvent;
use shoestore_core::domain::SupportMessage;

use crate::dto::SupportResponse;
use crate::error::ApiError;
use crate::extractors::MaybeUser;
use crate::state::AppState;

/// POST /support
///
/// A failed send is reported in the body with status `error`, not as an HTTP error.
pub async fn submit(
    State(state): State<AppState>,
    caller: MaybeUser,
    Json(payload): Json<SupportMessage>,
) -> Result<Json<SupportResponse>, ApiError> {
    let sent = state.support.submit(&payload).await?;

    state.audit.record(
        caller.user_id(),
        AuditEvent::new("SEND_SUPPORT")
            .entity("support")
            .details(format!("Support request from {}", payload.name.trim())),
    );

    let response = if sent {
        SupportResponse { message: "Your message has been sent".into(), status: "success" }
    } else {
        SupportResponse { message: "Failed to send message, please try again later".into(), status: "error" }
    };
    Ok(Json(response))
}
