//! Coarse audit of every successful mutating request

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use shoestore_core::audit::AuditEvent;
use shoestore_security::Identity;

use crate::state::AppState;

/// Records `CREATE`/`UPDATE`/`DELETE` entries derived from the method and path
/// once the handler has succeeded. Runs alongside the per-handler entries.
pub async fn audit_mutations(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.settings.transport_audit {
        return next.run(request).await;
    }

    let started_at = state.clock.now();
    let actor = request.extensions().get::<Identity>().map(|i| i.user_id);
    let event = AuditEvent::from_request(request.method().as_str(), request.uri().path());

    let response = next.run(request).await;

    if let (Some(actor), Some(event)) = (actor, event) {
        if response.status().is_success() {
            state.audit.record_at(Some(actor), event, started_at);
        }
    }
    response
}
