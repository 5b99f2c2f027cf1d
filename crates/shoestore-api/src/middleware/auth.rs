//! Token authentication and the per-route role gate

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use shoestore_security::{AuthError, Identity, Role};

use crate::error::ApiError;
use crate::state::AppState;

/// Reachable by anyone with any method
const OPEN_PATHS: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/support",
    "/password/reset",
    "/password/reset/confirm",
    "/health",
];

const OPEN_PREFIXES: &[&str] = &["/swagger/"];

/// Catalog reads. Mutations on the same paths need a token.
const READ_ONLY_PREFIXES: &[&str] = &["/products", "/brands", "/categories", "/reviews/product/"];

fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// Whether a request may proceed without a session token.
pub fn is_public(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    if OPEN_PATHS.contains(&path) || OPEN_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    (method == Method::GET || method == Method::HEAD)
        && READ_ONLY_PREFIXES.iter().any(|p| matches_prefix(path, p))
}

/// Validates the bearer token and attaches the [`Identity`] to the request.
/// Public requests pass through untouched and never carry an identity.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_public(request.method(), request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::Invalid("non-ascii header".into())))
        .transpose()?;

    let identity = state.tokens.validate_header(header).map_err(|e| {
        warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        e
    })?;

    debug!("Authenticated user {} as {}", identity.user_id, identity.role);
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Role gate, installed per route group with `route_layer`.
/// A missing identity is reported as 401, never a panic.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .copied()
        .ok_or(AuthError::Missing)?;

    identity.authorize(required).map_err(|e| {
        warn!(
            "User {} ({}) denied {} {}",
            identity.user_id,
            identity.role,
            request.method(),
            request.uri().path()
        );
        e
    })?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public(&Method::POST, "/login"));
        assert!(is_public(&Method::POST, "/password/reset/confirm"));
        assert!(is_public(&Method::GET, "/swagger/index.html"));
        assert!(is_public(&Method::GET, "/products"));
        assert!(is_public(&Method::GET, "/products/7/sizes"));
        assert!(is_public(&Method::GET, "/brands/2"));
        assert!(is_public(&Method::GET, "/reviews/product/3"));
        assert!(is_public(&Method::OPTIONS, "/admin/users"));
    }

    #[test]
    fn test_protected_paths() {
        assert!(!is_public(&Method::POST, "/products"));
        assert!(!is_public(&Method::DELETE, "/brands/2"));
        assert!(!is_public(&Method::GET, "/productsizes/1"));
        assert!(!is_public(&Method::GET, "/reviews/user/3"));
        assert!(!is_public(&Method::GET, "/admin/products"));
        assert!(!is_public(&Method::GET, "/basket/1"));
        assert!(!is_public(&Method::POST, "/password/change"));
    }
}
