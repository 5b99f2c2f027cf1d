//! Request extractors for the authenticated identity and pagination

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use shoestore_security::{AuthError, Identity};
use shoestore_shared::{PageQuery, Pagination};

use crate::error::ApiError;

/// Identity attached by the authentication middleware. Rejects with 401 when absent.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(CurrentUser)
            .ok_or_else(|| AuthError::Missing.into())
    }
}

/// Identity when present. Public routes never carry one.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<Identity>);

impl MaybeUser {
    pub fn user_id(&self) -> Option<i32> {
        self.0.map(|i| i.user_id)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Identity>().copied()))
    }
}

/// `?page=&limit=` with lenient parsing: bad values fall back to defaults.
#[derive(Debug, Clone, Copy)]
pub struct Paging(pub Pagination);

impl<S: Send + Sync> FromRequestParts<S> for Paging {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map(|Query(q)| q)
            .unwrap_or_default();
        Ok(Paging(query.resolve()))
    }
}

/// Rejects access to another user's self-service data unless the caller is admin.
pub fn ensure_owner(identity: &Identity, owner_id: i32) -> Result<(), ApiError> {
    if identity.acts_for(owner_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Access to another user's data is not allowed".into()))
    }
}
