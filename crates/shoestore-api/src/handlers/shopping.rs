//! Basket and favorites of the calling user

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use shoestore_core::audit::AuditEvent;
use shoestore_core::domain::{BasketItem, FavoriteItem};

use crate::dto::{BasketRequest, FavoriteRequest, QuantityRequest};
use crate::error::ApiError;
use crate::extractors::{ensure_owner, CurrentUser};
use crate::response::{created, ApiResponse};
use crate::state::AppState;

fn check_quantity(quantity: i32) -> Result<(), ApiError> {
    if quantity < 1 {
        return Err(ApiError::BadRequest("Quantity must be at least 1".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Basket
// ---------------------------------------------------------------------------

/// GET /basket/{user_id}
pub async fn basket(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<ApiResponse<Vec<BasketItem>>, ApiError> {
    ensure_owner(&identity, user_id)?;
    Ok(ApiResponse::success(state.repos.shopping.basket_for_user(user_id).await?))
}

pub async fn add_to_basket(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<BasketRequest>,
) -> Result<Response, ApiError> {
    check_quantity(payload.quantity)?;
    let owner = payload.user_id.unwrap_or(identity.user_id);
    ensure_owner(&identity, owner)?;

    let entry = state
        .repos
        .shopping
        .add_to_basket(owner, payload.product_size_id, payload.quantity)
        .await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("CREATE")
            .entity("basket")
            .entity_id(entry.id)
            .details(format!(
                "Added size {} x{} to basket",
                entry.product_size_id, entry.quantity
            )),
    );
    Ok(created(entry))
}

pub async fn update_basket(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<QuantityRequest>,
) -> Result<StatusCode, ApiError> {
    check_quantity(payload.quantity)?;
    if !state.repos.shopping.update_basket_quantity(id, payload.quantity).await? {
        return Err(ApiError::not_found("Basket item"));
    }
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("UPDATE")
            .entity("basket")
            .entity_id(id)
            .details(format!("Basket quantity set to {}", payload.quantity)),
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_from_basket(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !state.repos.shopping.remove_from_basket(id).await? {
        return Err(ApiError::not_found("Basket item"));
    }
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("DELETE")
            .entity("basket")
            .entity_id(id)
            .details(format!("Removed basket item {}", id)),
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// GET /favorites/{user_id}
pub async fn favorites(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<ApiResponse<Vec<FavoriteItem>>, ApiError> {
    ensure_owner(&identity, user_id)?;
    Ok(ApiResponse::success(state.repos.shopping.favorites_for_user(user_id).await?))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<FavoriteRequest>,
) -> Result<Response, ApiError> {
    let owner = payload.user_id.unwrap_or(identity.user_id);
    ensure_owner(&identity, owner)?;

    let favorite = state
        .repos
        .shopping
        .add_favorite(owner, payload.product_size_id)
        .await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("CREATE")
            .entity("favorite")
            .entity_id(favorite.id)
            .details(format!("Added size {} to favorites", favorite.product_size_id)),
    );
    Ok(created(favorite))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !state.repos.shopping.remove_favorite(id).await? {
        return Err(ApiError::not_found("Favorite"));
    }
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("DELETE")
            .entity("favorite")
            .entity_id(id)
            .details(format!("Removed favorite {}", id)),
    );
    Ok(StatusCode::NO_CONTENT)
}
