//! Product reviews

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use shoestore_core::audit::AuditEvent;
use shoestore_core::domain::{Review, ReviewInput};
use shoestore_shared::Paginated;

use crate::dto::ReviewRequest;
use crate::error::ApiError;
use crate::extractors::{ensure_owner, CurrentUser, Paging};
use crate::response::{created, ApiResponse};
use crate::state::AppState;

/// GET /reviews/product/{id}
pub async fn for_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Paging(page): Paging,
) -> Result<ApiResponse<Paginated<Review>>, ApiError> {
    let (reviews, total) = state.repos.reviews.for_product(product_id, page).await?;
    Ok(ApiResponse::success(Paginated::new(reviews, page, total)))
}

/// GET /reviews/user/{id}
pub async fn for_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(user_id): Path<i32>,
    Paging(page): Paging,
) -> Result<ApiResponse<Paginated<Review>>, ApiError> {
    ensure_owner(&identity, user_id)?;
    let (reviews, total) = state.repos.reviews.for_user(user_id, page).await?;
    Ok(ApiResponse::success(Paginated::new(reviews, page, total)))
}

pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<ReviewRequest>,
) -> Result<Response, ApiError> {
    let input = ReviewInput { rating: payload.rating, comment: payload.comment };
    let review = state
        .reviews
        .create(identity.user_id, payload.product_id, input)
        .await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("CREATE")
            .entity("review")
            .entity_id(review.id)
            .details(format!("Reviewed product {} with {} stars", review.product_id, review.rating)),
    );
    Ok(created(review))
}

/// PUT /reviews/{id}, author only
pub async fn update_own_review(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<ReviewInput>,
) -> Result<ApiResponse<Review>, ApiError> {
    let existing = state.reviews.find(id).await?;
    ensure_owner(&identity, existing.user_id)?;
    update(&state, identity.user_id, id, input).await
}

/// DELETE /reviews/{id}, author only
pub async fn delete_own_review(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let existing = state.reviews.find(id).await?;
    ensure_owner(&identity, existing.user_id)?;
    delete(&state, identity.user_id, id).await
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

/// GET /admin/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> Result<ApiResponse<Paginated<Review>>, ApiError> {
    let (reviews, total) = state.repos.reviews.list(page).await?;
    Ok(ApiResponse::success(Paginated::new(reviews, page, total)))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<Review>, ApiError> {
    Ok(ApiResponse::success(state.reviews.find(id).await?))
}

pub async fn update_review(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<ReviewInput>,
) -> Result<ApiResponse<Review>, ApiError> {
    update(&state, identity.user_id, id, input).await
}

pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    delete(&state, identity.user_id, id).await
}

async fn update(state: &AppState, actor: i32, id: i32, input: ReviewInput) -> Result<ApiResponse<Review>, ApiError> {
    let review = state.reviews.update(id, input).await?;
    state.audit.record(
        Some(actor),
        AuditEvent::new("UPDATE")
            .entity("review")
            .entity_id(id)
            .details(format!("Updated review, rating {}", review.rating)),
    );
    Ok(ApiResponse::success(review))
}

async fn delete(state: &AppState, actor: i32, id: i32) -> Result<StatusCode, ApiError> {
    state.reviews.delete(id).await?;
    state.audit.record(
        Some(actor),
        AuditEvent::new("DELETE")
            .entity("review")
            .entity_id(id)
            .details(format!("Deleted review with ID: {}", id)),
    );
    Ok(StatusCode::NO_CONTENT)
}
