//! Orders and order lines

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use shoestore_core::audit::AuditEvent;
use shoestore_core::domain::{Order, OrderLine, OrderProduct};
use shoestore_shared::Paginated;

use crate::dto::{OrderProductRequest, OrderRequest, QuantityRequest};
use crate::error::ApiError;
use crate::extractors::{ensure_owner, CurrentUser, Paging};
use crate::response::{created, ApiResponse};
use crate::state::AppState;

/// GET /orders
pub async fn list_orders(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> Result<ApiResponse<Paginated<Order>>, ApiError> {
    let (orders, total) = state.repos.orders.list(page).await?;
    Ok(ApiResponse::success(Paginated::new(orders, page, total)))
}

/// GET /orders/user/{user_id}
pub async fn orders_for_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(user_id): Path<i32>,
    Paging(page): Paging,
) -> Result<ApiResponse<Paginated<Order>>, ApiError> {
    ensure_owner(&identity, user_id)?;
    let (orders, total) = state.repos.orders.list_for_user(user_id, page).await?;
    Ok(ApiResponse::success(Paginated::new(orders, page, total)))
}

pub async fn create_order(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<OrderRequest>,
) -> Result<Response, ApiError> {
    let owner = payload.user_id.unwrap_or(identity.user_id);
    ensure_owner(&identity, owner)?;

    let order = state.orders.create(owner, payload.order_date).await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("CREATE")
            .entity("order")
            .entity_id(order.id)
            .details(format!("Created order for user {}", owner)),
    );
    Ok(created(order))
}

/// POST /order-products
///
/// The first line of an order schedules its confirmation mail.
pub async fn add_order_line(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<OrderProductRequest>,
) -> Result<Response, ApiError> {
    let order = state
        .repos
        .orders
        .find(payload.order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;
    ensure_owner(&identity, order.user_id)?;

    let line = state
        .orders
        .add_line(payload.order_id, payload.product_size_id, payload.quantity)
        .await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("CREATE")
            .entity("order_product")
            .entity_id(line.id)
            .details(format!(
                "Added size {} x{} to order {}",
                line.product_size_id, line.quantity, line.order_id
            )),
    );
    Ok(created(line))
}

/// GET /order-products
pub async fn list_order_lines(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<OrderProduct>>, ApiError> {
    Ok(ApiResponse::success(state.repos.orders.list_lines().await?))
}

/// GET /order-products/order/{order_id}
pub async fn lines_for_order(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(order_id): Path<i32>,
) -> Result<ApiResponse<Vec<OrderLine>>, ApiError> {
    let order = state
        .repos
        .orders
        .find(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;
    ensure_owner(&identity, order.user_id)?;

    Ok(ApiResponse::success(state.repos.orders.lines_for_order(order_id).await?))
}

/// PUT /order-products/{id}
pub async fn update_order_line(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<QuantityRequest>,
) -> Result<StatusCode, ApiError> {
    if payload.quantity < 1 {
        return Err(ApiError::BadRequest("Quantity must be at least 1".into()));
    }
    if !state.repos.orders.update_line_quantity(id, payload.quantity).await? {
        return Err(ApiError::not_found("Order product"));
    }
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("UPDATE")
            .entity("order_product")
            .entity_id(id)
            .details(format!("Order line quantity set to {}", payload.quantity)),
    );
    Ok(StatusCode::NO_CONTENT)
}
