//! Brands, categories, products and product sizes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use validator::Validate;

use shoestore_core::audit::AuditEvent;
use shoestore_core::domain::{Product, ProductInput, ProductSize, Taxon, TaxonInput, TaxonomyKind};
use shoestore_core::DomainError;
use shoestore_shared::Paginated;

use crate::dto::QuantityRequest;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, Paging};
use crate::response::{created, ApiResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Brands and categories
// ---------------------------------------------------------------------------

async fn list_taxa(state: &AppState, kind: TaxonomyKind) -> Result<ApiResponse<Vec<Taxon>>, ApiError> {
    Ok(ApiResponse::success(state.repos.taxonomies.list(kind).await?))
}

async fn get_taxon(state: &AppState, kind: TaxonomyKind, id: i32) -> Result<ApiResponse<Taxon>, ApiError> {
    let taxon = state
        .repos
        .taxonomies
        .find(kind, id)
        .await?
        .ok_or_else(|| ApiError::not_found(kind.label()))?;
    Ok(ApiResponse::success(taxon))
}

async fn create_taxon(
    state: &AppState,
    kind: TaxonomyKind,
    actor: i32,
    input: TaxonInput,
) -> Result<Response, ApiError> {
    input.validate().map_err(DomainError::from)?;
    let name = input.name.trim();

    let taxon = state.repos.taxonomies.create(kind, name).await?;
    state.audit.record(
        Some(actor),
        AuditEvent::new("CREATE")
            .entity(kind.as_str())
            .entity_id(taxon.id)
            .details(format!("Created {}: {}", kind.as_str(), taxon.name)),
    );
    Ok(created(taxon))
}

async fn update_taxon(
    state: &AppState,
    kind: TaxonomyKind,
    actor: i32,
    id: i32,
    input: TaxonInput,
) -> Result<ApiResponse<Taxon>, ApiError> {
    input.validate().map_err(DomainError::from)?;
    let name = input.name.trim();

    if !state.repos.taxonomies.update(kind, id, name).await? {
        return Err(ApiError::not_found(kind.label()));
    }
    state.audit.record(
        Some(actor),
        AuditEvent::new("UPDATE")
            .entity(kind.as_str())
            .entity_id(id)
            .details(format!("Updated {}: {}", kind.as_str(), name)),
    );
    Ok(ApiResponse::success(Taxon { id, name: name.to_string() }))
}

async fn delete_taxon(state: &AppState, kind: TaxonomyKind, actor: i32, id: i32) -> Result<StatusCode, ApiError> {
    if !state.repos.taxonomies.delete(kind, id).await? {
        return Err(ApiError::not_found(kind.label()));
    }
    state.audit.record(
        Some(actor),
        AuditEvent::new("DELETE")
            .entity(kind.as_str())
            .entity_id(id)
            .details(format!("Deleted {} with ID: {}", kind.as_str(), id)),
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_brands(State(state): State<AppState>) -> Result<ApiResponse<Vec<Taxon>>, ApiError> {
    list_taxa(&state, TaxonomyKind::Brand).await
}

pub async fn get_brand(State(state): State<AppState>, Path(id): Path<i32>) -> Result<ApiResponse<Taxon>, ApiError> {
    get_taxon(&state, TaxonomyKind::Brand, id).await
}

pub async fn create_brand(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(input): Json<TaxonInput>,
) -> Result<Response, ApiError> {
    create_taxon(&state, TaxonomyKind::Brand, identity.user_id, input).await
}

pub async fn update_brand(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<TaxonInput>,
) -> Result<ApiResponse<Taxon>, ApiError> {
    update_taxon(&state, TaxonomyKind::Brand, identity.user_id, id, input).await
}

pub async fn delete_brand(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    delete_taxon(&state, TaxonomyKind::Brand, identity.user_id, id).await
}

pub async fn list_categories(State(state): State<AppState>) -> Result<ApiResponse<Vec<Taxon>>, ApiError> {
    list_taxa(&state, TaxonomyKind::Category).await
}

pub async fn get_category(State(state): State<AppState>, Path(id): Path<i32>) -> Result<ApiResponse<Taxon>, ApiError> {
    get_taxon(&state, TaxonomyKind::Category, id).await
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(input): Json<TaxonInput>,
) -> Result<Response, ApiError> {
    create_taxon(&state, TaxonomyKind::Category, identity.user_id, input).await
}

pub async fn update_category(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<TaxonInput>,
) -> Result<ApiResponse<Taxon>, ApiError> {
    update_taxon(&state, TaxonomyKind::Category, identity.user_id, id, input).await
}

pub async fn delete_category(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    delete_taxon(&state, TaxonomyKind::Category, identity.user_id, id).await
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

pub async fn list_products(
    State(state): State<AppState>,
    Paging(page): Paging,
) -> Result<ApiResponse<Paginated<Product>>, ApiError> {
    let (products, total) = state.repos.products.list(page).await?;
    Ok(ApiResponse::success(Paginated::new(products, page, total)))
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<i32>) -> Result<ApiResponse<Product>, ApiError> {
    let product = state
        .repos
        .products
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    Ok(ApiResponse::success(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(input): Json<ProductInput>,
) -> Result<Response, ApiError> {
    input.validate().map_err(DomainError::from)?;

    let product = state.repos.products.create(&input).await?;
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("CREATE")
            .entity("product")
            .entity_id(product.id)
            .details(format!("Created product: {}", product.name)),
    );
    Ok(created(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> Result<ApiResponse<Product>, ApiError> {
    input.validate().map_err(DomainError::from)?;

    if !state.repos.products.update(id, &input).await? {
        return Err(ApiError::not_found("Product"));
    }
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("UPDATE")
            .entity("product")
            .entity_id(id)
            .details(format!("Updated product: {}", input.name)),
    );
    Ok(ApiResponse::success(Product {
        id,
        name: input.name,
        image_url: input.image_url,
        price: input.price,
        brand_id: input.brand_id,
        category_id: input.category_id,
    }))
}

/// Removes the product with its sizes, reviews and every basket, favorite
/// and order line pointing at those sizes, in one transaction.
pub async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !state.repos.products.delete_cascade(id).await? {
        return Err(ApiError::not_found("Product"));
    }
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("DELETE")
            .entity("product")
            .entity_id(id)
            .details(format!("Deleted product with ID: {}", id)),
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Product sizes
// ---------------------------------------------------------------------------

pub async fn list_sizes(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<ApiResponse<Vec<ProductSize>>, ApiError> {
    let sizes = state.repos.products.sizes(product_id).await?;
    if sizes.is_empty() {
        return Err(ApiError::NotFound("No sizes found for this product".into()));
    }
    Ok(ApiResponse::success(sizes))
}

pub async fn update_size(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<QuantityRequest>,
) -> Result<StatusCode, ApiError> {
    if payload.quantity < 0 {
        return Err(ApiError::BadRequest("Quantity cannot be negative".into()));
    }
    if !state.repos.products.update_size_quantity(id, payload.quantity).await? {
        return Err(ApiError::not_found("Product size"));
    }
    state.audit.record(
        Some(identity.user_id),
        AuditEvent::new("UPDATE")
            .entity("product_size")
            .entity_id(id)
            .details(format!("Set size stock to {}", payload.quantity)),
    );
    Ok(StatusCode::NO_CONTENT)
}
