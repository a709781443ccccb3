use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extract::CurrentUser,
    error::ApiError,
    pagination::{ListQuery, Page},
    state::AppState,
};

use super::{
    dto::{validate_fields, CreateProductRequest, UpdateProductRequest},
    repo::Product,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            axum::routing::put(update_product).delete(delete_product),
        )
}

#[instrument(skip(state, _current))]
pub async fn list_products(
    State(state): State<AppState>,
    _current: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Product>>, ApiError> {
    let pattern = query.like_pattern();
    let data = Product::list(&state.db, &pattern, query.limit(), query.offset()).await?;
    let total = Product::count(&state.db, &pattern).await?;
    Ok(Json(Page::new(data, total, &query)))
}

#[instrument(skip(state, current, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_fields(&payload.name, payload.price)?;

    let product = Product::create(
        &state.db,
        payload.name.trim(),
        &payload.description,
        payload.price,
        payload.image_url.as_deref(),
    )
    .await?;

    info!(product_id = %product.id, by = %current.0.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, current, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    validate_fields(&payload.name, payload.price)?;

    let product = Product::update(
        &state.db,
        id,
        payload.name.trim(),
        &payload.description,
        payload.price,
        payload.image_url.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("Product"))?;

    info!(product_id = %product.id, by = %current.0.id, "product updated");
    Ok(Json(product))
}

#[instrument(skip(state, current))]
pub async fn delete_product(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !Product::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Product"));
    }

    info!(product_id = %id, by = %current.0.id, "product deleted");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Product deleted successfully"
    })))
}
