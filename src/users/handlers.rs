use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{extract::CurrentUser, password, service},
    error::ApiError,
    pagination::{ListQuery, Page},
    state::AppState,
};

use super::{
    dto::{CreateUserRequest, UpdateUserRequest},
    repo::Account,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/:id", axum::routing::put(update_user).delete(delete_user))
}

#[instrument(skip(state, current))]
pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Account>>, ApiError> {
    current.require_admin()?;

    let pattern = query.like_pattern();
    let data = Account::list(&state.db, &pattern, query.limit(), query.offset()).await?;
    let total = Account::count(&state.db, &pattern).await?;
    Ok(Json(Page::new(data, total, &query)))
}

#[instrument(skip(state, current, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    current.require_admin()?;

    let email = service::normalize_email(&payload.email);
    service::validate_registration(
        &payload.name,
        &email,
        &payload.password,
        &payload.password_confirm,
    )?;

    if Account::find_by_email(&state.db, &email).await?.is_some() {
        warn!(%email, "create_user for existing email");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = password::hash(payload.password).await?;
    let account = Account::create(
        &state.db,
        payload.name.trim(),
        &email,
        &hash,
        payload.role,
        payload.is_active,
    )
    .await?;

    info!(user_id = %account.id, by = %current.0.id, "user created");
    Ok((StatusCode::CREATED, Json(account)))
}

#[instrument(skip(state, current, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<Account>, ApiError> {
    current.require_admin()?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    let email = service::normalize_email(&payload.email);
    if !service::is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }

    let account = Account::update(
        &state.db,
        id,
        payload.name.trim(),
        &email,
        payload.role,
        payload.is_active,
    )
    .await?
    .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = %account.id, by = %current.0.id, "user updated");
    Ok(Json(account))
}

#[instrument(skip(state, current))]
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    current.require_admin()?;

    if !Account::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User"));
    }

    info!(user_id = %id, by = %current.0.id, "user deleted");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "User deleted successfully"
    })))
}
