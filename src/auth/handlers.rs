use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    users::repo::Account,
};

use super::{
    dto::{Identity, LoginRequest, RegisterRequest, RegisterResponse, SessionResponse},
    extract::{CurrentUser, Session},
    password, service,
    session::{session_cookie, SessionKeys},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
        .route("/dashboard", get(dashboard))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    // Normalize first so validation sees the same string the lookup will.
    let email = service::normalize_email(&payload.email);
    service::validate_registration(
        &payload.name,
        &email,
        &payload.password,
        &payload.password_confirm,
    )?;

    if Account::find_by_email(&state.db, &email).await?.is_some() {
        warn!(%email, "registration for existing email");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = password::hash(payload.password).await?;

    // A racing duplicate insert is caught by the unique index and maps to
    // the same rejection as the pre-check.
    let account = Account::create(
        &state.db,
        payload.name.trim(),
        &email,
        &hash,
        payload.role,
        payload.is_active,
    )
    .await?;

    info!(user_id = %account.id, email = %account.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            user: Identity {
                id: account.id,
                name: account.name,
                email: account.email,
            },
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Identity>), ApiError> {
    let identity = service::verify_credentials(&state.db, &payload.email, &payload.password).await?;

    let token = SessionKeys::from_ref(&state).issue(&identity)?;
    let jar = jar.add(session_cookie(&state.config.session, token));

    info!(user_id = %identity.id, "user logged in");
    Ok((jar, Json(identity)))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.remove(
        Cookie::build((state.config.session.cookie_name.clone(), ""))
            .path("/")
            .build(),
    );
    (jar, Json(serde_json::json!({ "message": "Signed out" })))
}

/// Fresh account summary; role and active flag come from storage, so a
/// stale token cannot report revoked privileges.
#[instrument(skip_all)]
pub async fn session(CurrentUser(account): CurrentUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        id: account.id,
        name: account.name,
        email: account.email,
        role: account.role,
        is_active: account.is_active,
    })
}

/// Identity probe behind the guarded page root.
pub async fn dashboard(Session(claims): Session) -> Json<Identity> {
    Json(claims.identity())
}
