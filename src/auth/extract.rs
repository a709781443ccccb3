use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{error::ApiError, state::AppState, users::repo::Account};

use super::session::{Claims, SessionKeys};

/// Claims recovered from the session cookie. Proves a prior login only; any
/// authorization-sensitive decision re-reads the account instead.
pub struct Session(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&state.config.session.cookie_name)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::Unauthorized)?;

        let keys = SessionKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|err| {
            debug!(error = %err, "session cookie rejected");
            ApiError::Unauthorized
        })?;

        Ok(Session(claims))
    }
}

/// Session plus a fresh storage read. Accounts deleted or deactivated after
/// the token was issued read as unauthenticated here.
pub struct CurrentUser(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Session(claims) = Session::from_request_parts(parts, state).await?;

        let account = Account::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if !account.is_active {
            debug!(user_id = %account.id, "session for deactivated account");
            return Err(ApiError::Unauthorized);
        }

        Ok(CurrentUser(account))
    }
}

impl CurrentUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.0.role == crate::users::repo::Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}
