use axum::{
    extract::{FromRef, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::state::AppState;

use super::session::{Claims, SessionKeys};

/// Redirects anonymous requests for protected page prefixes to the login
/// path. Everything else passes through unchanged. This proves only that
/// some valid session exists; per-operation role checks live with the
/// handlers.
pub async fn route_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path();

    if is_protected(&state.config.protected_prefixes, path)
        && read_session(&state, req.headers()).is_none()
    {
        debug!(%path, "anonymous request to protected path");
        return Redirect::temporary(&state.config.login_path).into_response();
    }

    next.run(req).await
}

fn is_protected(prefixes: &[String], path: &str) -> bool {
    prefixes
        .iter()
        .any(|p| path == p || path.starts_with(&format!("{p}/")))
}

fn read_session(state: &AppState, headers: &HeaderMap) -> Option<Claims> {
    let jar = CookieJar::from_headers(headers);
    let token = jar.get(&state.config.session.cookie_name)?.value().to_string();
    SessionKeys::from_ref(state).verify(&token).ok()
}
