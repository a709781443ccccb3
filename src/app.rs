use std::net::SocketAddr;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, products, state::AppState, users};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(products::router())
        .route("/healthz", get(|| async { "ok" }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::guard::route_guard,
        ))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        extract::FromRef,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::{dto::Identity, session::SessionKeys};

    use super::*;

    fn issued_cookie(state: &AppState) -> String {
        let keys = SessionKeys::from_ref(state);
        let token = keys
            .issue(&Identity {
                id: Uuid::new_v4(),
                name: "Alice".into(),
                email: "a@x.com".into(),
            })
            .expect("issue");
        format!("session={token}")
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn guard_redirects_anonymous_protected_requests() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(get("/dashboard", None)).await.expect("oneshot");
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn guard_allows_valid_session_on_protected_path() {
        let state = AppState::fake();
        let cookie = issued_cookie(&state);
        let app = build_app(state);
        let res = app
            .oneshot(get("/dashboard", Some(&cookie)))
            .await
            .expect("oneshot");
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn guard_redirects_forged_cookie() {
        let state = AppState::fake();
        let mut forged = SessionKeys::from_ref(&state);
        forged.encoding = jsonwebtoken::EncodingKey::from_secret(b"other-secret");
        let token = forged
            .issue(&Identity {
                id: Uuid::new_v4(),
                name: "Mallory".into(),
                email: "m@x.com".into(),
            })
            .expect("issue");
        let cookie = format!("session={token}");

        let app = build_app(state);
        let res = app
            .oneshot(get("/dashboard", Some(&cookie)))
            .await
            .expect("oneshot");
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn guard_ignores_unprotected_paths() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(get("/healthz", None)).await.expect("oneshot");
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn session_endpoint_requires_a_cookie() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(get("/api/auth/session", None))
            .await
            .expect("oneshot");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn products_api_answers_401_not_a_redirect() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(get("/api/products", None))
            .await
            .expect("oneshot");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_clears_the_session_cookie() {
        let state = AppState::fake();
        let cookie = issued_cookie(&state);
        let app = build_app(state);
        let req = Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .expect("request");
        let res = app.oneshot(req).await.expect("oneshot");
        assert_eq!(res.status(), StatusCode::OK);
        let set_cookie = res.headers()[header::SET_COOKIE]
            .to_str()
            .expect("set-cookie");
        assert!(set_cookie.starts_with("session="));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
