use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod extract;
pub mod guard;
pub mod handlers;
pub mod password;
pub mod service;
pub mod session;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
