use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod repo_types;
pub mod use_case;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::login_routes())
}
