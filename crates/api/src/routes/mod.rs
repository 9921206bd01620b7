pub mod health;
pub mod links;
pub mod notify;

use axum::Router;

use crate::state::AppState;

/// Routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(notify::router()).merge(links::router())
}
