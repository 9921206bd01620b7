//! Deep-link signature verification: `GET /api/verify-link`.
//!
//! Lets the stateless front-end ask the backend whether a presented
//! `pos`/`user`/`sig` triple was issued here. A bad signature is a
//! normal answer, not an error, so the endpoint always returns 200 with
//! a boolean.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters mirroring the deep-link query string.
#[derive(Debug, Deserialize)]
pub struct VerifyLinkQuery {
    pub pos: String,
    pub user: String,
    pub sig: String,
}

/// GET /api/verify-link?pos=..&user=..&sig=..
pub async fn verify_link(
    State(state): State<AppState>,
    Query(query): Query<VerifyLinkQuery>,
) -> Json<serde_json::Value> {
    let valid = state.deeplink.verify(&query.pos, &query.user, &query.sig);

    if !valid {
        tracing::warn!(pos = %query.pos, user = %query.user, "Deep-link verification failed");
    }

    Json(serde_json::json!({ "valid": valid }))
}

/// Routes mounted at `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/verify-link", get(verify_link))
}
