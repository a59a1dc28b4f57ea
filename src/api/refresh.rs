use std::sync::Arc;

use axum::{Extension, Json, extract::Query, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{api::AppState, warning};

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    pub refresh_token: Option<String>,
}

/// `GET /api/refresh_token?refresh_token=..`, passes the provider's token
/// response through unchanged.
pub async fn refresh_token(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<RefreshParams>,
) -> (StatusCode, Json<Value>) {
    let Some(refresh_token) = params.refresh_token.filter(|t| !t.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "refresh_token is required" })),
        );
    };

    match state.oauth.refresh(&state.client, &refresh_token).await {
        Ok((status, body)) => (status, Json(body)),
        Err(e) => {
            warning!("Token refresh failed: {}", e);
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() })))
        }
    }
}
