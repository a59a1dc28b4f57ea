use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    api::AppState,
    completion::{UpstreamError, request_upstream},
    types::CompletionRequest,
    warning,
};

/// `POST /api/completion` with `{prompt}`.
///
/// Answers `{result: choices}`. Upstream failures keep the upstream status
/// and wrap its body as `{error}`; transport failures become 500.
pub async fn completion(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<CompletionRequest>,
) -> (StatusCode, Json<Value>) {
    match request_upstream(&state.client, &state.completion, &request.prompt).await {
        Ok(choices) => (StatusCode::OK, Json(json!({ "result": choices }))),
        Err(UpstreamError::Status(status, body)) => {
            warning!("Completion API answered {}", status);
            (status, Json(json!({ "error": body })))
        }
        Err(UpstreamError::Transport(message)) => {
            warning!("Completion API unreachable: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
        }
    }
}
