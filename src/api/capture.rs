use std::sync::Arc;

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::types::LoginRedirect;

/// Receives the backend's post-login redirect on the frontend origin and
/// hands the token triple to the waiting `promptify login`.
pub async fn capture(
    Query(redirect): Query<LoginRedirect>,
    Extension(shared_state): Extension<Arc<Mutex<Option<LoginRedirect>>>>,
) -> Html<&'static str> {
    if redirect.access_token.is_none() && redirect.error.is_none() {
        return Html("<h4>Missing access token.</h4>");
    }

    let failed = redirect.error.is_some();
    *shared_state.lock().await = Some(redirect);

    if failed {
        Html("<h4>Login failed.</h4>")
    } else {
        Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
    }
}
