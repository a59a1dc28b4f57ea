use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use reqwest::Url;
use serde::Deserialize;

use crate::{api::AppState, errors::StateMismatch, utils, warning};

/// Name of the cookie carrying the signed OAuth `state`.
pub const STATE_COOKIE: &str = "stateParam";
const STATE_LEN: usize = 15;
const STATE_MAX_AGE_SECS: u32 = 300;

impl IntoResponse for StateMismatch {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()).into_response()
    }
}

/// `GET /api/login`: remembers a fresh `state` in a signed cookie and sends
/// the browser to the provider's authorization page.
pub async fn login(Extension(state): Extension<Arc<AppState>>) -> Response {
    let state_param = utils::generate_state(STATE_LEN);

    let authorize_url = match state.oauth.authorize_url(&state_param) {
        Ok(url) => url,
        Err(e) => {
            warning!("Cannot build authorization URL: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e).into_response();
        }
    };

    let cookie = format!(
        "{STATE_COOKIE}={}; Max-Age={STATE_MAX_AGE_SECS}; Path=/; HttpOnly",
        utils::sign_cookie(&state_param, &state.cookie_secret)
    );

    (
        [(header::SET_COOKIE, cookie)],
        Redirect::to(authorize_url.as_str()),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// `GET /api/callback`: verifies `state`, exchanges the code and redirects to
/// the frontend with the tokens (or `?error=`) in the query string.
pub async fn callback(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    let expected = signed_state(&headers, &state.cookie_secret);
    match (expected, params.state.as_deref()) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => return StateMismatch.into_response(),
    }

    let clear_cookie = format!("{STATE_COOKIE}=; Max-Age=0; Path=/");

    let Some(code) = params.code else {
        let reason = params.error.unwrap_or_else(|| "missing_code".to_string());
        return frontend_redirect(&state.frontend_url, &[("error", reason.as_str())], clear_cookie);
    };

    match state.oauth.exchange_code(&state.client, &code).await {
        Ok(grant) => {
            let refresh_token = grant.refresh_token.unwrap_or_default();
            let expires_in = grant.expires_in.map(|s| s.to_string()).unwrap_or_default();
            frontend_redirect(
                &state.frontend_url,
                &[
                    ("access_token", grant.access_token.as_str()),
                    ("refresh_token", refresh_token.as_str()),
                    ("expires_in", expires_in.as_str()),
                ],
                clear_cookie,
            )
        }
        Err(e) => {
            warning!("Code exchange failed: {}", e);
            frontend_redirect(
                &state.frontend_url,
                &[("error", "invalid_token")],
                clear_cookie,
            )
        }
    }
}

fn signed_state(headers: &HeaderMap, secret: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| utils::cookie_value(cookies, STATE_COOKIE))
        .and_then(|signed| utils::unsign_cookie(&signed, secret))
}

fn frontend_redirect(frontend_url: &str, params: &[(&str, &str)], cookie: String) -> Response {
    match Url::parse_with_params(frontend_url, params) {
        Ok(url) => ([(header::SET_COOKIE, cookie)], Redirect::to(url.as_str())).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
