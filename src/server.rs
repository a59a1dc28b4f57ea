use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use reqwest::Url;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{Res, api, api::AppState, config, info, types::LoginRedirect};

/// Routes of the backend proxy.
pub fn backend_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api/completion", post(api::completion))
        .route("/api/login", get(api::login))
        .route("/api/callback", get(api::callback))
        .route("/api/refresh_token", get(api::refresh_token))
        .layer(Extension(state))
}

pub async fn start_backend(state: Arc<AppState>) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| format!("Failed to parse server address: {e}"))?;

    let listener = TcpListener::bind(&addr).await?;
    info!("Backend listening on http://{}", addr);
    axum::serve(listener, backend_router(state)).await?;
    Ok(())
}

/// Single-route app that captures the post-login redirect on `path`.
pub fn login_router(path: &str, shared_state: Arc<Mutex<Option<LoginRedirect>>>) -> Router {
    Router::new()
        .route(path, get(api::capture))
        .layer(Extension(shared_state))
}

/// Listens on the host and port of `frontend_url` until aborted.
pub async fn start_login_listener(
    frontend_url: &str,
    shared_state: Arc<Mutex<Option<LoginRedirect>>>,
) -> Res<()> {
    let url = Url::parse(frontend_url)?;
    let host = url
        .host_str()
        .ok_or_else(|| format!("{frontend_url} has no host"))?
        .to_string();
    let port = url
        .port_or_known_default()
        .ok_or_else(|| format!("{frontend_url} has no port"))?;

    let listener = TcpListener::bind((host.as_str(), port)).await?;
    axum::serve(listener, login_router(url.path(), shared_state)).await?;
    Ok(())
}
