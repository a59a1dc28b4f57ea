use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode, Url, header};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config,
    errors::{ConfigError, CredentialError},
    management::{CredentialStore, KeyValueStore, TokenRefresher},
    server::start_login_listener,
    success,
    types::{LoginRedirect, TokenGrant},
    utils, warning,
};

/// Registered Spotify application as seen by the backend proxy.
#[derive(Debug, Clone)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
}

impl OAuthApp {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: config::spotify_client_id()?,
            client_secret: config::spotify_client_secret()?,
            redirect_uri: config::spotify_redirect_uri()?,
            scope: config::spotify_scope(),
            auth_url: config::spotify_auth_url(),
            token_url: config::spotify_token_url(),
        })
    }

    /// Authorization endpoint URL carrying the anti-forgery `state`.
    pub fn authorize_url(&self, state: &str) -> Result<Url, String> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| e.to_string())
    }

    /// Exchanges an authorization code for the token triple.
    pub async fn exchange_code(&self, client: &Client, code: &str) -> Result<TokenGrant, String> {
        let (status, json) = self
            .token_request(
                client,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("redirect_uri", self.redirect_uri.as_str()),
                ],
            )
            .await
            .map_err(|e| e.to_string())?;

        if status != StatusCode::OK {
            return Err(format!("token endpoint answered {status}: {json}"));
        }

        serde_json::from_value(json).map_err(|e| e.to_string())
    }

    /// Refresh grant; the provider's status and body are returned untouched
    /// so the proxy can pass them through.
    pub async fn refresh(
        &self,
        client: &Client,
        refresh_token: &str,
    ) -> Result<(StatusCode, Value), reqwest::Error> {
        self.token_request(
            client,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
        )
        .await
    }

    async fn token_request(
        &self,
        client: &Client,
        form: &[(&str, &str)],
    ) -> Result<(StatusCode, Value), reqwest::Error> {
        let response = client
            .post(&self.token_url)
            .header(
                header::AUTHORIZATION,
                utils::basic_auth(&self.client_id, &self.client_secret),
            )
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let json = response.json::<Value>().await?;
        Ok((status, json))
    }
}

/// Refreshes tokens through the backend's `/api/refresh_token`, which holds
/// the client secret.
pub struct BackendRefresher {
    client: Client,
    backend_url: String,
}

impl BackendRefresher {
    pub fn new(client: Client, backend_url: &str) -> Self {
        Self {
            client,
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }
    }
}

impl TokenRefresher for BackendRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, String> {
        let response = self
            .client
            .get(format!("{}/api/refresh_token", self.backend_url))
            .query(&[("refresh_token", refresh_token)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("backend answered {status}: {body}"));
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| e.to_string())
    }
}

/// Runs the browser login.
///
/// 1. Starts a listener on the frontend origin that captures the redirect
///    the backend issues after the OAuth callback
/// 2. Opens `{backend}/api/login` in the default browser
/// 3. Waits up to two minutes for the redirect
/// 4. Stores the captured tokens
pub async fn login<S: KeyValueStore, R: TokenRefresher>(
    credentials: &CredentialStore<S, R>,
) -> Result<(), CredentialError> {
    let shared_state: Arc<Mutex<Option<LoginRedirect>>> = Arc::new(Mutex::new(None));

    let listener_state = Arc::clone(&shared_state);
    let frontend_url = config::frontend_url();
    let handle = tokio::spawn(async move {
        if let Err(e) = start_login_listener(&frontend_url, listener_state).await {
            warning!("Login listener stopped: {}", e);
        }
    });

    let login_url = format!("{}/api/login", config::backend_url().trim_end_matches('/'));
    if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    let redirect = wait_for_redirect(shared_state, Duration::from_secs(120)).await;
    handle.abort();

    match redirect {
        Some(redirect) => {
            credentials.accept_authorization(&redirect).await?;
            success!("Authentication successful!");
            Ok(())
        }
        None => Err(CredentialError::NotAuthenticated),
    }
}

async fn wait_for_redirect(
    shared_state: Arc<Mutex<Option<LoginRedirect>>>,
    max_wait: Duration,
) -> Option<LoginRedirect> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(redirect) = lock.as_ref() {
            return Some(redirect.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    None
}
