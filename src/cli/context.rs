use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::{
    config, error,
    errors::CatalogError,
    management::{CredentialStore, FileStore, SessionManager},
    spotify::{SpotifyCatalog, auth::BackendRefresher},
    warning,
};

pub(crate) type Credentials = CredentialStore<FileStore, BackendRefresher>;

pub(crate) fn credential_store(client: &Client) -> Credentials {
    let refresh_guard = match config::refresh_guard() {
        Ok(guard) => guard,
        Err(e) => error!("{}", e),
    };

    CredentialStore::new(
        FileStore::new(config::data_dir().join("credentials.json")),
        BackendRefresher::new(client.clone(), &config::backend_url()),
        refresh_guard,
    )
}

/// A valid access token, refreshed if needed; exits when there is none.
pub(crate) async fn access_token(credentials: &Credentials) -> String {
    match credentials.access_token().await {
        Ok(token) => token,
        Err(e) => error!("{}", e),
    }
}

pub(crate) fn catalog(client: &Client, access_token: &str) -> SpotifyCatalog {
    SpotifyCatalog::new(client.clone(), &config::spotify_api_url(), access_token)
}

/// Reports a failed catalog call and exits. A rejected token is refreshed
/// first so the next run picks up the new one.
pub(crate) async fn catalog_failure(credentials: &Credentials, e: CatalogError) {
    if matches!(e, CatalogError::Unauthorized) {
        match credentials.refresh().await {
            Ok(_) => warning!("Access token was rejected and has been refreshed."),
            Err(refresh_err) => error!("{}", refresh_err),
        }
        error!("{}. Please run the command again.", e);
    }

    error!("{}", e);
}

pub(crate) async fn load_session() -> SessionManager {
    match SessionManager::load(config::data_dir().join("session.json")).await {
        Ok(manager) => manager,
        Err(e) => error!("Cannot load session. Err: {}", e),
    }
}

pub(crate) async fn persist_session(manager: &SessionManager) {
    if let Err(e) = manager.persist().await {
        error!("Cannot persist session. Err: {}", e);
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
