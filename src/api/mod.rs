//! # API Module
//!
//! HTTP handlers of the Promptify backend proxy. The proxy keeps the
//! completion API key and the Spotify client secret away from the client and
//! runs the server side of the OAuth authorization-code flow.
//!
//! ## Endpoints
//!
//! - [`health`] - status and version
//! - [`completion`] - forwards a prompt to the completion API with fixed
//!   generation parameters
//! - [`login`] / [`callback`] - authorization-code flow guarded by a signed
//!   `state` cookie
//! - [`refresh_token`] - refresh grant, provider response passed through
//!
//! [`capture`] is not part of the proxy. It runs on the frontend origin during
//! `promptify login` and receives the tokens the proxy redirects with.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use promptify::{api::AppState, server};
//!
//! let state = Arc::new(AppState::from_env()?);
//! let app = server::backend_router(state);
//! ```

mod capture;
mod completion;
mod health;
mod login;
mod refresh;

use reqwest::Client;

use crate::{
    completion::CompletionParams, config, errors::ConfigError, spotify::auth::OAuthApp,
};

pub use capture::capture;
pub use completion::completion;
pub use health::health;
pub use login::STATE_COOKIE;
pub use login::callback;
pub use login::login;
pub use refresh::refresh_token;

/// Everything the proxy handlers share.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: Client,
    pub oauth: OAuthApp,
    pub completion: CompletionParams,
    pub cookie_secret: String,
    pub frontend_url: String,
}

impl AppState {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client: Client::new(),
            oauth: OAuthApp::from_env()?,
            completion: CompletionParams::from_env()?,
            cookie_secret: config::cookie_secret()?,
            frontend_url: config::frontend_url(),
        })
    }
}
