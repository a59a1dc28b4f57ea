use std::time::Duration;

use thiserror::Error;

/// Failure of a single completion request.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Network(String),

    #[error("completion quota exhausted: {0}")]
    Quota(String),

    #[error("completion service answered {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CompletionError::Malformed(e.to_string())
        } else {
            CompletionError::Network(e.to_string())
        }
    }
}

/// Failure of a catalog (Spotify Web API) call.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Network(String),

    #[error("catalog rejected the access token")]
    Unauthorized,

    #[error("catalog rate limit hit, retry after {retry_after:?} seconds")]
    RateLimited { retry_after: Option<u64> },

    #[error("catalog answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("cannot decode catalog response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Network(e.to_string())
        }
    }
}

/// Failure of the prompt-to-song resolution as a whole.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("none of the {attempted} completion requests succeeded")]
    NoCompletions {
        attempted: usize,
        errors: Vec<CompletionError>,
    },

    #[error("resolution did not finish within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("not authenticated, run `promptify login`")]
    NotAuthenticated,

    #[error("refresh requested again right after the last one, logged out")]
    RefreshLoop,

    #[error("token refresh failed: {0}")]
    Refresh(String),

    #[error("credential store error: {0}")]
    Store(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} is invalid: {1}")]
    Invalid(&'static str, String),
}

/// The OAuth `state` query parameter does not match the signed cookie.
#[derive(Debug, Error)]
#[error("Invalid State")]
pub struct StateMismatch;
