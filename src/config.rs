//! Configuration management for Promptify.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory (`<data dir>/promptify/.env`)
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)
//!
//! Secrets have no default and are returned as `Result` so that the caller
//! decides whether a missing value is fatal.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::errors::ConfigError;

pub const DEFAULT_SCOPE: &str = "user-library-modify playlist-modify-public playlist-modify-private user-library-read streaming user-read-email user-read-private user-read-playback-state user-modify-playback-state";

/// Loads environment variables from the `.env` file in the data directory,
/// falling back to a `.env` in the working directory.
///
/// Variables already present in the environment are never overwritten. A
/// missing file is not an error; the data directory is created so that users
/// find the copied `.env.example` next to where the `.env` belongs.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    } else {
        // a missing ./.env is fine, everything may come from the environment
        let _ = dotenv::dotenv();
    }
    Ok(())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn with_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::Invalid(key, e.to_string())),
        _ => Ok(default),
    }
}

/// Directory holding credentials, the session file and the `.env` file.
///
/// `PROMPTIFY_DATA_DIR` overrides the platform default:
/// - Linux: `~/.local/share/promptify`
/// - macOS: `~/Library/Application Support/promptify`
/// - Windows: `%LOCALAPPDATA%/promptify`
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var("PROMPTIFY_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("promptify");
    path
}

/// Address the backend proxy binds to, e.g. `127.0.0.1:5000`.
pub fn server_addr() -> String {
    with_default("SERVER_ADDRESS", "127.0.0.1:5000")
}

/// Base URL under which the CLI reaches the backend proxy.
pub fn backend_url() -> String {
    with_default("BACKEND_URL", "http://127.0.0.1:5000")
}

/// Origin the OAuth callback redirects to with the token triple.
///
/// `promptify login` listens on this origin to capture the tokens.
pub fn frontend_url() -> String {
    with_default("FRONTEND_URL", "http://127.0.0.1:5173")
}

pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_ID")
}

/// Client secret of the registered Spotify application.
///
/// Only the backend proxy needs it; it never leaves the server process.
pub fn spotify_client_secret() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_SECRET")
}

/// Must match the redirect URI registered with Spotify, normally
/// `{BACKEND_URL}/api/callback`.
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_REDIRECT_URI")
}

pub fn spotify_scope() -> String {
    with_default("SPOTIFY_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_auth_url() -> String {
    with_default("SPOTIFY_AUTH_URL", "https://accounts.spotify.com/authorize")
}

pub fn spotify_token_url() -> String {
    with_default("SPOTIFY_TOKEN_URL", "https://accounts.spotify.com/api/token")
}

pub fn spotify_api_url() -> String {
    with_default("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

/// Secret used to sign the anti-forgery state cookie.
pub fn cookie_secret() -> Result<String, ConfigError> {
    required("COOKIE_SECRET")
}

pub fn openai_api_key() -> Result<String, ConfigError> {
    required("OPENAI_API_KEY")
}

pub fn openai_api_url() -> String {
    with_default("OPENAI_API_URL", "https://api.openai.com/v1")
}

pub fn openai_model() -> String {
    with_default("OPENAI_MODEL", "gpt-3.5-turbo-instruct")
}

pub fn openai_temperature() -> Result<f32, ConfigError> {
    parsed("OPENAI_TEMPERATURE", 0.7)
}

pub fn openai_max_tokens() -> Result<u32, ConfigError> {
    parsed("OPENAI_MAX_TOKENS", 256)
}

/// Number of concurrent completion requests issued per prompt.
pub fn completion_fanout() -> Result<usize, ConfigError> {
    let fanout = parsed("COMPLETION_FANOUT", 2usize)?;
    if fanout == 0 {
        return Err(ConfigError::Invalid(
            "COMPLETION_FANOUT",
            "must be at least 1".to_string(),
        ));
    }
    Ok(fanout)
}

/// Wall-clock budget for a whole prompt resolution.
pub fn resolve_timeout() -> Result<Duration, ConfigError> {
    parsed("RESOLVE_TIMEOUT_SECS", 25u64).map(Duration::from_secs)
}

/// Minimum age of the current token before another refresh is allowed.
///
/// A refresh requested sooner is treated as a refresh loop and logs out.
pub fn refresh_guard() -> Result<Duration, ConfigError> {
    parsed("REFRESH_GUARD_SECS", 1000u64).map(Duration::from_secs)
}
