use std::{future::Future, time::Duration};

use crate::{
    errors::CredentialError,
    management::KeyValueStore,
    types::{LoginRedirect, TokenGrant},
    utils, warning,
};

pub const ACCESS_TOKEN_KEY: &str = "spotify_access_token";
pub const REFRESH_TOKEN_KEY: &str = "spotify_refresh_token";
pub const EXPIRE_TIME_KEY: &str = "spotify_token_expire_time";
pub const TIMESTAMP_KEY: &str = "spotify_token_timestamp";

/// Lifetime assumed for a token whose grant carried no `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

const ALL_KEYS: [&str; 4] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, EXPIRE_TIME_KEY, TIMESTAMP_KEY];

/// Exchanges a refresh token for a fresh grant.
pub trait TokenRefresher {
    fn refresh(&self, refresh_token: &str) -> impl Future<Output = Result<TokenGrant, String>>;
}

/// Snapshot of the four persisted credential entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    /// Epoch milliseconds of the last issuance.
    pub issued_at: Option<i64>,
}

impl Credentials {
    /// True once more than `expires_in` seconds passed since issuance,
    /// [`DEFAULT_EXPIRES_IN_SECS`] when the lifetime is unknown.
    /// Without a token or timestamp there is nothing that could expire.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        let (Some(_), Some(issued_at)) = (&self.access_token, self.issued_at) else {
            return false;
        };
        let elapsed_secs = (now_ms - issued_at) as f64 / 1000.0;
        elapsed_secs > self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS) as f64
    }

    pub fn age(&self, now_ms: i64) -> Option<i64> {
        self.issued_at.map(|issued_at| now_ms - issued_at)
    }
}

/// Owns the access/refresh token pair for the catalog API.
///
/// All state lives in the [`KeyValueStore`]; nothing is cached in memory, so
/// a refresh performed through one store is picked up by every reader.
pub struct CredentialStore<S, R> {
    store: S,
    refresher: R,
    refresh_guard: Duration,
}

impl<S: KeyValueStore, R: TokenRefresher> CredentialStore<S, R> {
    pub fn new(store: S, refresher: R, refresh_guard: Duration) -> Self {
        Self {
            store,
            refresher,
            refresh_guard,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn credentials(&self) -> Result<Credentials, CredentialError> {
        Ok(Credentials {
            access_token: self.read(ACCESS_TOKEN_KEY).await?,
            refresh_token: self.read(REFRESH_TOKEN_KEY).await?,
            expires_in: self
                .read(EXPIRE_TIME_KEY)
                .await?
                .and_then(|v| v.parse().ok()),
            issued_at: self.read(TIMESTAMP_KEY).await?.and_then(|v| v.parse().ok()),
        })
    }

    /// Whether a usable, unexpired access token is stored.
    pub async fn is_valid(&self) -> bool {
        match self.credentials().await {
            Ok(c) => c.access_token.is_some() && !c.is_expired(utils::now_millis()),
            Err(_) => false,
        }
    }

    /// Stores the token triple handed over by the login redirect.
    ///
    /// A redirect carrying `error` counts as an authorization failure and
    /// goes through [`refresh`](Self::refresh) instead.
    pub async fn accept_authorization(
        &self,
        redirect: &LoginRedirect,
    ) -> Result<String, CredentialError> {
        if let Some(error) = &redirect.error {
            warning!("Authorization reported an error: {}", error);
            return self.refresh().await;
        }

        let Some(access_token) = redirect.access_token.as_deref().filter(|t| usable(t)) else {
            return Err(CredentialError::NotAuthenticated);
        };

        self.write(ACCESS_TOKEN_KEY, access_token).await?;
        if let Some(refresh_token) = redirect.refresh_token.as_deref().filter(|t| usable(t)) {
            self.write(REFRESH_TOKEN_KEY, refresh_token).await?;
        }
        match redirect
            .expires_in
            .as_deref()
            .and_then(|v| v.parse::<u64>().ok())
        {
            Some(expires_in) => {
                self.write(EXPIRE_TIME_KEY, &expires_in.to_string())
                    .await?;
            }
            None => {
                self.store
                    .remove(EXPIRE_TIME_KEY)
                    .await
                    .map_err(CredentialError::Store)?;
            }
        }
        self.write(TIMESTAMP_KEY, &utils::now_millis().to_string())
            .await?;

        Ok(access_token.to_string())
    }

    /// Returns an access token for catalog calls.
    ///
    /// An absent or expired token triggers a refresh. Without a refresh token
    /// the store is cleared and [`CredentialError::NotAuthenticated`] asks
    /// the caller to authorize again. A failed refresh keeps the stale token,
    /// the next catalog call surfaces the problem.
    pub async fn access_token(&self) -> Result<String, CredentialError> {
        let credentials = self.credentials().await?;

        if let Some(token) = &credentials.access_token {
            if !credentials.is_expired(utils::now_millis()) {
                return Ok(token.clone());
            }
        }

        match self.refresh().await {
            Ok(token) => Ok(token),
            Err(CredentialError::Refresh(reason)) => {
                warning!("Keeping the current access token: {}", reason);
                credentials
                    .access_token
                    .ok_or(CredentialError::NotAuthenticated)
            }
            Err(e) => Err(e),
        }
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// Logs out when no refresh token is stored, or when the current token
    /// is younger than the refresh guard (a refresh loop).
    pub async fn refresh(&self) -> Result<String, CredentialError> {
        let credentials = self.credentials().await?;

        let Some(refresh_token) = credentials.refresh_token.clone() else {
            warning!("No refresh token available");
            self.logout().await?;
            return Err(CredentialError::NotAuthenticated);
        };

        let now = utils::now_millis();
        if let Some(age) = credentials.age(now) {
            if age < self.refresh_guard.as_millis() as i64 {
                warning!(
                    "Token was issued {} ms ago, refusing to refresh again",
                    age
                );
                self.logout().await?;
                return Err(CredentialError::RefreshLoop);
            }
        }

        let grant = self
            .refresher
            .refresh(&refresh_token)
            .await
            .map_err(CredentialError::Refresh)?;

        if !usable(&grant.access_token) {
            return Err(CredentialError::Refresh(
                "response carried no access token".to_string(),
            ));
        }

        self.write(ACCESS_TOKEN_KEY, &grant.access_token).await?;
        self.write(TIMESTAMP_KEY, &now.to_string()).await?;
        if let Some(rotated) = grant.refresh_token.as_deref().filter(|t| usable(t)) {
            self.write(REFRESH_TOKEN_KEY, rotated).await?;
        }
        if let Some(expires_in) = grant.expires_in {
            self.write(EXPIRE_TIME_KEY, &expires_in.to_string()).await?;
        }

        Ok(grant.access_token)
    }

    /// Clears all credential entries.
    pub async fn logout(&self) -> Result<(), CredentialError> {
        for key in ALL_KEYS {
            self.store
                .remove(key)
                .await
                .map_err(CredentialError::Store)?;
        }
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<String>, CredentialError> {
        let value = self.store.get(key).await.map_err(CredentialError::Store)?;
        Ok(value.filter(|v| usable(v)))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        self.store
            .set(key, value)
            .await
            .map_err(CredentialError::Store)
    }
}

// The browser client stored the literal string "undefined" for missing fields.
fn usable(value: &str) -> bool {
    !value.is_empty() && value != "undefined"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_needs_token_and_timestamp() {
        let creds = Credentials {
            access_token: None,
            refresh_token: Some("r".to_string()),
            expires_in: Some(3600),
            issued_at: Some(0),
        };
        assert!(!creds.is_expired(10_000_000));

        let creds = Credentials {
            access_token: Some("a".to_string()),
            issued_at: None,
            ..creds
        };
        assert!(!creds.is_expired(10_000_000));
    }

    #[test]
    fn test_expiry_boundary() {
        let creds = Credentials {
            access_token: Some("a".to_string()),
            refresh_token: None,
            expires_in: Some(3600),
            issued_at: Some(1_000),
        };
        assert!(!creds.is_expired(1_000 + 3_600_000));
        assert!(creds.is_expired(1_000 + 3_600_001));
    }

    #[test]
    fn test_unknown_lifetime_uses_default() {
        let creds = Credentials {
            access_token: Some("a".to_string()),
            refresh_token: None,
            expires_in: None,
            issued_at: Some(0),
        };
        assert!(!creds.is_expired(5));
        assert!(!creds.is_expired(DEFAULT_EXPIRES_IN_SECS as i64 * 1000));
        assert!(creds.is_expired(DEFAULT_EXPIRES_IN_SECS as i64 * 1000 + 1));
    }

    #[test]
    fn test_usable_rejects_placeholder() {
        assert!(!usable("undefined"));
        assert!(!usable(""));
        assert!(usable("BQC"));
    }
}
