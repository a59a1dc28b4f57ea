mod credentials;
mod session;
mod store;

pub use credentials::ACCESS_TOKEN_KEY;
pub use credentials::CredentialStore;
pub use credentials::DEFAULT_EXPIRES_IN_SECS;
pub use credentials::Credentials;
pub use credentials::EXPIRE_TIME_KEY;
pub use credentials::REFRESH_TOKEN_KEY;
pub use credentials::TIMESTAMP_KEY;
pub use credentials::TokenRefresher;
pub use session::Session;
pub use session::SessionManager;
pub use store::FileStore;
pub use store::KeyValueStore;
pub use store::MemoryStore;
