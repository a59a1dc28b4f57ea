//! # CLI Module
//!
//! User-facing commands of Promptify. The CLI plays the part of the browser
//! client: it owns the credential store and the session (last results,
//! playlist, play queue) and talks to the backend proxy for completions and
//! token refreshes, and to Spotify directly for catalog calls.
//!
//! ## Commands
//!
//! ### Backend
//!
//! - [`serve`] - runs the backend proxy
//!
//! ### Authentication
//!
//! - [`login`] - browser login through the proxy, tokens stored locally
//! - [`logout`] - clears the stored tokens
//!
//! ### Songs
//!
//! - [`generate`] - resolves a prompt into songs and stores them in the session
//! - [`songs`] - shows the stored songs sorted and filtered
//! - [`like`] / [`unlike`] - changes library membership of a song
//!
//! ### Playlist
//!
//! - [`playlist::list`], [`playlist::add`], [`playlist::remove`],
//!   [`playlist::toggle`] - curates the playlist
//! - [`playlist::play`], [`playlist::pause`], [`playlist::resume`] - drive
//!   the play queue
//! - [`playlist::rename`], [`playlist::save`] - name and persist the playlist
//!   in the user's account
//!
//! ## Data Flow
//!
//! ```text
//! CLI command
//!     ↓
//! SessionManager / CredentialStore (local JSON files)
//!     ↓
//! Resolver, Playback (pure state and orchestration)
//!     ↓
//! Backend proxy / Spotify Web API
//! ```
//!
//! Every failure that ends a command goes through `error!`, which exits with
//! status 1. A catalog `401` triggers a token refresh before exiting; the
//! command is not retried.
//!
//! ## Usage Patterns
//!
//! ```bash
//! promptify serve &                        # start the backend proxy
//! promptify login                          # authenticate with Spotify
//! promptify generate "rainy sunday jazz"   # resolve a prompt
//! promptify songs --sort oldest --lyrics clean
//! promptify playlist add <id> <id>
//! promptify playlist save
//! ```

mod auth;
mod context;
mod generate;
pub mod playlist;
mod serve;
mod songs;

pub use auth::login;
pub use auth::logout;
pub use generate::generate;
pub use serve::serve;
pub use songs::like;
pub use songs::songs;
pub use songs::unlike;
