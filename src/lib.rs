//! Promptify library
//!
//! Turns a free-text mood prompt into a list of Spotify tracks: a completion
//! API suggests songs, the suggestions are parsed into search candidates and
//! resolved against the Spotify catalog. Results can be sorted, filtered,
//! collected into a playlist and saved to the user's account.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the backend proxy and the login capture
//! - `cli` - Command-line interface implementations
//! - `completion` - Completion client and upstream completion call
//! - `config` - Configuration management and environment variables
//! - `errors` - Typed error enums
//! - `management` - Credential store, key-value stores and session persistence
//! - `pipeline` - Prompt to song resolution
//! - `playlist` - Playlist membership and play queue
//! - `presentation` - Sorted and filtered views of a song list
//! - `server` - Backend proxy and login capture servers
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use promptify::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> promptify::Res<()> {
//!     config::load_env().await?;
//!     cli::songs(Default::default(), &Default::default()).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod completion;
pub mod config;
pub mod errors;
pub mod management;
pub mod pipeline;
pub mod playlist;
pub mod presentation;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for glue code that only reports errors.
///
/// Library operations with a recovery path return their own error enums
/// from [`errors`]; everything else boxes.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on http://{}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist '{}' saved.", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program
/// with status 1. Only for failures that end the current command.
///
/// # Example
///
/// ```
/// error!("Cannot load session. Err: {}", e);
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for items that are dropped without failing the operation, such as an
/// unparseable suggestion or a failed search.
///
/// # Example
///
/// ```
/// warning!("Search for '{}' failed: {}", candidate, e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
