//! Build script for Promptify.
//!
//! Copies the `.env.example` template into the local data directory so users
//! find it next to where the `.env` is read from.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to
/// `<data_local_dir>/promptify/.env.example`.
///
/// - Linux: `~/.local/share/promptify/.env.example`
/// - macOS: `~/Library/Application Support/promptify/.env.example`
/// - Windows: `%LOCALAPPDATA%/promptify/.env.example`
///
/// A missing template only emits a cargo warning. Directory or write failures
/// fail the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("promptify");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
