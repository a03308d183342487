//! API key management.
//!
//! Prompts for the AssemblyAI API key. If a key is already saved, the user
//! can press Enter without typing anything to keep it.

use cliclack::{intro, note, outro, password};
use console::style;

use crate::config;

/// Handles API key entry and storage.
///
/// # Errors
/// - If the prompt is cancelled
/// - If the key cannot be saved
pub async fn handle_auth() -> Result<(), anyhow::Error> {
    tracing::info!("=== uttr Authentication ===");

    println!("\n ╻╻╋╋┏╸\n ┗┛┗┗╹ \n");

    intro(style(" auth ").on_white().black())?;

    let current_api_key = config::get_api_key().ok().flatten();

    if std::env::var(config::API_KEY_ENV).is_ok() {
        note(
            "Environment override",
            format!(
                "{} is set and takes precedence over the stored key.",
                config::API_KEY_ENV
            ),
        )?;
    }

    let api_key = if current_api_key.is_some() {
        password("Enter AssemblyAI API key (press Enter to keep current):")
            .allow_empty()
            .interact()
            .map_err(|e| anyhow::anyhow!("API key input cancelled: {e}"))?
    } else {
        password("Enter AssemblyAI API key:")
            .interact()
            .map_err(|e| anyhow::anyhow!("API key input cancelled: {e}"))?
    };

    // Empty input keeps the current key when one exists
    let api_key_to_save = if api_key.trim().is_empty() {
        match current_api_key {
            Some(key) => key,
            None => return Err(anyhow::anyhow!("API key cannot be empty")),
        }
    } else {
        api_key
    };

    config::save_api_key(&api_key_to_save)?;

    outro("✅ API key saved.")?;

    tracing::info!("Authentication completed");

    Ok(())
}
