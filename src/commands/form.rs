//! Launch the interactive transcription form.
//!
//! Loads configuration, resolves the API credential, constructs the
//! AssemblyAI client, and hands everything to the form screen.

use std::sync::Arc;

use crate::config;
use crate::form::{FormController, FormScreen};
use crate::transcription::AssemblyAiClient;

/// Runs the transcription form until the user exits.
///
/// # Errors
/// - If the configuration cannot be loaded or created
/// - If no API key is configured
/// - If the terminal UI cannot be initialized
pub async fn handle_form() -> Result<(), anyhow::Error> {
    tracing::info!("=== uttr Transcription Form ===");

    let config_data = config::UttrConfig::load_or_init().map_err(|err| {
        tracing::error!("Failed to load configuration: {err}");
        anyhow::anyhow!("Configuration error: {err}")
    })?;

    let api_key = config::resolve_api_key()?.ok_or_else(|| {
        anyhow::anyhow!(
            "No AssemblyAI API key configured. Run 'uttr auth' or set {}.",
            config::API_KEY_ENV
        )
    })?;

    let client = AssemblyAiClient::new(api_key, config_data.assemblyai.clone())?;
    let controller = FormController::new(Arc::new(client));

    let mut screen = FormScreen::new(controller)
        .map_err(|e| anyhow::anyhow!("Failed to initialize UI: {e}"))?;
    screen.run()
}
