//! API credential storage.
//!
//! The AssemblyAI key lives outside the editable config file, in the user's
//! local data directory with owner-only permissions. A key in the
//! `ASSEMBLYAI_API_KEY` environment variable takes precedence over the
//! stored one; it is a development-shell override, never a baked-in default.
//! With neither present the caller must direct the user to `uttr auth`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable consulted before the secrets file.
pub const API_KEY_ENV: &str = "ASSEMBLYAI_API_KEY";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SecretsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assemblyai_api_key: Option<String>,
}

/// Resolves the credential for a transcription session.
///
/// Order: environment override, then the key stored by `uttr auth`. Returns
/// `Ok(None)` when neither is configured.
///
/// # Errors
/// - If the secrets file exists but cannot be read or parsed
pub fn resolve_api_key() -> anyhow::Result<Option<String>> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        let key = key.trim();
        if !key.is_empty() {
            tracing::debug!("Using API key from {API_KEY_ENV}");
            return Ok(Some(key.to_string()));
        }
    }
    get_api_key()
}

/// Returns the stored API key, if any.
///
/// # Errors
/// - If the secrets file exists but cannot be read or parsed
pub fn get_api_key() -> anyhow::Result<Option<String>> {
    let path = secrets_path()?;
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read secrets file: {e}"))?;
    let secrets: SecretsFile = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse secrets file: {e}"))?;
    Ok(secrets.assemblyai_api_key)
}

/// Stores the API key with owner-only file permissions.
///
/// # Errors
/// - If the data directory cannot be determined or created
/// - If the secrets file cannot be written
pub fn save_api_key(key: &str) -> anyhow::Result<()> {
    let path = secrets_path()?;
    let secrets = SecretsFile {
        assemblyai_api_key: Some(key.trim().to_string()),
    };
    fs::write(&path, toml::to_string_pretty(&secrets)?)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    tracing::info!("API key saved");
    Ok(())
}

/// Determines the secrets file path, creating the data directory if needed.
fn secrets_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
        .join(".local")
        .join("share")
        .join("uttr");

    fs::create_dir_all(&data_dir)?;

    Ok(data_dir.join("secrets.toml"))
}
