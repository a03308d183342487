//! Configuration file management for uttr.
//!
//! This module handles loading and saving application configuration from
//! TOML files. Configuration is stored in the user's config directory and is
//! created with defaults on first run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// AssemblyAI request options applied to every transcription.
///
/// Speaker labels are not configurable here: the form always requests them,
/// that is the point of the tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyAiConfig {
    /// Add punctuation and capitalization
    #[serde(default = "default_true")]
    pub punctuate: bool,
    /// Apply text formatting to the transcript
    #[serde(default = "default_true")]
    pub format_text: bool,
    /// Enable automatic language detection
    #[serde(default)]
    pub language_detection: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AssemblyAiConfig {
    fn default() -> Self {
        Self {
            punctuate: true,
            format_text: true,
            language_detection: false,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UttrConfig {
    #[serde(default)]
    pub assemblyai: AssemblyAiConfig,
}

impl UttrConfig {
    /// Loads configuration from the user's config directory, writing the
    /// default configuration first if no file exists yet.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the config file cannot be read or written
    /// - If the TOML is malformed
    pub fn load_or_init() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            let config = UttrConfig::default();
            config.save()?;
            tracing::info!("Default configuration written to {}", config_path.display());
            return Ok(config);
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: UttrConfig = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = get_config_path()?;
        let config_content = toml::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Retrieves the path to the config file, creating its directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    let config_path = home.join(".config").join("uttr").join("uttr.toml");

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(config_path)
}
