use crate::error::AgentError;
use crate::models::config::AgentConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads and saves the agent configuration file
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for `<platform config dir>/reco-agent/config.json`
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new() -> Result<Self, AgentError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgentError::Config("failed to determine config directory".to_string()))?
            .join("reco-agent");

        Self::with_dir(config_dir)
    }

    /// Manager for `config.json` inside `config_dir`
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Result<Self, AgentError> {
        let config_dir = config_dir.into();
        fs::create_dir_all(&config_dir)?;
        let config_path = config_dir.join("config.json");

        Ok(Self {
            config_dir,
            config_path,
        })
    }

    /// Save configuration to disk, pretty-printed
    pub fn save(&self, config: &AgentConfig) -> Result<(), AgentError> {
        fs::create_dir_all(&self.config_dir)?;
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, json)?;

        tracing::debug!(path = %self.config_path.display(), "config saved");
        Ok(())
    }

    /// Load configuration from disk
    ///
    /// A missing file yields the defaults; missing fields inside the file do too.
    pub fn load(&self) -> Result<AgentConfig, AgentError> {
        if !self.config_exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(AgentConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)?;
        let config: AgentConfig = serde_json::from_str(&content)?;

        Ok(config)
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}
