//! Configuration for promptkit

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::loader::{DEFAULT_EXTENSION, Loader, PathAliases};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Namespace aliases, e.g. `refund: prompts/refund`
    #[serde(default)]
    pub aliases: PathAliases,

    /// Extension added to template references that have none
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aliases: PathAliases::default(),
            extension: default_extension(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from(config_path);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("promptkit").join("config.yml")),
            Some(PathBuf::from("promptkit.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        Ok(Config::default())
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build a loader from the configured aliases and extension
    pub fn loader(&self) -> Loader {
        Loader::new(self.aliases.clone()).with_extension(&self.extension)
    }
}
