use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::paywall::PaywallConfig;
use crate::core::schedule::DEFAULT_STAGGER_MS;
use crate::error::{map_io_err, KambaError, KambaResult};
use crate::integrations::openai::ProviderConfig;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KambaConfig {
    pub provider: ProviderConfig,
    pub stagger: StaggerConfig,
    /// JSON catalog replacing the built-in entries
    pub catalog_path: Option<PathBuf>,
    pub paywall: PaywallConfig,
}

/// Spacing of batched card translations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerConfig {
    pub interval_ms: u64,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_STAGGER_MS,
        }
    }
}

impl StaggerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl KambaConfig {
    pub fn load(path: &Path) -> KambaResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let content = std::fs::read_to_string(path).map_err(map_io_err(path))?;

        match ext {
            "json" => Ok(serde_json::from_str(&content)?),
            "toml" => Ok(toml::from_str(&content)?),
            _ => Err(KambaError::invalid_argument(format!(
                "Unsupported config format: {}",
                ext
            ))),
        }
    }

    pub fn save(&self, path: &Path) -> KambaResult<()> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let content = match ext {
            "json" => serde_json::to_string_pretty(self)?,
            "toml" => toml::to_string(self)?,
            _ => {
                return Err(KambaError::invalid_argument(format!(
                    "Unsupported config format: {}",
                    ext
                )))
            }
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(map_io_err(parent))?;
        }
        std::fs::write(path, content).map_err(map_io_err(path))?;
        Ok(())
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kamba")
            .join("config.toml")
    }

    /// Reject values that cannot work
    pub fn validate(&self) -> KambaResult<()> {
        if self.provider.model.trim().is_empty() {
            return Err(KambaError::config_error("provider.model must not be empty"));
        }
        if self.provider.api_base.trim().is_empty() {
            return Err(KambaError::config_error("provider.api_base must not be empty"));
        }
        if self.paywall.trial_days < 0 {
            return Err(KambaError::config_error("paywall.trial_days must not be negative"));
        }
        Ok(())
    }
}
