use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use super::config::KambaConfig;
use crate::catalog::Catalog;

/// Locates and loads the configuration
pub struct ConfigLoader {
    config_path: PathBuf,
    explicit: bool,
}

impl ConfigLoader {
    /// Loader for the default config location
    pub fn new() -> Self {
        Self {
            config_path: KambaConfig::default_config_path(),
            explicit: false,
        }
    }

    /// Loader for a path given by the user; the file must exist
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            explicit: true,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load the configuration, falling back to defaults when the default file is absent
    pub fn load(&self) -> Result<KambaConfig> {
        if !self.config_path.exists() {
            if self.explicit {
                anyhow::bail!("Config file not found: {}", self.config_path.display());
            }
            debug!(
                "No config at {}, using defaults",
                self.config_path.display()
            );
            return Ok(KambaConfig::default());
        }

        let config = KambaConfig::load(&self.config_path)
            .with_context(|| format!("Failed to load config: {:?}", self.config_path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config: {:?}", self.config_path))?;

        info!("Loaded configuration from {}", self.config_path.display());
        Ok(config)
    }

    /// Write a default configuration file; refuses to overwrite unless `force`
    pub fn write_default(&self, force: bool) -> Result<&PathBuf> {
        if self.config_path.exists() && !force {
            anyhow::bail!(
                "Config file already exists: {} (use --force to overwrite)",
                self.config_path.display()
            );
        }

        KambaConfig::default()
            .save(&self.config_path)
            .with_context(|| format!("Failed to write config: {:?}", self.config_path))?;
        info!("Wrote default configuration to {}", self.config_path.display());
        Ok(&self.config_path)
    }

    /// Catalog named by the configuration, or the built-in one
    pub fn load_catalog(config: &KambaConfig) -> Result<Catalog> {
        match &config.catalog_path {
            Some(path) => Catalog::load(path)
                .with_context(|| format!("Failed to load catalog: {:?}", path)),
            None => Ok(Catalog::builtin()),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
