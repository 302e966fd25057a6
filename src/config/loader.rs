//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the ledger's
//! seed configuration from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{SettingsDefaults, validate_rate};

use super::types::{LedgerConfig, RateSeed, SettingsConfig};

/// Loads and provides access to the seed configuration.
///
/// # Directory Structure
///
/// ```text
/// config/sample/
/// ├── settings.yaml          # Fallback rate and evaluation cycle target
/// └── rates/                 # Optional initial rate history
///     └── 2024-04-01.yaml    # One entry per file, applied in file-name order
/// ```
///
/// # Example
///
/// ```no_run
/// use wage_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Fallback rate: {}", loader.config().settings.hourly_rate);
/// # Ok::<(), wage_ledger::error::LedgerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Fails if `settings.yaml` is missing, if any file is not valid YAML for
    /// its type, or if a rate or cycle target is out of range. A missing
    /// `rates/` directory means an empty initial history.
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<SettingsConfig>(&path.join("settings.yaml"))?;
        validate_rate("hourly_rate", settings.hourly_rate)?;
        if settings.evaluation_cycle_hours == 0 {
            return Err(LedgerError::invalid_field(
                "evaluation_cycle_hours",
                "must be greater than zero",
            ));
        }

        let rates = Self::load_rates(&path.join("rates"))?;
        debug!(path = %path.display(), rates = rates.len(), "Loaded ledger configuration");

        Ok(Self {
            config: LedgerConfig { settings, rates },
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files from the rates directory, sorted by file name.
    fn load_rates(rates_dir: &Path) -> LedgerResult<Vec<RateSeed>> {
        if !rates_dir.exists() {
            return Ok(Vec::new());
        }

        let rates_dir_str = rates_dir.display().to_string();
        let entries = fs::read_dir(rates_dir).map_err(|_| LedgerError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| LedgerError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                files.push(path);
            }
        }
        files.sort();

        let mut rates = Vec::with_capacity(files.len());
        for file in &files {
            let seed = Self::load_yaml::<RateSeed>(file)?;
            validate_rate("rate", seed.rate).map_err(|e| LedgerError::ConfigParseError {
                path: file.display().to_string(),
                message: e.to_string(),
            })?;
            rates.push(seed);
        }

        Ok(rates)
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> LedgerConfig {
        self.config
    }

    /// The defaults used when the settings record is first created.
    pub fn settings_defaults(&self) -> SettingsDefaults {
        self.config.settings_defaults()
    }
}
