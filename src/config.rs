//! Configuration management
//!
//! Handles TOML configuration parsing, validation, and defaults. Every
//! section and field is optional; missing pieces fall back to built-in
//! defaults so an empty file and no file behave identically.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_ELEVATION_COMMAND, DEFAULT_MIN_AGE_DAYS, MIN_AGE_DAYS_MAX,
};
use crate::models::CleanupError;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub cleanup: CleanupSettings,
    pub elevation: ElevationSettings,
    pub rules: RuleSettings,
    pub paths: PathSettings,
}

/// Core cleanup behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupSettings {
    /// Minimum age in days for age-gated targets (0-3650)
    pub min_age_days: u64,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            min_age_days: DEFAULT_MIN_AGE_DAYS,
        }
    }
}

/// Elevation tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationSettings {
    /// Elevation command used for privileged rules (e.g. sudo, doas)
    pub command: String,
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_ELEVATION_COMMAND.to_string(),
        }
    }
}

/// Rule selection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// Rule ids that never run
    pub disabled: Vec<String>,
}

/// Path protection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Glob patterns for entries that must never be removed.
    /// A leading `~/` is expanded to the home directory.
    pub exclude: Vec<String>,
}

impl Configuration {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Configuration = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the default config file if one exists, otherwise built-in defaults
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate all settings against their documented bounds
    pub fn validate(&self) -> Result<()> {
        if self.cleanup.min_age_days > MIN_AGE_DAYS_MAX {
            return Err(CleanupError::InvalidMinAge(self.cleanup.min_age_days).into());
        }

        if self.elevation.command.trim().is_empty() {
            anyhow::bail!("Elevation command must not be empty");
        }

        for pattern in &self.paths.exclude {
            glob::Pattern::new(pattern)
                .map_err(|e| anyhow::anyhow!("Invalid exclude pattern '{}': {}", pattern, e))?;
        }

        Ok(())
    }

    /// Compile the exclusion patterns, expanding `~/` against `home`.
    /// Assumes `validate` has already accepted the pattern syntax.
    pub fn exclude_patterns(&self, home: &Path) -> Vec<glob::Pattern> {
        self.paths
            .exclude
            .iter()
            .map(|pattern| expand_tilde(pattern, home))
            .filter_map(|pattern| glob::Pattern::new(&pattern).ok())
            .collect()
    }
}

/// Default config file location under the user configuration directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Expand a leading `~/` to the given home directory
pub fn expand_tilde(pattern: &str, home: &Path) -> String {
    match pattern.strip_prefix("~/") {
        Some(rest) => home.join(rest).to_string_lossy().to_string(),
        None => pattern.to_string(),
    }
}
