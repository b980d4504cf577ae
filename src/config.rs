//! User configuration.
//!
//! Defaults for the command-line tool, stored in `~/.steganote/config.toml`:
//!
//! ```toml
//! image_method = "pvd"          # or "lsb"
//! pvd_variant = "range-preserving"  # or "legacy"
//! ```
//!
//! A missing file means defaults. Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stego::PvdVariant;

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Embedding scheme used for image carriers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ImageMethod {
    /// Pixel-value differencing.
    #[default]
    Pvd,
    /// One bit per sample.
    Lsb,
}

/// Tool defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StegoConfig {
    /// Scheme for image carriers.
    pub image_method: ImageMethod,

    /// PVD pixel update rule.
    pub pvd_variant: PvdVariant,
}

impl StegoConfig {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get the path to the default configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_dir()?.join("config.toml"))
    }
}

/// Get the steganote config directory (`~/.steganote`).
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".steganote"))
        .ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = StegoConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, StegoConfig::default());
        assert_eq!(config.image_method, ImageMethod::Pvd);
        assert_eq!(config.pvd_variant, PvdVariant::RangePreserving);
    }

    #[test]
    fn test_parse() {
        let config: StegoConfig =
            toml::from_str("image_method = \"lsb\"\npvd_variant = \"legacy\"\n").unwrap();
        assert_eq!(config.image_method, ImageMethod::Lsb);
        assert_eq!(config.pvd_variant, PvdVariant::Legacy);

        let partial: StegoConfig = toml::from_str("pvd_variant = \"legacy\"").unwrap();
        assert_eq!(partial.image_method, ImageMethod::Pvd);
    }

    #[test]
    fn test_rejects_unknown_method() {
        let result: Result<StegoConfig, _> = toml::from_str("image_method = \"dct\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "image_method = \"lsb\"\npvd_variant = \"legacy\"\n").unwrap();

        let config = StegoConfig::load_from(&path).unwrap();
        assert_eq!(
            config,
            StegoConfig {
                image_method: ImageMethod::Lsb,
                pvd_variant: PvdVariant::Legacy,
            }
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "image_method = ").unwrap();

        assert!(matches!(
            StegoConfig::load_from(&path),
            Err(ConfigError::TomlParseError(_))
        ));
    }
}
