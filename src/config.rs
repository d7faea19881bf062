//! Configuration management for EcoLumina capture
//!
//! Loads and saves the blur detector tuning and capture settings as TOML.

use crate::capture::CaptureMode;
use crate::errors::ConfigError;
use crate::quality::BlurConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Message shown to the user when a capture is rejected as blurry
pub const DEFAULT_BLURRY_MESSAGE: &str =
    "The image looks blurry. Please hold your phone steady and try again.";

/// JPEG quality for accepted captures (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 60;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcoLuminaConfig {
    pub detector: BlurConfig,
    pub capture: CaptureConfig,
}

/// Capture gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// JPEG quality for encoded captures (1-100)
    pub jpeg_quality: u8,
    /// Retry message returned with a blurry rejection
    pub blurry_message: String,
    /// Mode used when the caller does not pick one
    pub default_mode: CaptureMode,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            blurry_message: DEFAULT_BLURRY_MESSAGE.to_string(),
            default_mode: CaptureMode::Strict,
        }
    }
}

impl EcoLuminaConfig {
    /// Load configuration from a TOML file, falling back to defaults if it does not exist
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: EcoLuminaConfig = toml::from_str(&contents)?;
        config.validate()?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from("ecolumina.toml")
    }

    /// Load from the default location, or use defaults on any error
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.detector.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Blur threshold must be a non-negative number, got {}",
                threshold
            )));
        }

        let scale = self.detector.downscale_factor;
        if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "Downscale factor must be in (0, 1], got {}",
                scale
            )));
        }

        if self.capture.jpeg_quality == 0 || self.capture.jpeg_quality > 100 {
            return Err(ConfigError::Invalid(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }

        if self.capture.blurry_message.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Blurry message must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
