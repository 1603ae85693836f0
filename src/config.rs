//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::catalogue::ServicePackage;
use crate::model::{ModelSet, DEFAULT_EDIT_MODEL, DEFAULT_VISION_MODEL, DEFAULT_VISUAL_MODEL};

/// Public Gemini REST endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Model selection per operation.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Image output configuration for previews.
    #[serde(default)]
    pub image: ImageSettings,

    /// Remote call settings.
    #[serde(default)]
    pub gateway: GatewaySettings,

    /// Extra or replacement service packages.
    #[serde(default)]
    pub services: Vec<ServicePackage>,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Model names (aliases allowed) per operation.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Preview generation model.
    pub visual: String,
    /// Analysis and validation model.
    pub vision: String,
    /// Photo edit model.
    pub edit: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            visual: DEFAULT_VISUAL_MODEL.to_string(),
            vision: DEFAULT_VISION_MODEL.to_string(),
            edit: DEFAULT_EDIT_MODEL.to_string(),
        }
    }
}

/// Preview image output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Aspect ratio requested from the model.
    pub aspect_ratio: String,
    /// Size class requested from the model.
    pub size: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self { aspect_ratio: "16:9".to_string(), size: "1K".to_string() }
    }
}

/// Remote call settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Deadline for a single remote call, in seconds.
    pub timeout_secs: u64,
    /// Base URL of the models endpoint.
    pub base_url: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self { timeout_secs: 120, base_url: GEMINI_API_BASE.to_string() }
    }
}

impl GatewaySettings {
    /// Deadline as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
        if config.gateway.timeout_secs == 0 {
            return Err(format!("Invalid config {}: timeout_secs must be > 0", path.display()));
        }
        Ok(config)
    }

    /// Get the Gemini API key, preferring environment variables.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        first_key([
            std::env::var("GEMINI_API_KEY").ok(),
            std::env::var("API_KEY").ok(),
            self.keys.gemini.clone(),
        ])
    }

    /// Model selection as configured (aliases not yet resolved).
    #[must_use]
    pub fn model_set(&self) -> ModelSet {
        ModelSet {
            visual: self.models.visual.clone(),
            vision: self.models.vision.clone(),
            edit: self.models.edit.clone(),
        }
    }
}

/// First candidate that is set and not blank.
fn first_key(candidates: [Option<String>; 3]) -> Option<String> {
    candidates.into_iter().flatten().find(|k| !k.trim().is_empty())
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `PARTYBUS_CONFIG` environment variable
/// 3. `~/.config/partybus-visuals/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("PARTYBUS_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/partybus-visuals/config.toml")
    } else {
        PathBuf::from("partybus-visuals.toml")
    }
}
