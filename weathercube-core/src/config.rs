use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    device::{DEFAULT_HOST, DEFAULT_PORT, DeviceClient},
    location::DEFAULT_GEOIP_URL,
    model::Coordinates,
    provider::ProviderId,
};

/// Daemon configuration.
///
/// Stored as TOML on disk; command line and environment values are layered
/// on top with [`Config::merge`]. Every field is optional and falls back to
/// a built-in default.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Weather provider id, e.g. "darksky" or "openweather".
    pub provider: Option<String>,
    pub api_key: Option<String>,

    /// Fixed location. Only used when both are set.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub device_host: Option<String>,
    pub device_port: Option<u16>,

    pub geoip_url: Option<String>,
}

impl Config {
    /// The configured provider, defaulting to Dark Sky.
    pub fn provider_id(&self) -> Result<ProviderId> {
        match &self.provider {
            Some(s) => ProviderId::try_from(s.as_str()),
            None => Ok(ProviderId::default()),
        }
    }

    /// True when no usable API key is set; empty keys count as missing.
    pub fn missing_api_key(&self) -> bool {
        self.api_key.as_deref().is_none_or(str::is_empty)
    }

    pub fn coordinates_override(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    pub fn device_client(&self) -> DeviceClient {
        DeviceClient::new(
            self.device_host.as_deref().unwrap_or(DEFAULT_HOST),
            self.device_port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn geoip_url(&self) -> &str {
        self.geoip_url.as_deref().unwrap_or(DEFAULT_GEOIP_URL)
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            provider: overrides.provider.or(self.provider),
            api_key: overrides.api_key.or(self.api_key),
            latitude: overrides.latitude.or(self.latitude),
            longitude: overrides.longitude.or(self.longitude),
            device_host: overrides.device_host.or(self.device_host),
            device_port: overrides.device_port.or(self.device_port),
            geoip_url: overrides.geoip_url.or(self.geoip_url),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathercube", "weathercube")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
