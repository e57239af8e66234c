use crate::api::client::Coordinates;
use crate::api::constants;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceEntry>,
}

/// HTTP settings for metadata retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "constants::default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    constants::DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: constants::default_user_agent(),
        }
    }
}

/// A registered service: either `url`, or `base_url` + `service_name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub base_url: Option<String>,
    pub service_name: Option<String>,
    pub url: Option<String>,
}

impl ServiceEntry {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (&self.base_url, &self.service_name, &self.url) {
            (Some(base_url), Some(service_name), _) => {
                Some(Coordinates::service(base_url.clone(), service_name.clone()))
            }
            (_, _, Some(url)) => Some(Coordinates::url(url.clone())),
            _ => None,
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("odata-metadata-sync")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".odata-metadata-sync")
        };

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!("Loaded config with {} services", config.services.len());
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(dir) = config_path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
                info!("Created config directory: {:?}", dir);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved to {:?}", config_path);
        Ok(())
    }

    pub fn service_coordinates(&self, name: &str) -> Result<Coordinates> {
        let entry = self
            .services
            .get(name)
            .with_context(|| format!("Service '{}' not found in config", name))?;

        entry.coordinates().with_context(|| {
            format!(
                "Service '{}' needs either base_url + service_name or url",
                name
            )
        })
    }
}
