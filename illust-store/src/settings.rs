use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::local::LocalStorageError;

const APP_DIR: &str = "illustdash";
const PLACEHOLDER_KEY_MARKER: &str = "YOUR_";
const MIN_ANON_KEY_LEN: usize = 20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Project URL, e.g. "https://abcd.supabase.co"
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory for the local project blob. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot determine config directory")]
    NoConfigDir,
    #[error("Failed to read settings: {0}")]
    Config(#[from] config::ConfigError),
}

impl Settings {
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        Ok(dirs::config_dir()
            .ok_or(SettingsError::NoConfigDir)?
            .join(APP_DIR)
            .join("config.toml"))
    }

    /// Layered load: the optional config file first, then `ILLUSTDASH_*`
    /// environment variables (`ILLUSTDASH_REMOTE__URL`, ...).
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::config_path()?;
        Self::load_from(Some(&path))
    }

    pub fn load_from(file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("ILLUSTDASH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize::<Settings>()?)
    }

    pub fn data_dir(&self) -> Result<PathBuf, LocalStorageError> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::data_dir()
                .ok_or(LocalStorageError::NoDataDir)?
                .join(APP_DIR)),
        }
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        PersistenceMode::resolve(&self.remote)
    }
}

/// Where the store persists. Decided once when the store is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceMode {
    Remote(RemoteConfig),
    Local,
}

impl PersistenceMode {
    /// Checks the configured endpoint and key for plausibility. Never touches
    /// the network.
    pub fn resolve(remote: &RemoteSettings) -> Self {
        let (Some(url), Some(anon_key)) = (remote.url.as_deref(), remote.anon_key.as_deref())
        else {
            tracing::info!("No remote backend configured, running in local storage mode");
            return PersistenceMode::Local;
        };

        match RemoteConfig::parse(url, anon_key) {
            Ok(config) => {
                tracing::info!(url = %config.url, "Using remote backend");
                PersistenceMode::Remote(config)
            }
            Err(reason) => {
                tracing::info!("Remote backend not usable ({reason}), running in local storage mode");
                PersistenceMode::Local
            }
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, PersistenceMode::Remote(_))
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: Url,
    pub anon_key: String,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

impl RemoteConfig {
    pub fn parse(url: &str, anon_key: &str) -> Result<Self, String> {
        let url = Url::parse(url.trim()).map_err(|e| format!("invalid URL: {e}"))?;
        if url.scheme() != "https" {
            return Err("URL must use https".to_string());
        }
        if !url.host_str().is_some_and(|host| host.contains(".supabase.co")) {
            return Err("URL is not a Supabase project URL".to_string());
        }

        let anon_key = anon_key.trim();
        if anon_key.len() <= MIN_ANON_KEY_LEN {
            return Err("anon key is too short".to_string());
        }
        if anon_key.contains(PLACEHOLDER_KEY_MARKER) {
            return Err("anon key is still a placeholder".to_string());
        }

        Ok(Self {
            url,
            anon_key: anon_key.to_string(),
        })
    }
}
