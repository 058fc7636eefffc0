use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::completion::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::config::io::ConfigError;
use crate::core::zones::ZoneId;

/// User settings persisted in `config.toml`. Every key is optional.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Zone the interactive UI opens in
    pub default_zone: Option<ZoneId>,
    /// Gemini model identifier
    pub model: Option<String>,
    /// Base URL of the generative language API, without the `/models/...` suffix
    pub base_url: Option<String>,
}

/// Keys accepted by `fivepoints set` and `fivepoints unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DefaultZone,
    Model,
    BaseUrl,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [ConfigKey::DefaultZone, ConfigKey::Model, ConfigKey::BaseUrl];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::DefaultZone => "default-zone",
            ConfigKey::Model => "model",
            ConfigKey::BaseUrl => "base-url",
        }
    }

    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        let normalized = key.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn effective_zone(&self) -> ZoneId {
        self.default_zone.unwrap_or_default()
    }

    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Validates and stores `value` under `key`.
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: key.as_str(),
                message: "value must not be empty".to_string(),
            });
        }

        match key {
            ConfigKey::DefaultZone => {
                let zone = value
                    .parse::<ZoneId>()
                    .map_err(|err| ConfigError::InvalidValue {
                        key: key.as_str(),
                        message: err.to_string(),
                    })?;
                self.default_zone = Some(zone);
            }
            ConfigKey::Model => self.model = Some(value.to_string()),
            ConfigKey::BaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue {
                        key: key.as_str(),
                        message: format!("'{value}' is not an http(s) URL"),
                    });
                }
                self.base_url = Some(value.to_string());
            }
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::DefaultZone => self.default_zone = None,
            ConfigKey::Model => self.model = None,
            ConfigKey::BaseUrl => self.base_url = None,
        }
    }
}
