use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::countdown::CountdownConfig;
use crate::pagination::PaginationPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub exhibitions_path: String,
    pub artworks_path: String,
    /// Page size, sent verbatim as the `limit` query parameter
    pub limit: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.artic.edu/api/v1".to_string(),
            exhibitions_path: "exhibitions".to_string(),
            artworks_path: "artworks".to_string(),
            limit: "50".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Rows from the end of the list at which the next page is requested
    pub scroll_threshold: u16,
    pub stop_on_empty_page: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 8,
            stop_on_empty_page: true,
        }
    }
}

impl ListConfig {
    pub fn policy(&self) -> PaginationPolicy {
        PaginationPolicy {
            stop_on_empty_page: self.stop_on_empty_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CountdownSection {
    pub target: DateTime<Utc>,
    pub interval_secs: u64,
    pub clamp_at_zero: bool,
}

impl Default for CountdownSection {
    fn default() -> Self {
        Self {
            target: Utc
                .with_ymd_and_hms(2027, 1, 15, 10, 0, 0)
                .single()
                .unwrap_or_default(),
            interval_secs: 5,
            clamp_at_zero: false,
        }
    }
}

impl CountdownSection {
    pub fn countdown(&self) -> CountdownConfig {
        CountdownConfig {
            target: self.target,
            interval: Duration::from_secs(self.interval_secs.max(1)),
            clamp_at_zero: self.clamp_at_zero,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub list: ListConfig,
    pub countdown: CountdownSection,
}

/// ~/.config/atrium/config.toml (Linux) or ~/Library/Application Support/atrium/config.toml (macOS)
pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("atrium").join("config.toml"))
}

impl Config {
    /// Load from `path`, or the default location. Missing or invalid files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match config_path() {
                Some(p) => p,
                None => return Config::default(),
            },
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match Self::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Config::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
