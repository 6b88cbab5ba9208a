use anyhow::{Context, Result};
use npo_parser::{downloader::DEFAULT_DOWNLOADER, extractor::UrlMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "npo-cli";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Netscape-format cookie file; a missing file means unauthenticated requests
    pub cookie_file: PathBuf,

    /// External downloader binary
    pub downloader: String,

    /// Directory the manifest is staged in while it is inspected
    pub work_dir: PathBuf,

    /// Request timeout in seconds for page, token and stream-link requests
    pub timeout: u64,

    /// Accepted watch-page url form
    pub url_mode: UrlMode,

    /// Default proxy URL (supports http, https, socks5)
    pub proxy: Option<String>,

    pub proxy_username: Option<String>,

    pub proxy_password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cookie_file: PathBuf::from("cookies.txt"),
            downloader: DEFAULT_DOWNLOADER.to_string(),
            work_dir: PathBuf::from("."),
            timeout: 30,
            url_mode: UrlMode::Current,
            proxy: None,
            proxy_username: None,
            proxy_password: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                if path.exists() {
                    let content = std::fs::read_to_string(path)
                        .context("Failed to read configuration file")?;
                    toml::from_str(&content).context("Failed to parse configuration file")
                } else {
                    Ok(Self::default())
                }
            }
            None => confy::load(APP_NAME, None).context("Failed to load configuration"),
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, None).ok()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, toml_string).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Reset configuration to defaults and save
    pub fn reset(config_path: Option<&Path>) -> Result<()> {
        let path = config_path
            .map(|p| p.to_path_buf())
            .or_else(Self::default_config_path)
            .context("No configuration path available")?;

        Self::default().save(&path)
    }

    pub fn show(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration for display")
    }
}
