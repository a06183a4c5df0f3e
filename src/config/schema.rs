use crate::api::DEFAULT_API_URL;
use crate::notify::DEFAULT_TOAST_MS;
use crate::session::DEFAULT_SPLASH_DELAY_MS;
use anyhow::{Context, Result};
use directories::UserDirs;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = ".repaykaro";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "session.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Where this config was loaded from. Computed, never serialized.
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Base URL of the remote session API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout for API calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long the first-launch splash stays up.
    #[serde(default = "default_splash_delay_ms")]
    pub splash_delay_ms: u64,

    /// Default display time for toasts.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Session store file. Relative paths resolve against the config dir.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_splash_delay_ms() -> u64 {
    DEFAULT_SPLASH_DELAY_MS
}

fn default_toast_duration_ms() -> u64 {
    DEFAULT_TOAST_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: default_config_dir()
                .unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME))
                .join(CONFIG_FILE_NAME),
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            splash_delay_ms: default_splash_delay_ms(),
            toast_duration_ms: default_toast_duration_ms(),
            store_path: None,
        }
    }
}

fn default_config_dir() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_DIR_NAME))
}

impl Config {
    /// Loads `~/.repaykaro/config.toml`, writing defaults on first use, then
    /// applies environment overrides.
    pub fn load_or_init() -> Result<Self> {
        let dir = default_config_dir().context("could not determine home directory")?;
        Self::load_or_init_at(&dir.join(CONFIG_FILE_NAME))
    }

    pub fn load_or_init_at(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str::<Config>(&raw)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        } else {
            let config = Config::default();
            config.save_to(path)?;
            tracing::info!("wrote default config to {}", path.display());
            config
        };
        config.config_path = path.to_path_buf();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = env_value("REPAYKARO_API_URL") {
            self.api_url = url;
        }
        if let Some(ms) = env_value("REPAYKARO_SPLASH_DELAY_MS").and_then(|v| v.parse::<u64>().ok())
        {
            self.splash_delay_ms = ms;
        }
        if let Some(path) = env_value("REPAYKARO_STORE_PATH") {
            self.store_path = Some(PathBuf::from(path));
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            anyhow::bail!("api_url must not be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn resolved_store_path(&self) -> PathBuf {
        match &self.store_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.config_dir().join(path),
            None => self.config_dir().join(STORE_FILE_NAME),
        }
    }

    pub fn splash_delay(&self) -> Duration {
        Duration::from_millis(self.splash_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(Config);
        serde_json::to_string_pretty(&schema).context("Failed to render config schema")
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
