use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub wizard: WizardConfig,
    pub catalog: CatalogConfig,
    pub mock: MockConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WizardConfig {
    #[serde(default = "default_submit_cooldown_ms")]
    pub submit_cooldown_ms: u64,
    #[serde(default = "default_full_section_size")]
    pub full_section_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_false")]
    pub enabled: bool,
    #[serde(default = "default_model_type")]
    pub model_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content).context("Failed to parse config TOML")?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise falls back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::warn!("Config {:?} not found, using defaults", path.as_ref());
            Ok(Self::default())
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WizardConfig {
    pub fn submit_cooldown(&self) -> Duration {
        Duration::from_millis(self.submit_cooldown_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            submit_cooldown_ms: default_submit_cooldown_ms(),
            full_section_size: default_full_section_size(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            enabled: default_false(),
            model_type: default_model_type(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_submit_cooldown_ms() -> u64 {
    400
}

fn default_full_section_size() -> usize {
    12
}

fn default_catalog_path() -> String {
    "data/dataset_summary.json".to_string()
}

fn default_model_type() -> String {
    "mock-linear".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_false() -> bool {
    false
}
