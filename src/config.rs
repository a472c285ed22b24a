//! Layered application configuration.
//!
//! Values come from built-in defaults, then `config.toml` in the platform
//! config directory, then `NFE_`-prefixed environment variables
//! (`NFE_UPLOAD__INCREMENT=20` sets `upload.increment`).

use crate::error::{Error, Result};
use derivative::Derivative;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "nfe-uploader";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "NFE_";

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoints: EndpointConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Derivative, Deserialize, Serialize, Clone)]
#[derivative(Debug, Default)]
#[serde(default)]
pub struct EndpointConfig {
    #[derivative(Default(value = "\"http://localhost:8000/ingest\".to_string()"))]
    pub ingest_url: String,

    #[derivative(Default(value = "\"http://localhost:8000/dashboard\".to_string()"))]
    pub dashboard_url: String,

    #[derivative(Default(value = "\"http://localhost:8000/home\".to_string()"))]
    pub home_url: String,

    #[derivative(Default(
        value = "\"https://i2a2-aiops-agentes-de-ti-n8n.bysger.easypanel.host/webhook/b6021f43-0ee5-4fdc-9d2b-ae06f45d1888\".to_string()"
    ))]
    pub documents_url: String,

    #[derivative(Default(
        value = "\"https://i2a2-aiops-agentes-de-ti-api2.bysger.easypanel.host/analise\".to_string()"
    ))]
    pub analysis_url: String,

    #[derivative(Default(
        value = "\"https://i2a2-aiops-agentes-de-ti-n8n.bysger.easypanel.host/webhook/f04cbf21-21b2-4777-87ef-6b801b1355a5/chat\".to_string()"
    ))]
    pub chat_url: String,

    #[derivative(Default(value = "\"28993786-3aca-4b83-8fd9-fbff5ef9ef5c\".to_string()"))]
    pub chat_session_id: String,

    /// Per-request timeout for the read-only endpoints.
    #[derivative(Default(value = "30"))]
    pub timeout_seconds: u64,
}

#[derive(Derivative, Deserialize, Serialize, Clone)]
#[derivative(Debug, Default)]
#[serde(default)]
pub struct UploadConfig {
    #[derivative(Default(value = "300"))]
    pub tick_interval_ms: u64,

    /// Percentage points added per tick.
    #[derivative(Default(value = "10"))]
    pub increment: u8,

    #[derivative(Default(value = "255"))]
    pub max_filename_len: usize,

    #[derivative(Default(
        value = "vec![\"application/zip\".to_string(), \"application/x-zip-compressed\".to_string()]"
    ))]
    pub allowed_mime_types: Vec<String>,
}

#[derive(Derivative, Deserialize, Serialize, Clone)]
#[derivative(Debug, Default)]
#[serde(default)]
pub struct NotificationConfig {
    #[derivative(Default(value = "5"))]
    pub capacity: usize,

    #[derivative(Default(value = "5"))]
    pub ttl_seconds: u64,
}

#[derive(Derivative, Deserialize, Serialize, Clone)]
#[derivative(Debug, Default)]
#[serde(default)]
pub struct PollingConfig {
    #[derivative(Default(value = "30"))]
    pub interval_seconds: u64,
}

#[derive(Derivative, Deserialize, Serialize, Clone)]
#[derivative(Debug, Default)]
#[serde(default)]
pub struct ExportConfig {
    #[derivative(Default(value = "default_export_dir()"))]
    pub directory: PathBuf,
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl UploadConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl NotificationConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl AppConfig {
    /// Default location of the user config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load defaults, the user config file and environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        Self::load_from(path.as_deref())
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            if path.exists() {
                tracing::debug!("Reading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }
        let config: AppConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload.increment == 0 || self.upload.increment > 100 {
            return Err(Error::Config(format!(
                "upload.increment must be between 1 and 100, got {}",
                self.upload.increment
            )));
        }
        if self.upload.tick_interval_ms == 0 {
            return Err(Error::Config(
                "upload.tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.upload.max_filename_len == 0 {
            return Err(Error::Config(
                "upload.max_filename_len must be positive".to_string(),
            ));
        }
        if self.notifications.capacity == 0 {
            return Err(Error::Config(
                "notifications.capacity must be positive".to_string(),
            ));
        }
        if self.polling.interval_seconds == 0 {
            return Err(Error::Config(
                "polling.interval_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
