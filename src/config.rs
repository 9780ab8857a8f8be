use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Bucket holding the uploaded recordings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible providers.
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub mode: RelayMode,
    /// Required when `mode = "nats"`.
    pub nats_url: Option<String>,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    /// Single-process loopback.
    #[default]
    Local,
    /// Shared room across server processes.
    Nats,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            mode: RelayMode::Local,
            nats_url: None,
            subject_prefix: default_subject_prefix(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_subject_prefix() -> String {
    "greenroom.room".to_string()
}

impl Config {
    /// Load the layered configuration: file first, then `GREENROOM_*`
    /// environment variables override (`GREENROOM_STORAGE__BUCKET`,
    /// `GREENROOM_STORAGE__SECRET_ACCESS_KEY`, ...). Missing or invalid
    /// required values fail here, before anything binds or connects.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("GREENROOM").separator("__"))
            .build()
            .context("Failed to read configuration")?;

        let cfg: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.storage.bucket.is_empty() {
            bail!("storage.bucket must not be empty");
        }
        if self.storage.access_key_id.is_empty() || self.storage.secret_access_key.is_empty() {
            bail!("storage credentials must not be empty");
        }
        if self.relay.mode == RelayMode::Nats && self.relay.nats_url.is_none() {
            bail!("relay.nats_url is required when relay.mode = \"nats\"");
        }
        Ok(())
    }
}
