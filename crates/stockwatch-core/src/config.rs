use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::AlertSettings;

/// Main configuration structure
///
/// Loaded from a TOML file, with secrets overridable from the environment
/// at load time. Priority: Env > File > Defaults. Core logic only ever
/// sees the resulting struct - nothing below this layer reads env vars.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub shopify: ShopifyConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl Config {
    /// Load config from the default location, or fall back to defaults
    pub fn load() -> crate::Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default().with_env_overrides()),
        }
    }

    /// Load config from an explicit file path
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config.with_env_overrides())
    }

    /// Secrets can come from the environment instead of sitting in a file
    fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var("SHOPIFY_ACCESS_TOKEN") {
            self.shopify.access_token = Some(token);
        }
        if let Ok(key) = std::env::var("SENDGRID_API_KEY") {
            self.email.api_key = Some(key);
        }
        if let Ok(secret) = std::env::var("STOCKWATCH_WEBHOOK_SECRET") {
            self.server.webhook_secret = Some(secret);
        }
        if let Ok(token) = std::env::var("STOCKWATCH_API_TOKEN") {
            self.server.api_token = Some(token);
        }
        self
    }

    /// Get the config file path
    /// Uses XDG on Linux/macOS, AppData on Windows
    fn config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("stockwatch").join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyConfig {
    /// Shop handle, i.e. the `my-store` in `my-store.myshopify.com`
    #[serde(default)]
    pub store: String,

    /// Admin API access token; usually supplied via SHOPIFY_ACCESS_TOKEN
    pub access_token: Option<String>,

    /// Admin API version to pin
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_api_version() -> String {
    "2023-10".to_string()
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            store: String::new(),
            access_token: None,
            api_version: default_api_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Quantities at or below this count as low stock
    #[serde(default = "default_threshold")]
    pub inventory_threshold: i64,

    /// Days before an unresolved alert gets a follow-up email
    #[serde(default = "default_reminder_days")]
    pub reminder_days: i64,
}

fn default_threshold() -> i64 {
    2
}

fn default_reminder_days() -> i64 {
    7
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            inventory_threshold: default_threshold(),
            reminder_days: default_reminder_days(),
        }
    }
}

impl AlertsConfig {
    pub fn settings(&self) -> AlertSettings {
        AlertSettings {
            inventory_threshold: self.inventory_threshold,
            reminder_after: chrono::Duration::days(self.reminder_days),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmailConfig {
    /// From address on every alert email
    pub sender: String,

    /// Who gets the alerts
    #[serde(default)]
    pub recipients: Vec<String>,

    /// SendGrid API key; usually supplied via SENDGRID_API_KEY
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the webhook server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Shared secret for verifying commerce webhook signatures
    pub webhook_secret: Option<String>,

    /// Bearer token accepted from the scheduler
    pub api_token: Option<String>,
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            webhook_secret: None,
            api_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LedgerConfig {
    /// Where the alert state JSON lives; platform data dir when unset
    pub path: Option<PathBuf>,
}
