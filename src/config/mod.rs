pub mod addon;
#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_contains, validate_non_empty_string, validate_range, validate_resolved, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::CliArgs;

pub const DEFAULT_GROCY_URL: &str = "http://grocy:9283";
pub const DEFAULT_SEARCH_URL_TEMPLATE: &str = "https://www.google.com/search?tbm=shop&q={query}";
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Complete runtime configuration, built once at startup and handed to the
/// components that need it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub grocy: GrocyConfig,
    pub sync: SyncConfig,
    pub auth: Option<AuthConfig>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Honor `X-Ingress-Path` when building redirects.
    pub trust_forwarded_headers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            trust_forwarded_headers: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrocyConfig {
    pub url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl Default for GrocyConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GROCY_URL.to_string(),
            api_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl GrocyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    pub settle_delay_ms: u64,
    pub search_url_template: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1000,
            search_url_template: DEFAULT_SEARCH_URL_TEMPLATE.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Sessions older than this are dropped and must log in again.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,
}

fn default_cookie_name() -> String {
    "grocy_frame_session".to_string()
}

fn default_session_ttl_hours() -> u64 {
    24 * 7
}

impl AuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            cookie_name: default_cookie_name(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_hours * 3600)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn auth_enabled(&self) -> bool {
        self.auth.is_some()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("grocy.url", &self.grocy.url)?;
        validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validate_range("grocy.timeout_seconds", self.grocy.timeout_seconds, 1, 300)?;
        validate_contains(
            "sync.search_url_template",
            &self.sync.search_url_template,
            QUERY_PLACEHOLDER,
        )?;
        validate_url(
            "sync.search_url_template",
            &self.sync.search_url_template.replace(QUERY_PLACEHOLDER, "q"),
        )?;

        if let Some(auth) = &self.auth {
            validate_non_empty_string("auth.username", &auth.username)?;
            validate_non_empty_string("auth.password", &auth.password)?;
            validate_non_empty_string("auth.cookie_name", &auth.cookie_name)?;
            validate_range("auth.session_ttl_hours", auth.session_ttl_hours, 1, 24 * 365)?;
            validate_resolved("auth.username", &auth.username)?;
            validate_resolved("auth.password", &auth.password)?;
        }

        validate_resolved("grocy.api_key", &self.grocy.api_key)?;

        if self.grocy.api_key.is_empty() {
            tracing::warn!("grocy.api_key is empty, Grocy will most likely reject every request");
        }

        Ok(())
    }
}
