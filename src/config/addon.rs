//! Home Assistant add-on environment.
//!
//! The supervisor passes the add-on options as a JSON object in
//! `ADDON_OPTIONS` and the listening port in `PORT`. `ENABLE_PROXY_FIX`
//! controls whether forwarded headers from the ingress proxy are trusted.

use crate::config::{AppConfig, AuthConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AddonOptions {
    pub grocy_url: Option<String>,
    pub grocy_api_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub search_url_template: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AddonEnvironment {
    pub port: Option<String>,
    pub options: Option<String>,
    pub proxy_fix: Option<String>,
}

impl AddonEnvironment {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT").ok(),
            options: std::env::var("ADDON_OPTIONS").ok(),
            proxy_fix: std::env::var("ENABLE_PROXY_FIX").ok(),
        }
    }

    /// Parse `ADDON_OPTIONS`. Malformed JSON is logged and treated as empty.
    pub fn parse_options(&self) -> AddonOptions {
        let Some(raw) = self.options.as_deref().filter(|raw| !raw.trim().is_empty()) else {
            return AddonOptions::default();
        };

        match serde_json::from_str(raw) {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!("Ignoring malformed ADDON_OPTIONS: {}", e);
                AddonOptions::default()
            }
        }
    }

    /// Overlay the add-on environment on top of `config`. Empty strings count
    /// as unset, like the add-on UI sends them.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port.as_deref() {
            match port.trim().parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(e) => tracing::warn!("Ignoring invalid PORT '{}': {}", port, e),
            }
        }

        if let Some(flag) = self.proxy_fix.as_deref() {
            config.server.trust_forwarded_headers =
                matches!(flag.trim().to_lowercase().as_str(), "true" | "1" | "yes");
        }

        let options = self.parse_options();
        if let Some(url) = non_empty(options.grocy_url) {
            config.grocy.url = url;
        }
        if let Some(key) = non_empty(options.grocy_api_key) {
            config.grocy.api_key = key;
        }
        if let Some(template) = non_empty(options.search_url_template) {
            config.sync.search_url_template = template;
        }
        if let (Some(username), Some(password)) =
            (non_empty(options.username), non_empty(options.password))
        {
            config.auth = Some(AuthConfig::new(username, password));
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
