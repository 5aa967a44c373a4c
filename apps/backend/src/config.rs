//! Environment configuration

use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
const DEFAULT_APP_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Hosted auth base URL, without a trailing slash
    pub auth_url: String,
    pub auth_anon_key: String,
    pub checkout_url: String,
    pub dictionary_api_url: String,
    /// Front-end origin used for CORS and checkout redirects
    pub app_origin: String,
    pub host: String,
    pub port: u16,
    pub http_timeout: Duration,
    /// How long an owner's workspace may sit unused before it is evicted
    pub workspace_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; used by `from_env` and tests.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| get(key).with_context(|| format!("{key} must be set"));

        let auth_url = required("AUTH_URL")?.trim_end_matches('/').to_string();
        let checkout_url = get("CHECKOUT_URL")
            .unwrap_or_else(|| format!("{auth_url}/functions/v1/stripe-checkout"));

        let port = match get("PORT") {
            Some(port) => port.parse().with_context(|| format!("invalid PORT: {port}"))?,
            None => 3000,
        };
        let timeout_secs: u64 = match get("HTTP_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse()
                .with_context(|| format!("invalid HTTP_TIMEOUT_SECS: {secs}"))?,
            None => 10,
        };
        let idle_secs: u64 = match get("WORKSPACE_IDLE_SECS") {
            Some(secs) => secs
                .parse()
                .with_context(|| format!("invalid WORKSPACE_IDLE_SECS: {secs}"))?,
            None => 1800,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            auth_anon_key: required("AUTH_ANON_KEY")?,
            auth_url,
            checkout_url,
            dictionary_api_url: get("DICTIONARY_API_URL")
                .unwrap_or_else(|| DEFAULT_DICTIONARY_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            app_origin: get("APP_ORIGIN")
                .unwrap_or_else(|| DEFAULT_APP_ORIGIN.to_string())
                .trim_end_matches('/')
                .to_string(),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            http_timeout: Duration::from_secs(timeout_secs),
            workspace_idle: Duration::from_secs(idle_secs),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Where checkout returns after a successful payment.
    pub fn success_url(&self) -> String {
        format!("{}/success", self.app_origin)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/", self.app_origin)
    }
}
