use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{BffError, Result};
use crate::session::MAX_EXPIRY_HOURS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Anything other than `production` counts as development.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub client_secret: String,
    pub cookie_secret: String,
    pub environment: Environment,
    pub api_base_url: String,
    pub origin: String,
    pub session_ttl_hours: u64,
    pub cookie_secure: bool,
    pub request_timeout_secs: u64,
    pub token_max_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            client_secret: String::new(),
            cookie_secret: String::new(),
            environment: Environment::Development,
            api_base_url: "http://localhost:8002/v1".to_string(),
            origin: "http://localhost:4000".to_string(),
            session_ttl_hours: 24,
            cookie_secure: false,
            request_timeout_secs: 30,
            token_max_attempts: 2,
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BffError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| BffError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Reads `CONFIG_PATH` (optional TOML file), then lets environment
    /// variables override it, then validates.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load_from_file(path)?,
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_number("PORT", &port)?;
        }
        if let Some(secret) = lookup("CLIENT_SECRET") {
            self.client_secret = secret;
        }
        if let Some(secret) = lookup("COOKIE_SECRET") {
            self.cookie_secret = secret;
        }
        if let Some(env) = lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
            self.environment = Environment::parse(&env);
        }
        if let Some(url) = lookup("API_URL") {
            self.api_base_url = url;
        }
        if let Some(origin) = lookup("ORIGIN") {
            self.origin = origin;
        }
        if let Some(hours) = lookup("SESSION_TTL_HOURS") {
            self.session_ttl_hours = parse_number("SESSION_TTL_HOURS", &hours)?;
        }
        if let Some(secure) = lookup("COOKIE_SECURE") {
            self.cookie_secure = parse_flag(&secure);
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_number("REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(attempts) = lookup("TOKEN_MAX_ATTEMPTS") {
            self.token_max_attempts = parse_number("TOKEN_MAX_ATTEMPTS", &attempts)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_secret.is_empty() {
            return Err(BffError::Config("CLIENT_SECRET is not set".to_string()));
        }
        if self.cookie_secret.is_empty() {
            return Err(BffError::Config("COOKIE_SECRET is not set".to_string()));
        }
        if self.token_max_attempts == 0 {
            return Err(BffError::Config(
                "TOKEN_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        if self.session_ttl_hours > MAX_EXPIRY_HOURS {
            return Err(BffError::Config(format!(
                "SESSION_TTL_HOURS must be at most {}, got {}",
                MAX_EXPIRY_HOURS, self.session_ttl_hours
            )));
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(BffError::Config(format!(
                "API_URL must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| BffError::Config(format!("Invalid {} value '{}': {}", key, raw, e)))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
