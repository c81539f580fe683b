//! Configuration types, built from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Reply given to free-form questions once the lead dialogue is complete.
pub const DEFAULT_FALLBACK_REPLY: &str = "I can't answer open questions yet, but your details \
have been passed on and you'll hear back by email soon.";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub port: u16,
    /// JSON file holding every captured lead.
    pub leads_file: PathBuf,
    /// Relay endpoint for the chat dialogue. `None` keeps the relay in-process.
    pub relay_url: Option<String>,
    /// Upper bound on one `relay_url` round trip.
    pub relay_timeout: Duration,
    pub owner: OwnerConfig,
    /// Chat sessions idle for longer than this are discarded.
    pub session_idle_timeout: Duration,
    pub fallback_reply: String,
    /// `None` disables SMTP delivery (mail is logged instead).
    pub smtp: Option<SmtpConfig>,
}

/// Who receives lead notifications and signs the acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerConfig {
    pub email: String,
    pub name: String,
}

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
}

impl AppConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let owner_email = std::env::var("LEADS_OWNER_EMAIL")
            .map_err(|_| ConfigError::MissingEnvVar("LEADS_OWNER_EMAIL".to_string()))?;
        let owner_name =
            std::env::var("LEADS_OWNER_NAME").unwrap_or_else(|_| "The site owner".to_string());

        let idle_secs: u64 = parse_env("LEADS_SESSION_IDLE_SECS", 3600)?;
        let relay_timeout_secs: u64 = parse_env("LEADS_RELAY_TIMEOUT_SECS", 10)?;

        Ok(Self {
            bind: std::env::var("LEADS_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("LEADS_PORT", 8080)?,
            leads_file: std::env::var("LEADS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/leads.json")),
            relay_url: std::env::var("LEADS_RELAY_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            relay_timeout: Duration::from_secs(relay_timeout_secs),
            owner: OwnerConfig {
                email: owner_email,
                name: owner_name,
            },
            session_idle_timeout: Duration::from_secs(idle_secs),
            fallback_reply: std::env::var("LEADS_FALLBACK_REPLY")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_REPLY.to_string()),
            smtp: SmtpConfig::from_env()?,
        })
    }

    /// Socket address string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl SmtpConfig {
    /// Returns `None` if `SMTP_HOST` is not set (delivery disabled).
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(host) = std::env::var("SMTP_HOST") else {
            return Ok(None);
        };

        let username = std::env::var("SMTP_USERNAME").unwrap_or_default();
        let password = SecretString::from(std::env::var("SMTP_PASSWORD").unwrap_or_default());
        let from_address =
            std::env::var("SMTP_FROM_ADDRESS").unwrap_or_else(|_| username.clone());

        Ok(Some(Self {
            host,
            port: parse_env("SMTP_PORT", 587)?,
            username,
            password,
            from_address,
        }))
    }
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
