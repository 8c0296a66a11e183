//! Environment-driven server configuration.
//!
//! Every external collaborator is configured with an endpoint URL and an API
//! key so deployments can point at sandboxes without code changes.

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;
/// Completions routinely take longer than the other upstreams.
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Configuration errors surfaced at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {name}")]
    MissingVar { name: String },
    #[error("environment variable {name} is invalid: {message}")]
    InvalidVar { name: String, message: String },
}

impl ConfigError {
    fn missing(name: &str) -> Self {
        Self::MissingVar {
            name: name.to_owned(),
        }
    }

    fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidVar {
            name: name.to_owned(),
            message: message.into(),
        }
    }
}

/// One upstream HTTP collaborator: where to reach it and how to authenticate.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub timeout: Duration,
}

/// Full server configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub civic: UpstreamConfig,
    pub llm: UpstreamConfig,
    /// Model identifier sent with every completion request.
    pub llm_model: String,
    pub search: UpstreamConfig,
    pub payments: UpstreamConfig,
    pub mail_vendor: UpstreamConfig,
    pub email: UpstreamConfig,
    /// Sender address on confirmation emails.
    pub email_from: String,
}

impl ServerConfig {
    /// Resolve configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or a
    /// URL, address, or duration does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup. Test seam.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_bind_addr(&lookup)?;
        let database_url = require(&lookup, "DATABASE_URL")?;
        let default_timeout = parse_timeout(&lookup, "UPSTREAM_TIMEOUT_SECS")?
            .unwrap_or(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS));
        let llm_timeout = parse_timeout(&lookup, "LLM_TIMEOUT_SECS")?
            .unwrap_or(Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS));

        Ok(Self {
            bind_addr,
            database_url,
            civic: upstream(&lookup, "CIVIC_LOOKUP", default_timeout)?,
            llm: upstream(&lookup, "LLM", llm_timeout)?,
            llm_model: lookup("LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_owned()),
            search: upstream(&lookup, "SEARCH", default_timeout)?,
            payments: upstream(&lookup, "PAYMENTS", default_timeout)?,
            mail_vendor: upstream(&lookup, "MAIL_VENDOR", default_timeout)?,
            email: upstream(&lookup, "EMAIL", default_timeout)?,
            email_from: require(&lookup, "EMAIL_FROM")?,
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::missing(name)),
    }
}

fn parse_bind_addr(lookup: &impl Fn(&str) -> Option<String>) -> Result<SocketAddr, ConfigError> {
    let raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    raw.parse()
        .map_err(|error| ConfigError::invalid("BIND_ADDR", format!("{error}")))
}

fn parse_timeout(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let seconds: u64 = raw
        .parse()
        .map_err(|error| ConfigError::invalid(name, format!("{error}")))?;
    if seconds == 0 {
        return Err(ConfigError::invalid(name, "timeout must be positive"));
    }
    Ok(Some(Duration::from_secs(seconds)))
}

/// Read `{prefix}_URL` and `{prefix}_API_KEY` into an upstream config.
fn upstream(
    lookup: &impl Fn(&str) -> Option<String>,
    prefix: &str,
    timeout: Duration,
) -> Result<UpstreamConfig, ConfigError> {
    let url_name = format!("{prefix}_URL");
    let key_name = format!("{prefix}_API_KEY");
    let raw_url = require(lookup, &url_name)?;
    let endpoint = Url::parse(&raw_url)
        .map_err(|error| ConfigError::invalid(&url_name, format!("{error}")))?;
    let api_key = require(lookup, &key_name)?;
    Ok(UpstreamConfig {
        endpoint,
        api_key,
        timeout,
    })
}
