use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.memset.com";

/// Memset silently ignores any other TTL instead of rejecting the record.
pub const VALID_TTLS: [u32; 10] = [0, 300, 600, 1800, 3600, 7200, 10800, 21600, 43200, 86400];

pub const ENV_AUTH_TOKEN: &str = "MEMSET_AUTH_TOKEN";
pub const ENV_BASE_URL: &str = "MEMSET_BASE_URL";
pub const ENV_TTL: &str = "MEMSET_TTL";
pub const ENV_PROPAGATION_TIMEOUT: &str = "MEMSET_PROPAGATION_TIMEOUT";
pub const ENV_POLLING_INTERVAL: &str = "MEMSET_POLLING_INTERVAL";
pub const ENV_HTTP_TIMEOUT: &str = "MEMSET_HTTP_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub auth_token: String,
    pub ttl: u32,

    #[serde(deserialize_with = "seconds")]
    pub propagation_timeout: Duration,

    #[serde(deserialize_with = "seconds")]
    pub polling_interval: Duration,

    #[serde(deserialize_with = "seconds")]
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: String::new(),
            ttl: 300,
            propagation_timeout: Duration::from_secs(60),
            polling_interval: Duration::from_secs(5),
            http_timeout: Duration::from_secs(30),
        }
    }
}

fn seconds<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`, which plays the role of the process
    /// environment. Unset values fall back to the defaults.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth_token = lookup(ENV_AUTH_TOKEN)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "some credentials information are missing: {}",
                    ENV_AUTH_TOKEN
                ))
            })?;

        let mut cfg = Self {
            auth_token,
            ..Self::default()
        };

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            cfg.base_url = base_url;
        }
        if let Some(ttl) = parse_env::<u32, _>(&lookup, ENV_TTL)? {
            cfg.ttl = ttl;
        }
        if let Some(secs) = parse_env::<u64, _>(&lookup, ENV_PROPAGATION_TIMEOUT)? {
            cfg.propagation_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env::<u64, _>(&lookup, ENV_POLLING_INTERVAL)? {
            cfg.polling_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env::<u64, _>(&lookup, ENV_HTTP_TIMEOUT)? {
            cfg.http_timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(yaml)?;
        Ok(cfg)
    }

    /// Checks the config and fills in what may be left empty. The token is
    /// checked before anything else.
    pub fn validate(mut self) -> Result<Self> {
        if self.auth_token.trim().is_empty() {
            return Err(Error::InvalidConfig("credentials missing".to_string()));
        }

        if !VALID_TTLS.contains(&self.ttl) {
            return Err(Error::InvalidConfig(format!("TTL {} is invalid", self.ttl)));
        }

        let base_url = self.base_url.trim().trim_end_matches('/');
        self.base_url = if base_url.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            base_url.to_string()
        };

        Ok(self)
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::ParseError(format!("{}={}: {}", key, raw, e))),
        _ => Ok(None),
    }
}
