//! Environment driven configuration, read once at startup.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use jsonwebtoken::Algorithm;

#[derive(Debug, Clone)]
pub struct Config {
    /// Identity provider domain, e.g. `coffee.eu.auth0.com`.
    pub auth_domain: String,
    pub api_audience: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub algorithms: Vec<Algorithm>,
    pub jwks_time_to_live: Duration,
    pub jwks_refetch_cooldown: Duration,
    /// Applies to every outbound call to the identity provider.
    pub http_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub barista_role_id: String,
    pub manager_role_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let seconds = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            match lookup(key) {
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::Invalid { key, value }),
                None => Ok(Duration::from_secs(default)),
            }
        };

        let algorithms = match lookup("ALGORITHMS") {
            Some(value) => parse_algorithms(&value)?,
            None => vec![Algorithm::RS256],
        };

        let bind_addr = match lookup("BIND_ADDR") {
            Some(value) => value
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::Invalid {
                    key: "BIND_ADDR",
                    value,
                })?,
            None => SocketAddr::from(([127, 0, 0, 1], 5000)),
        };

        Ok(Self {
            auth_domain: required("AUTH0_DOMAIN")?,
            api_audience: required("API_AUDIENCE")?,
            client_id: lookup("AUTH0_CLIENT_ID"),
            client_secret: lookup("AUTH0_CLIENT_SECRET"),
            algorithms,
            jwks_time_to_live: seconds("JWKS_TTL_SECONDS", 600)?,
            jwks_refetch_cooldown: seconds("JWKS_REFETCH_COOLDOWN_SECONDS", 30)?,
            http_timeout: seconds("HTTP_TIMEOUT_SECONDS", 5)?,
            bind_addr,
            barista_role_id: lookup("BARISTA_ROLE_ID")
                .unwrap_or_else(|| String::from("rol_PRrubjxSFgct2EQ2")),
            manager_role_id: lookup("MANAGER_ROLE_ID")
                .unwrap_or_else(|| String::from("rol_VTeR8Pn9PCmMVWqI")),
        })
    }
}

fn parse_algorithms(value: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = value
        .split(',')
        .map(str::trim)
        .filter(|alg| !alg.is_empty())
        .map(|alg| {
            Algorithm::from_str(alg).map_err(|_| ConfigError::Invalid {
                key: "ALGORITHMS",
                value: value.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid {
            key: "ALGORITHMS",
            value: value.to_string(),
        });
    }

    Ok(algorithms)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
