// File Path: src/config.rs

//! # Configuration
//!
//! Process-wide settings, read once at startup from the environment after an
//! optional `.env` file has been loaded.

use std::{env, io, net::SocketAddr, str::FromStr, time::Duration};

use tokio::net::lookup_host;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("HTTP_HOST '{host}' could not be resolved: {source}")]
    Unresolvable {
        host: String,
        #[source]
        source: std::io::Error,
    },
}

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// `REDIS_URL` when set, otherwise built from `REDIS_HOST` and `REDIS_PORT`.
    pub redis_url: String,
    /// Key namespace; plays the role of the database name.
    pub db_name: String,
    pub connect_timeout: Duration,
    pub op_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub request_timeout: Duration,
    pub store: StoreConfig,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

        Ok(Self {
            http_host: string("HTTP_HOST", "0.0.0.0"),
            http_port: parse(&lookup, "HTTP_PORT", 80)?,
            request_timeout: Duration::from_secs(parse(&lookup, "REQUEST_TIMEOUT_SECS", 10)?),
            store: StoreConfig {
                redis_url: match lookup("REDIS_URL") {
                    Some(url) => url,
                    None => format!(
                        "redis://{}:{}",
                        string("REDIS_HOST", "localhost"),
                        parse::<_, u16>(&lookup, "REDIS_PORT", 6379)?
                    ),
                },
                db_name: string("DB_NAME", "thermotify"),
                connect_timeout: Duration::from_secs(parse(
                    &lookup,
                    "STORE_CONNECT_TIMEOUT_SECS",
                    20,
                )?),
                op_timeout: Duration::from_secs(parse(&lookup, "STORE_OP_TIMEOUT_SECS", 5)?),
            },
        })
    }

    /// Resolves `HTTP_HOST` (an IP address or a host name) to the listen address.
    pub async fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let unresolvable = |source| ConfigError::Unresolvable {
            host: self.http_host.clone(),
            source,
        };

        lookup_host((self.http_host.as_str(), self.http_port))
            .await
            .map_err(unresolvable)?
            .next()
            .ok_or_else(|| {
                unresolvable(io::Error::new(io::ErrorKind::NotFound, "no addresses returned"))
            })
    }
}

fn parse<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
