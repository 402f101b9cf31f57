//! Configuration, built from environment variables.

use std::net::SocketAddr;

use crate::error::ConfigError;

/// Forwarding service configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Fixed destination address every matching email is forwarded to.
    pub forward_to: String,
    /// Domain whose recipients are forwarded (suffix match on `@domain`).
    pub domain: String,
    /// Sender address on outbound messages.
    pub from_email: String,
    /// Send a notification summary instead of attaching the original.
    pub notify_only: bool,
    pub storage: StorageConfig,
    pub smtp: SmtpConfig,
    /// Address the invocation endpoint listens on.
    pub bind_addr: SocketAddr,
}

/// Object-store access configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL; objects are fetched from `{endpoint}/{bucket}/{key}`.
    pub endpoint: String,
}

/// SMTP submission configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// When set, submission goes over TLS with AUTH; otherwise plaintext.
    pub credentials: Option<SmtpCredentials>,
}

#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl RelayConfig {
    /// Build config from environment variables. Every variable has a
    /// default, so an empty environment yields a usable config.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let forward_to =
            lookup("FORWARD_TO_EMAIL").unwrap_or_else(|| "ryanmette@duck.com".to_string());
        let domain = lookup("DOMAIN").unwrap_or_else(|| "rbios.net".to_string());
        let from_email = lookup("FROM_EMAIL").unwrap_or_else(|| "noreply@rbios.net".to_string());

        let notify_only = match lookup("NOTIFY_ONLY") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "NOTIFY_ONLY".to_string(),
                message: format!("expected true or false, got {raw:?}"),
            })?,
            None => false,
        };

        let endpoint = lookup("STORAGE_ENDPOINT")
            .unwrap_or_else(|| "http://localhost:9000".to_string())
            .trim_end_matches('/')
            .to_string();

        let smtp_host = lookup("SMTP_HOST").unwrap_or_else(|| "localhost".to_string());
        let smtp_port = match lookup("SMTP_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SMTP_PORT".to_string(),
                message: format!("expected a port number, got {raw:?}"),
            })?,
            None => 25,
        };
        let credentials = match (lookup("SMTP_USERNAME"), lookup("SMTP_PASSWORD")) {
            (Some(username), Some(password)) => Some(SmtpCredentials { username, password }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "SMTP_USERNAME".to_string(),
                    message: "SMTP_USERNAME and SMTP_PASSWORD must be set together".to_string(),
                });
            }
        };

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "BIND_ADDR".to_string(),
            message: format!("expected host:port, got {bind_raw:?}"),
        })?;

        Ok(Self {
            forward_to,
            domain,
            from_email,
            notify_only,
            storage: StorageConfig { endpoint },
            smtp: SmtpConfig {
                host: smtp_host,
                port: smtp_port,
                credentials,
            },
            bind_addr,
        })
    }
}
