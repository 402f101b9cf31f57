//! Transport seams: object-storage fetch and raw mail submission.
//!
//! Both external calls sit behind object-safe traits so the dispatcher can
//! be exercised with in-memory fakes. Production implementations are an
//! HTTP object GET (reqwest) and SMTP submission (lettre).

use async_trait::async_trait;
use lettre::address::{Address, Envelope};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};

use crate::config::SmtpConfig;
use crate::error::{StorageError, TransportError};

// ── Seams ───────────────────────────────────────────────────────────

/// Fetch stored raw message bytes by bucket and key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn fetch_raw(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;
}

/// Submit a fully formed raw MIME message; returns the provider-assigned
/// message identifier.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_raw(
        &self,
        from: &str,
        destinations: &[String],
        raw: &[u8],
    ) -> Result<String, TransportError>;
}

// ── HTTP object store ───────────────────────────────────────────────

/// Object store reached over plain HTTP: `GET {endpoint}/{bucket}/{key}`.
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpObjectStore {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn fetch_raw(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let url = format!("{}/{bucket}/{key}", self.endpoint);
        let fetch_err = |reason: String| StorageError::Fetch {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| fetch_err(format!("{err}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }
        let response = response
            .error_for_status()
            .map_err(|err| fetch_err(format!("{err}")))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|err| fetch_err(format!("{err}")))?;
        Ok(bytes.to_vec())
    }
}

// ── SMTP relay ──────────────────────────────────────────────────────

/// Outbound mail via SMTP. With credentials the connection is a TLS relay
/// with AUTH; without, a plaintext submission (local MTA).
pub struct SmtpRelay {
    transport: SmtpTransport,
}

impl SmtpRelay {
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let transport = match &config.credentials {
            Some(creds) => SmtpTransport::relay(&config.host)
                .map_err(|err| TransportError::Connection(format!("SMTP relay error: {err}")))?
                .port(config.port)
                .credentials(Credentials::new(
                    creds.username.clone(),
                    creds.password.clone(),
                ))
                .build(),
            None => SmtpTransport::builder_dangerous(config.host.as_str())
                .port(config.port)
                .build(),
        };
        Ok(Self { transport })
    }

    fn parse_address(address: &str) -> Result<Address, TransportError> {
        address.parse().map_err(|err| TransportError::Envelope {
            address: address.to_string(),
            reason: format!("{err}"),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn send_raw(
        &self,
        from: &str,
        destinations: &[String],
        raw: &[u8],
    ) -> Result<String, TransportError> {
        let from_address = Self::parse_address(from)?;
        let mut to_addresses = Vec::with_capacity(destinations.len());
        for destination in destinations {
            to_addresses.push(Self::parse_address(destination)?);
        }
        let envelope = Envelope::new(Some(from_address), to_addresses)
            .map_err(|err| TransportError::Rejected(format!("{err}")))?;

        // The blocking SMTP client runs off the async runtime.
        let transport = self.transport.clone();
        let raw = raw.to_vec();
        let response = tokio::task::spawn_blocking(move || transport.send_raw(&envelope, &raw))
            .await
            .map_err(|err| TransportError::Connection(format!("SMTP task failed: {err}")))?
            .map_err(|err| TransportError::Rejected(format!("{err}")))?;

        Ok(response.message().collect::<Vec<_>>().join(" "))
    }
}
