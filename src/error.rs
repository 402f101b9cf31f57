//! Error types for mailrelay.

/// Top-level error type for the forwarding service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid event: {0}")]
    Event(#[from] EventError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Message build error: {0}")]
    Build(#[from] BuildError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors in the inbound receipt event payload.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Malformed event payload: {0}")]
    Malformed(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Object-storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Failed to fetch object {bucket}/{key}: {reason}")]
    Fetch {
        bucket: String,
        key: String,
        reason: String,
    },
}

/// Outbound mail transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid envelope address {address}: {reason}")]
    Envelope { address: String, reason: String },

    #[error("SMTP connection failed: {0}")]
    Connection(String),

    #[error("Provider rejected message: {0}")]
    Rejected(String),
}

/// Errors assembling an outbound MIME message.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("Invalid content type: {0}")]
    ContentType(String),

    #[error("Failed to assemble message: {0}")]
    Assemble(String),
}
