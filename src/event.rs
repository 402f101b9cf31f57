//! Receipt event model — serde mirror of the mail-receipt notification JSON.
//!
//! Header fields are optional at the serde layer so that a broken record is
//! reported as a per-field [`EventError`] during extraction rather than as an
//! opaque deserialization failure for the whole batch.

use serde::Deserialize;

use crate::error::EventError;

/// One invocation payload: a batch of receipt records.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptEvent {
    #[serde(rename = "Records")]
    pub records: Vec<ReceiptRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptRecord {
    pub ses: Notification,
}

/// The nested receipt notification: mail metadata plus the receipt action
/// that points at the stored raw message.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub mail: MailMetadata,
    #[serde(default)]
    pub receipt: Option<Receipt>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailMetadata {
    #[serde(rename = "messageId")]
    pub message_id: Option<String>,
    #[serde(rename = "commonHeaders")]
    pub common_headers: Option<CommonHeaders>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommonHeaders {
    pub from: Option<Vec<String>>,
    pub to: Option<Vec<String>>,
    pub subject: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Receipt {
    #[serde(default)]
    pub action: Option<ReceiptAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptAction {
    #[serde(rename = "bucketName")]
    pub bucket_name: Option<String>,
    #[serde(rename = "objectKey")]
    pub object_key: Option<String>,
}

/// Where the raw original message is stored.
#[derive(Debug, Clone)]
pub struct StorageRef {
    pub bucket: String,
    pub key: String,
}

/// Flat per-record view the dispatcher works with.
#[derive(Debug, Clone)]
pub struct InboundRecord {
    pub message_id: String,
    /// First address in the From header.
    pub source: String,
    pub subject: String,
    /// Declared To recipients, unfiltered.
    pub recipients: Vec<String>,
    /// Date header, passed through as an opaque string.
    pub date: String,
    /// Absent when the platform did not record a storage action; only the
    /// full-forward path requires it.
    pub storage: Option<StorageRef>,
}

impl InboundRecord {
    /// Extract the metadata the workflow needs, failing on the first
    /// missing field.
    pub fn from_record(record: ReceiptRecord) -> Result<Self, EventError> {
        let mail = record.ses.mail;
        let message_id = mail
            .message_id
            .ok_or(EventError::MissingField("mail.messageId"))?;
        let headers = mail
            .common_headers
            .ok_or(EventError::MissingField("mail.commonHeaders"))?;

        let source = headers
            .from
            .as_deref()
            .and_then(|from| from.first())
            .cloned()
            .ok_or(EventError::MissingField("mail.commonHeaders.from"))?;
        let recipients = headers
            .to
            .ok_or(EventError::MissingField("mail.commonHeaders.to"))?;
        let subject = headers
            .subject
            .ok_or(EventError::MissingField("mail.commonHeaders.subject"))?;
        let date = headers
            .date
            .ok_or(EventError::MissingField("mail.commonHeaders.date"))?;

        let storage = record.ses.receipt.and_then(|receipt| {
            receipt.action.and_then(|action| {
                match (action.bucket_name, action.object_key) {
                    (Some(bucket), Some(key)) => Some(StorageRef { bucket, key }),
                    _ => None,
                }
            })
        });

        Ok(Self {
            message_id,
            source,
            subject,
            recipients,
            date,
            storage,
        })
    }
}
