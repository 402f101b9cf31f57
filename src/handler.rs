//! Event dispatcher — drives the per-record forwarding workflow.
//!
//! Failure policy is two-tier, matching the platform contract: send
//! failures in the full-forward path are caught per recipient and logged;
//! every other failure (malformed record, storage fetch) aborts the whole
//! invocation and reports status 500.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::builder::{build_forward, build_notification};
use crate::config::RelayConfig;
use crate::error::{Error, EventError, TransportError};
use crate::event::{InboundRecord, ReceiptEvent};
use crate::filter::matches_domain;
use crate::transport::{MailTransport, ObjectStore};

/// Result of one invocation, in the platform's `{statusCode, body}` shape.
/// The body is a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    fn success(message: &str) -> Self {
        Self {
            status_code: 200,
            body: Value::String(message.to_string()).to_string(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            status_code: 500,
            body: Value::String(message).to_string(),
        }
    }
}

/// Outcome of one send attempt in the full-forward path.
#[derive(Debug)]
pub enum SendOutcome {
    /// Forwarded; carries the provider-assigned message id.
    Sent {
        recipient: String,
        message_id: String,
    },
    /// Recipient is not on the configured domain.
    Skipped { recipient: String },
    /// The provider rejected the send; logged, does not abort the batch.
    Failed {
        recipient: String,
        error: TransportError,
    },
}

/// The forwarding service: configuration plus injected transport clients.
pub struct Forwarder {
    config: RelayConfig,
    store: Arc<dyn ObjectStore>,
    mailer: Arc<dyn MailTransport>,
}

impl Forwarder {
    pub fn new(
        config: RelayConfig,
        store: Arc<dyn ObjectStore>,
        mailer: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            config,
            store,
            mailer,
        }
    }

    /// Process one invocation payload and map the result onto the
    /// `{statusCode, body}` contract.
    pub async fn process_event(&self, payload: Value) -> InvocationResponse {
        match self.run(payload).await {
            Ok(()) => InvocationResponse::success("Email(s) processed successfully"),
            Err(err) => {
                error!("error processing email: {err}");
                InvocationResponse::failure(format!("Error processing email: {err}"))
            }
        }
    }

    // Records are processed sequentially; the first record-level failure
    // aborts the rest of the batch.
    async fn run(&self, payload: Value) -> Result<(), Error> {
        debug!(event = %payload, "received event");
        let event: ReceiptEvent = serde_json::from_value(payload)
            .map_err(|err| EventError::Malformed(format!("{err}")))?;

        for record in event.records {
            let inbound = InboundRecord::from_record(record)?;
            info!(
                "processing email from {} to {:?}: {}",
                inbound.source, inbound.recipients, inbound.subject
            );

            if self.config.notify_only {
                self.notify_record(&inbound).await?;
            } else {
                let outcomes = self.forward_record(&inbound).await?;
                let sent = outcomes
                    .iter()
                    .filter(|outcome| matches!(outcome, SendOutcome::Sent { .. }))
                    .count();
                debug!(
                    "record {} complete: {} of {} recipients forwarded",
                    inbound.message_id,
                    sent,
                    outcomes.len()
                );
            }
        }
        Ok(())
    }

    /// Full-forward path: fetch the stored raw message, then build and send
    /// one forwarded copy per matching recipient. Send failures are caught
    /// per recipient; storage and build failures propagate.
    pub async fn forward_record(
        &self,
        inbound: &InboundRecord,
    ) -> Result<Vec<SendOutcome>, Error> {
        let storage = inbound
            .storage
            .as_ref()
            .ok_or(EventError::MissingField("receipt.action"))?;
        let raw = self.store.fetch_raw(&storage.bucket, &storage.key).await?;

        let mut outcomes = Vec::with_capacity(inbound.recipients.len());
        for recipient in &inbound.recipients {
            if !matches_domain(recipient, &self.config.domain) {
                warn!(
                    "email received for non-{} address: {}",
                    self.config.domain, recipient
                );
                outcomes.push(SendOutcome::Skipped {
                    recipient: recipient.clone(),
                });
                continue;
            }

            let message = build_forward(&self.config, inbound, recipient, &raw)?;
            match self
                .mailer
                .send_raw(
                    &self.config.from_email,
                    std::slice::from_ref(&self.config.forward_to),
                    &message,
                )
                .await
            {
                Ok(message_id) => {
                    info!(
                        "email forwarded from {} to {}, message id {}",
                        recipient, self.config.forward_to, message_id
                    );
                    outcomes.push(SendOutcome::Sent {
                        recipient: recipient.clone(),
                        message_id,
                    });
                }
                Err(err) => {
                    error!("error forwarding email from {recipient}: {err}");
                    outcomes.push(SendOutcome::Failed {
                        recipient: recipient.clone(),
                        error: err,
                    });
                }
            }
        }
        Ok(outcomes)
    }

    /// Notification-only path: one summary message per record, no storage
    /// access. A send failure here propagates and fails the invocation.
    pub async fn notify_record(&self, inbound: &InboundRecord) -> Result<(), Error> {
        let message = build_notification(&self.config, inbound)?;
        let message_id = self
            .mailer
            .send_raw(
                &self.config.from_email,
                std::slice::from_ref(&self.config.forward_to),
                &message,
            )
            .await?;
        info!("notification sent, message id {message_id}");
        Ok(())
    }
}
