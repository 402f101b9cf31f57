//! Outbound message construction via lettre's builder.
//!
//! Two variants: a full forward that attaches the original raw message
//! verbatim, and a notification-only summary that never touches storage.

use lettre::Message;
use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};

use crate::config::RelayConfig;
use crate::error::BuildError;
use crate::event::InboundRecord;

/// Filename the attached original message is delivered under.
pub const ATTACHMENT_FILENAME: &str = "original-email.eml";

fn mailbox(address: &str) -> Result<Mailbox, BuildError> {
    address.parse().map_err(|err| BuildError::Address {
        address: address.to_string(),
        reason: format!("{err}"),
    })
}

/// Build the full-forward message for one matching recipient: provenance
/// text part plus the raw original as a base64 `message/rfc822` attachment.
/// Reply-To points back at the original sender.
pub fn build_forward(
    config: &RelayConfig,
    record: &InboundRecord,
    recipient: &str,
    raw: &[u8],
) -> Result<Vec<u8>, BuildError> {
    let mut body = String::from("--- Forwarded Message ---\n");
    body.push_str(&format!("From: {}\n", record.source));
    body.push_str(&format!("To: {recipient}\n"));
    body.push_str(&format!("Subject: {}\n", record.subject));
    body.push_str(&format!("Date: {}\n\n", record.date));
    body.push_str("Original message attached as raw email.\n");

    let attachment_body = Body::new_with_encoding(raw.to_vec(), ContentTransferEncoding::Base64)
        .map_err(|_| BuildError::Assemble("base64 encoding rejected".to_string()))?;
    let content_type = ContentType::parse("message/rfc822")
        .map_err(|err| BuildError::ContentType(format!("{err}")))?;
    let attachment =
        Attachment::new(ATTACHMENT_FILENAME.to_string()).body(attachment_body, content_type);

    let message = Message::builder()
        .from(mailbox(&config.from_email)?)
        .to(mailbox(&config.forward_to)?)
        .reply_to(mailbox(&record.source)?)
        .subject(format!("[{recipient}] {}", record.subject))
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(body))
                .singlepart(attachment),
        )
        .map_err(|err| BuildError::Assemble(format!("{err}")))?;

    Ok(message.formatted())
}

/// Build the notification-only summary: provenance fields, no attachment,
/// no Reply-To.
pub fn build_notification(
    config: &RelayConfig,
    record: &InboundRecord,
) -> Result<Vec<u8>, BuildError> {
    let mut body = format!("You received a new email at {}\n\n", config.domain);
    body.push_str(&format!("From: {}\n", record.source));
    body.push_str(&format!("To: {}\n", record.recipients.join(", ")));
    body.push_str(&format!("Subject: {}\n", record.subject));
    body.push_str(&format!("Date: {}\n\n", record.date));
    body.push_str("Reply directly to this email to respond to the sender.\n");

    let message = Message::builder()
        .from(mailbox(&config.from_email)?)
        .to(mailbox(&config.forward_to)?)
        .subject(format!("[{}] New email: {}", config.domain, record.subject))
        .singlepart(SinglePart::plain(body))
        .map_err(|err| BuildError::Assemble(format!("{err}")))?;

    Ok(message.formatted())
}
