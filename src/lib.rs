//! Mailrelay — catch-all mail forwarding for a single domain.
//!
//! Receives mail-receipt events, fetches the stored raw message from object
//! storage, and re-submits it to one fixed forwarding address — either with
//! the original attached verbatim or as a notification-only summary.

pub mod builder;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod handler;
pub mod server;
pub mod transport;
