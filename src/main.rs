use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use mailrelay::config::RelayConfig;
use mailrelay::handler::Forwarder;
use mailrelay::server::invoke_routes;
use mailrelay::transport::{HttpObjectStore, MailTransport, ObjectStore, SmtpRelay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env().context("failed to load configuration")?;
    info!(
        "forwarding @{} to {} ({} mode)",
        config.domain,
        config.forward_to,
        if config.notify_only {
            "notification-only"
        } else {
            "full-forward"
        }
    );

    let store: Arc<dyn ObjectStore> =
        Arc::new(HttpObjectStore::new(config.storage.endpoint.clone()));
    let mailer: Arc<dyn MailTransport> = Arc::new(
        SmtpRelay::new(&config.smtp).context("failed to build SMTP transport")?,
    );

    let bind_addr = config.bind_addr;
    let forwarder = Arc::new(Forwarder::new(config, store, mailer));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("listening on {bind_addr}");
    axum::serve(listener, invoke_routes(forwarder)).await?;

    Ok(())
}
