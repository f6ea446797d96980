pub mod ceremony;
pub mod check;
pub mod config;
pub mod correlation;
pub mod diagnostics;
pub mod endpoint;
pub mod error;
pub mod service;
pub mod state;
pub mod store;

pub use ceremony::{Ceremony, CeremonyError, CeremonyMessage, SessionState};
pub use error::{Error, Result};
pub use service::Service;

use std::sync::Arc;
use tokio::sync::mpsc;

/// Serve endpoint requests from `incoming_rx` until every sender is dropped.
pub async fn run<C: Ceremony + 'static>(
    cfg: config::Config,
    ceremony: C,
    incoming_rx: mpsc::Receiver<endpoint::Envelope>,
) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    let level = match cfg.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // A host process may already own the global subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .try_init();

    diagnostics::check(&cfg)?;

    tracing::info!(management_slot = %cfg.management_slot, "Starting passlink");
    let service = Arc::new(Service::new(&cfg, ceremony));
    endpoint::run_endpoint_loop(incoming_rx, service, cfg.max_workers).await;
    Ok(())
}
