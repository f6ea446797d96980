pub mod dispatch;
pub mod types;

pub use dispatch::{dispatch_request, run_endpoint_loop, submit};
pub use types::{Envelope, Reply, Request, Response};

use tokio::sync::mpsc;

use crate::config::Config;
use crate::diagnostics::QUEUE_DEPTH_ZERO;

/// Request queue sized from the configuration.
pub fn channel(
    cfg: &Config,
) -> anyhow::Result<(mpsc::Sender<Envelope>, mpsc::Receiver<Envelope>)> {
    if cfg.queue_depth == 0 {
        anyhow::bail!(QUEUE_DEPTH_ZERO);
    }
    Ok(mpsc::channel(cfg.queue_depth))
}
