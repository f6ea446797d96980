use tokio::sync::Semaphore;

use crate::config::Config;

pub(crate) const QUEUE_DEPTH_ZERO: &str = "request queue depth is zero\n  \
     → pass --queue-depth with a value above 0";

pub fn check(cfg: &Config) -> anyhow::Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.management_slot.is_empty() {
        errors.push(
            "management slot name is empty\n  \
             → pass --management-slot <NAME>"
                .to_string(),
        );
    }

    if cfg.correlation_timeout_secs == 0 {
        errors.push(
            "correlation timeout is zero: every pending registration would expire immediately\n  \
             → pass --correlation-timeout-secs with a value above 0"
                .to_string(),
        );
    }

    if cfg.max_pending == 0 {
        errors.push(
            "max pending correlations is zero: no registration could ever be correlated\n  \
             → pass --max-pending with a value above 0"
                .to_string(),
        );
    }

    if cfg.queue_depth == 0 {
        errors.push(QUEUE_DEPTH_ZERO.to_string());
    }

    if cfg.max_workers == 0 {
        errors.push(
            "max workers is zero: no request would ever be handled\n  \
             → pass --max-workers with a value above 0"
                .to_string(),
        );
    } else if cfg.max_workers > Semaphore::MAX_PERMITS {
        errors.push(format!(
            "max workers {} exceeds {}\n  \
             → pass a smaller --max-workers",
            cfg.max_workers,
            Semaphore::MAX_PERMITS
        ));
    }

    if errors.is_empty() {
        return Ok(());
    }

    for err in &errors {
        tracing::error!("{err}");
    }
    anyhow::bail!("{} preflight check(s) failed", errors.len());
}
