pub const DEFAULT_MANAGEMENT_SLOT: &str = "name";
pub const MAX_PENDING_CORRELATIONS: usize = 64;
pub const CORRELATION_TIMEOUT_SECS: u64 = 300;
pub const REQUEST_QUEUE_DEPTH: usize = 32;
pub const MAX_REQUEST_WORKERS: usize = 4;

#[derive(clap::Parser, Debug, Clone)]
pub struct Config {
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Identity name of the shared slot every real identity correlates into.
    #[arg(long, default_value = DEFAULT_MANAGEMENT_SLOT)]
    pub management_slot: String,
    /// Seconds a completed first-phase registration waits for its management registration.
    #[arg(long, default_value_t = CORRELATION_TIMEOUT_SECS)]
    pub correlation_timeout_secs: u64,
    #[arg(long, default_value_t = MAX_PENDING_CORRELATIONS)]
    pub max_pending: usize,
    /// Requests buffered ahead of the workers before senders wait.
    #[arg(long, default_value_t = REQUEST_QUEUE_DEPTH)]
    pub queue_depth: usize,
    /// Requests handled at once; the rest stay queued.
    #[arg(long, default_value_t = MAX_REQUEST_WORKERS)]
    pub max_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: 0,
            management_slot: DEFAULT_MANAGEMENT_SLOT.to_string(),
            correlation_timeout_secs: CORRELATION_TIMEOUT_SECS,
            max_pending: MAX_PENDING_CORRELATIONS,
            queue_depth: REQUEST_QUEUE_DEPTH,
            max_workers: MAX_REQUEST_WORKERS,
        }
    }
}
