use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;
use crate::correlation::{BindingTable, PendingTable};
use crate::error::{Error, Result};
use crate::store::CredentialStore;

/// Everything request handlers mutate.
pub struct State {
    pub store: CredentialStore,
    pub pending: PendingTable,
    pub bindings: BindingTable,
}

impl State {
    pub fn new(cfg: &Config) -> Self {
        Self {
            store: CredentialStore::new(),
            pending: PendingTable::new(
                cfg.max_pending,
                Duration::from_secs(cfg.correlation_timeout_secs),
            ),
            bindings: BindingTable::new(),
        }
    }
}

#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Mutex<State>>,
}

impl SharedState {
    pub fn new(cfg: &Config) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State::new(cfg))),
        }
    }

    /// Run `f` as one critical section over the whole state.
    pub fn with_state<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut State) -> Result<T>,
    {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| Error::Internal("state mutex poisoned".into()))?;
        f(&mut state)
    }
}
