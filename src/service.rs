use std::sync::Arc;

use crate::ceremony::{Ceremony, CeremonyMessage, SessionState};
use crate::check::CheckResolver;
use crate::config::Config;
use crate::correlation::{CorrelationCoordinator, CorrelationToken, RegistrationOutcome};
use crate::error::Result;
use crate::state::SharedState;
use crate::store::{IdentityRegistry, User};

/// The six logical endpoints, independent of any transport.
pub struct Service<C> {
    state: SharedState,
    ceremony: Arc<C>,
    coordinator: CorrelationCoordinator<C>,
}

impl<C: Ceremony> Service<C> {
    pub fn new(cfg: &Config, ceremony: C) -> Self {
        let state = SharedState::new(cfg);
        let ceremony = Arc::new(ceremony);
        let coordinator =
            CorrelationCoordinator::new(state.clone(), ceremony.clone(), cfg.management_slot.clone());
        Self {
            state,
            ceremony,
            coordinator,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn management_slot(&self) -> &str {
        self.coordinator.management_slot()
    }

    pub fn register_start(&self, name: &str, session: &mut SessionState) -> Result<CeremonyMessage> {
        self.coordinator.begin_registration(name, session)
    }

    pub fn register_finish(
        &self,
        name: &str,
        session: &mut SessionState,
        response: &CeremonyMessage,
        token: Option<CorrelationToken>,
    ) -> Result<RegistrationOutcome> {
        self.coordinator
            .finish_registration(name, session, response, token)
    }

    /// Unknown or absent names fall back to a discoverable-credential login.
    pub fn login_start(
        &self,
        name: Option<&str>,
        session: &mut SessionState,
    ) -> Result<CeremonyMessage> {
        self.state.with_state(|state| {
            let user = known_user(state.store.registry(), name);
            Ok(self.ceremony.begin_login(user.as_ref(), session, &state.store)?)
        })
    }

    /// Returns the owner of the authenticator that produced the assertion.
    pub fn login_finish(
        &self,
        name: Option<&str>,
        session: &mut SessionState,
        response: &CeremonyMessage,
    ) -> Result<User> {
        self.state.with_state(|state| {
            let user = known_user(state.store.registry(), name);
            let authr = self
                .ceremony
                .complete_login(user.as_ref(), session, response, &mut state.store)?;
            let owner = state.store.user(&authr.owner)?.clone();
            tracing::info!(user = %owner.name(), key = %authr.key(), "Login verified");
            Ok(owner)
        })
    }

    pub fn check_start(&self, session: &mut SessionState) -> Result<CeremonyMessage> {
        let slot = self.management_slot();
        self.state.with_state(|state| {
            let manager = state.store.user(slot)?.clone();
            Ok(self
                .ceremony
                .begin_login(Some(&manager), session, &state.store)?)
        })
    }

    /// Verify an assertion against the management slot and resolve the real identity.
    pub fn check_finish(
        &self,
        session: &mut SessionState,
        response: &CeremonyMessage,
    ) -> Result<User> {
        let slot = self.management_slot();
        self.state.with_state(|state| {
            let manager = state.store.user(slot)?.clone();
            let authr = self
                .ceremony
                .complete_login(Some(&manager), session, response, &mut state.store)?;
            let user = match CheckResolver::new(&state.store, &state.bindings).resolve(&authr) {
                Ok(user) => user.clone(),
                Err(e) => {
                    tracing::warn!(key = %authr.key(), "Verified management credential has no binding");
                    return Err(e);
                }
            };
            tracing::info!(user = %user.name(), key = %authr.key(), "Check resolved");
            Ok(user)
        })
    }
}

fn known_user(registry: &IdentityRegistry, name: Option<&str>) -> Option<User> {
    let name = name?;
    let user = registry.get(name).cloned();
    if user.is_none() {
        tracing::debug!(user = %name, "Unknown user, using discoverable login");
    }
    user
}
