//! Two-phase registration correlation.
//!
//! A user first registers an authenticator under their own name (phase R),
//! which yields a [`CorrelationToken`]. The same physical authenticator is then
//! registered under the shared management slot (phase M) with that token. The
//! management credential added by phase M is found by diffing the slot's key
//! set around the ceremony and is bound to the phase R identity, so a later
//! anonymous check against the management slot resolves to the real user.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{CorrelationError, CorrelationToken, CredentialBinding};
use crate::ceremony::{Ceremony, CeremonyMessage, SessionState};
use crate::error::Result;
use crate::state::SharedState;
use crate::store::{CredentialKey, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Phase R finished; present `token` when registering the management slot.
    Pending { user: User, token: CorrelationToken },
    /// Phase M finished and the management credential is bound.
    Bound(CredentialBinding),
}

/// Keys present after the ceremony that were absent before it.
pub fn new_keys(pre: &BTreeSet<CredentialKey>, post: &BTreeSet<CredentialKey>) -> Vec<CredentialKey> {
    post.difference(pre).cloned().collect()
}

pub struct CorrelationCoordinator<C> {
    state: SharedState,
    ceremony: Arc<C>,
    management_slot: String,
}

impl<C: Ceremony> CorrelationCoordinator<C> {
    pub fn new(state: SharedState, ceremony: Arc<C>, management_slot: impl Into<String>) -> Self {
        Self {
            state,
            ceremony,
            management_slot: management_slot.into(),
        }
    }

    pub fn management_slot(&self) -> &str {
        &self.management_slot
    }

    pub fn is_management_slot(&self, name: &str) -> bool {
        name == self.management_slot
    }

    /// Create the user on first reference and issue a registration challenge.
    pub fn begin_registration(
        &self,
        name: &str,
        session: &mut SessionState,
    ) -> Result<CeremonyMessage> {
        self.state.with_state(|state| {
            let user = state.store.get_or_create_user(name).clone();
            tracing::debug!(user = %name, "Registration started");
            Ok(self.ceremony.begin_registration(&user, session)?)
        })
    }

    pub fn finish_registration(
        &self,
        name: &str,
        session: &mut SessionState,
        response: &CeremonyMessage,
        token: Option<CorrelationToken>,
    ) -> Result<RegistrationOutcome> {
        if self.is_management_slot(name) {
            let token = token.ok_or(CorrelationError::MissingCorrelationToken)?;
            self.commit_management(session, response, token)
                .map(RegistrationOutcome::Bound)
        } else {
            self.record_real_identity(name, session, response)
        }
    }

    fn record_real_identity(
        &self,
        name: &str,
        session: &mut SessionState,
        response: &CeremonyMessage,
    ) -> Result<RegistrationOutcome> {
        self.state.with_state(|state| {
            let user = state.store.user(name)?.clone();
            // Refuse before the ceremony stores anything we could not track.
            state.pending.ensure_capacity()?;

            self.ceremony
                .complete_registration(&user, session, response, &mut state.store)?;

            let token = state.pending.allocate(name)?;
            tracing::info!(user = %name, token = %token, "Registration awaiting management correlation");
            let user = state.store.user(name)?.clone();
            Ok(RegistrationOutcome::Pending { user, token })
        })
    }

    fn commit_management(
        &self,
        session: &mut SessionState,
        response: &CeremonyMessage,
        token: CorrelationToken,
    ) -> Result<CredentialBinding> {
        let slot = self.management_slot.as_str();
        self.state.with_state(|state| {
            let real_user = match state.pending.get(&token) {
                Ok(pending) => pending.user.clone(),
                Err(e) => {
                    tracing::warn!(token = %token, "Management registration without pending correlation");
                    return Err(e.into());
                }
            };
            let manager = state.store.user(slot)?.clone();

            let pre = state.store.credential_keys(slot)?;
            // Ceremony failures leave the token pending so the touch can be retried.
            self.ceremony
                .complete_registration(&manager, session, response, &mut state.store)?;
            let post = state.store.credential_keys(slot)?;

            let key = match new_keys(&pre, &post).as_slice() {
                [key] => key.clone(),
                found => {
                    state.pending.take(&token)?;
                    tracing::warn!(
                        token = %token,
                        user = %real_user,
                        found = found.len(),
                        "Ambiguous management registration, correlation dropped"
                    );
                    return Err(CorrelationError::CorrelationAmbiguous { found: found.len() }.into());
                }
            };

            state.pending.take(&token)?;
            let binding = state.bindings.commit(key, &real_user)?.clone();
            tracing::info!(user = %binding.user, key = %binding.key, "Credential bound");
            Ok(binding)
        })
    }
}
