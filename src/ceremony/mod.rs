//! Contract with the external WebAuthn ceremony library.
//!
//! Challenge issuance, attestation and assertion verification and counter
//! checks all happen behind [`Ceremony`]. The library talks back to our
//! storage only through [`AuthenticatorStore`].

pub mod session;

pub use session::SessionState;

use serde::{Deserialize, Serialize};

use crate::store::{
    Authenticator, CredentialKey, CredentialStore, NewAuthenticator, StoreError, User,
};

/// Encoded ceremony payload: challenge options going out, client responses coming in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyMessage(pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CeremonyError {
    #[error("no challenge in session")]
    MissingChallenge,
    #[error("challenge mismatch")]
    ChallengeMismatch,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("sign count regressed: stored {stored}, received {received}")]
    CounterRegression { stored: u32, received: u32 },
    #[error("credential not allowed for this user")]
    UnknownCredential,
    #[error("malformed client response: {0}")]
    Malformed(String),
    #[error("session: {0}")]
    Session(String),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Other(String),
}

/// Storage operations the ceremony library needs from us.
pub trait AuthenticatorStore {
    fn find_authenticators_for_user(&self, user: &User) -> Result<Vec<Authenticator>, StoreError>;

    fn find_authenticator_by_id(&self, id: &[u8]) -> Result<Authenticator, StoreError>;

    fn persist_new_authenticator(
        &mut self,
        user: &User,
        fields: NewAuthenticator,
    ) -> Result<CredentialKey, StoreError>;

    fn update_sign_count(&mut self, id: &[u8], sign_count: u32) -> Result<(), StoreError>;
}

impl AuthenticatorStore for CredentialStore {
    fn find_authenticators_for_user(&self, user: &User) -> Result<Vec<Authenticator>, StoreError> {
        Ok(self
            .list_authenticators(user.name())?
            .into_iter()
            .cloned()
            .collect())
    }

    fn find_authenticator_by_id(&self, id: &[u8]) -> Result<Authenticator, StoreError> {
        self.get_authenticator(id).cloned()
    }

    fn persist_new_authenticator(
        &mut self,
        user: &User,
        fields: NewAuthenticator,
    ) -> Result<CredentialKey, StoreError> {
        self.add_authenticator(user.name(), fields)
    }

    fn update_sign_count(&mut self, id: &[u8], sign_count: u32) -> Result<(), StoreError> {
        CredentialStore::update_sign_count(self, id, sign_count)
    }
}

/// A WebAuthn ceremony implementation.
///
/// Calls are synchronous and made while the shared state lock is held, so a
/// registration's persistence is atomic with the caller's bookkeeping.
/// Failed completions must not persist anything.
pub trait Ceremony: Send + Sync {
    fn begin_registration(
        &self,
        user: &User,
        session: &mut SessionState,
    ) -> Result<CeremonyMessage, CeremonyError>;

    /// Verify the attestation and, on success, persist exactly one new authenticator.
    fn complete_registration(
        &self,
        user: &User,
        session: &mut SessionState,
        response: &CeremonyMessage,
        store: &mut dyn AuthenticatorStore,
    ) -> Result<(), CeremonyError>;

    /// `user` is `None` for a discoverable-credential login.
    fn begin_login(
        &self,
        user: Option<&User>,
        session: &mut SessionState,
        store: &dyn AuthenticatorStore,
    ) -> Result<CeremonyMessage, CeremonyError>;

    /// Verify the assertion and return the authenticator that produced it.
    fn complete_login(
        &self,
        user: Option<&User>,
        session: &mut SessionState,
        response: &CeremonyMessage,
        store: &mut dyn AuthenticatorStore,
    ) -> Result<Authenticator, CeremonyError>;
}
