use crate::correlation::{BindingTable, CorrelationError};
use crate::error::Result;
use crate::store::{Authenticator, CredentialStore, User};

/// Maps a verified management-slot credential back to the real identity bound to it.
pub struct CheckResolver<'a> {
    store: &'a CredentialStore,
    bindings: &'a BindingTable,
}

impl<'a> CheckResolver<'a> {
    pub fn new(store: &'a CredentialStore, bindings: &'a BindingTable) -> Self {
        Self { store, bindings }
    }

    pub fn resolve(&self, authenticator: &Authenticator) -> Result<&'a User> {
        let key = authenticator.key();
        let binding = self
            .bindings
            .get(&key)
            .ok_or(CorrelationError::BindingNotFound(key))?;
        Ok(self.store.user(&binding.user)?)
    }
}
