use std::collections::{BTreeSet, HashMap};

use super::{Authenticator, CredentialKey, IdentityRegistry, NewAuthenticator, StoreError, User};

/// In-memory credential storage.
///
/// Owns every `Authenticator`, indexed by its `CredentialKey`, plus the
/// registry of users. A user only refers to its credentials by key.
#[derive(Debug, Default)]
pub struct CredentialStore {
    registry: IdentityRegistry,
    by_key: HashMap<CredentialKey, Authenticator>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Upsert a user by name; see `IdentityRegistry::get_or_create`.
    pub fn get_or_create_user(&mut self, name: &str) -> &User {
        self.registry.get_or_create(name)
    }

    pub fn user(&self, name: &str) -> Result<&User, StoreError> {
        self.registry
            .get(name)
            .ok_or_else(|| StoreError::UserNotFound(name.to_string()))
    }

    /// Store a freshly registered authenticator for `user` and return its key.
    pub fn add_authenticator(
        &mut self,
        user: &str,
        fields: NewAuthenticator,
    ) -> Result<CredentialKey, StoreError> {
        let key = CredentialKey::from_id(&fields.id);
        let owner = self
            .registry
            .get_mut(user)
            .ok_or_else(|| StoreError::UserNotFound(user.to_string()))?;
        if self.by_key.contains_key(&key) {
            return Err(StoreError::DuplicateCredential(key));
        }

        owner.link(key.clone());
        self.by_key
            .insert(key.clone(), Authenticator::new(user, fields));
        tracing::info!(user = %user, key = %key, "Authenticator stored");
        Ok(key)
    }

    /// Look up by raw authenticator id.
    pub fn get_authenticator(&self, id: &[u8]) -> Result<&Authenticator, StoreError> {
        self.get_by_key(&CredentialKey::from_id(id))
    }

    pub fn get_by_key(&self, key: &CredentialKey) -> Result<&Authenticator, StoreError> {
        self.by_key
            .get(key)
            .ok_or_else(|| StoreError::CredentialNotFound(key.clone()))
    }

    /// All authenticators of `user` in insertion order.
    pub fn list_authenticators(&self, user: &str) -> Result<Vec<&Authenticator>, StoreError> {
        let user = self.user(user)?;
        Ok(user
            .credentials()
            .iter()
            .filter_map(|key| self.by_key.get(key))
            .collect())
    }

    /// Snapshot of the credential keys currently owned by `user`.
    pub fn credential_keys(&self, user: &str) -> Result<BTreeSet<CredentialKey>, StoreError> {
        Ok(self.user(user)?.credentials().iter().cloned().collect())
    }

    /// Record the signature counter reported by a verified login.
    pub fn update_sign_count(&mut self, id: &[u8], sign_count: u32) -> Result<(), StoreError> {
        let key = CredentialKey::from_id(id);
        let authr = self
            .by_key
            .get_mut(&key)
            .ok_or_else(|| StoreError::CredentialNotFound(key.clone()))?;
        tracing::debug!(key = %key, from = authr.sign_count, to = sign_count, "Sign count updated");
        authr.sign_count = sign_count;
        Ok(())
    }

    pub fn credential_count(&self) -> usize {
        self.by_key.len()
    }
}
