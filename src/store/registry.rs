use serde::Serialize;
use std::collections::HashMap;

use super::CredentialKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    name: String,
    #[serde(skip)]
    credentials: Vec<CredentialKey>,
}

impl User {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            credentials: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// User handle presented to the ceremony collaborator.
    pub fn webauthn_id(&self) -> &[u8] {
        self.name.as_bytes()
    }

    /// Keys of the credentials owned by this user, in insertion order.
    pub fn credentials(&self) -> &[CredentialKey] {
        &self.credentials
    }

    pub(crate) fn link(&mut self, key: CredentialKey) {
        self.credentials.push(key);
    }
}

/// Users by exact name. Users are created lazily and never removed.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    users: HashMap<String, User>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the user called `name`, creating it with no credentials on first use.
    /// Names are compared byte for byte.
    pub fn get_or_create(&mut self, name: &str) -> &User {
        if !self.users.contains_key(name) {
            tracing::info!(user = %name, "Identity created");
        }
        self.users
            .entry(name.to_string())
            .or_insert_with(|| User::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut User> {
        self.users.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
