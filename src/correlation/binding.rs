use serde::Serialize;
use std::collections::HashMap;

use super::CorrelationError;
use crate::store::CredentialKey;

/// Committed result of a correlation: a management-slot credential and the
/// real identity it belongs to. Never edited after commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialBinding {
    pub key:  CredentialKey,
    pub user: String,
}

#[derive(Debug, Default)]
pub struct BindingTable {
    by_key: HashMap<CredentialKey, CredentialBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(
        &mut self,
        key: CredentialKey,
        user: &str,
    ) -> Result<&CredentialBinding, CorrelationError> {
        use std::collections::hash_map::Entry;
        match self.by_key.entry(key) {
            Entry::Occupied(e) => Err(CorrelationError::AlreadyBound(e.key().clone())),
            Entry::Vacant(e) => {
                let binding = CredentialBinding {
                    key: e.key().clone(),
                    user: user.to_string(),
                };
                Ok(e.insert(binding))
            }
        }
    }

    pub fn get(&self, key: &CredentialKey) -> Option<&CredentialBinding> {
        self.by_key.get(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
