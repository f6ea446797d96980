use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashMap;

use super::CeremonyError;

/// Opaque per-client key/value bag carried between a ceremony's start and finish.
///
/// Only the ceremony collaborator interprets the entries; the core just moves
/// the bag between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    values: HashMap<String, Vec<u8>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), CeremonyError> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| CeremonyError::Session(e.to_string()))?;
        self.values.insert(key.to_string(), buf);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CeremonyError> {
        self.values
            .get(key)
            .map(|bytes| decode(bytes))
            .transpose()
    }

    /// Like `get`, but removes the entry so a challenge cannot be replayed.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, CeremonyError> {
        self.values
            .remove(key)
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CeremonyError> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CeremonyError::Session(e.to_string()))?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CeremonyError> {
        decode(bytes)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CeremonyError> {
    ciborium::from_reader(bytes).map_err(|e| CeremonyError::Session(e.to_string()))
}
