use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage index of an authenticator: its unique id, lowercase hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CredentialKey(String);

impl CredentialKey {
    pub fn from_id(id: &[u8]) -> Self {
        Self(id.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields handed over by the ceremony collaborator after a verified registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthenticator {
    pub id:            Vec<u8>,     // unique id of the public key, source of the key
    pub credential_id: Vec<u8>,
    pub public_key:    Vec<u8>,
    pub aaguid:        Vec<u8>,     // authenticator model, 16 bytes
    pub sign_count:    u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticator {
    pub id:            Vec<u8>,
    pub credential_id: Vec<u8>,
    pub public_key:    Vec<u8>,
    pub aaguid:        Vec<u8>,
    pub sign_count:    u32,
    pub owner:         String,      // name of the owning user, not an owning reference
}

impl Authenticator {
    pub(crate) fn new(owner: &str, fields: NewAuthenticator) -> Self {
        Self {
            id: fields.id,
            credential_id: fields.credential_id,
            public_key: fields.public_key,
            aaguid: fields.aaguid,
            sign_count: fields.sign_count,
            owner: owner.to_string(),
        }
    }

    pub fn key(&self) -> CredentialKey {
        CredentialKey::from_id(&self.id)
    }
}
