pub mod authenticator;
pub mod index;
pub mod registry;

pub use authenticator::{Authenticator, CredentialKey, NewAuthenticator};
pub use index::CredentialStore;
pub use registry::{IdentityRegistry, User};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Duplicate credential: {0}")]
    DuplicateCredential(CredentialKey),
    #[error("Credential not found: {0}")]
    CredentialNotFound(CredentialKey),
}
