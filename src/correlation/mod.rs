pub mod binding;
pub mod coordinator;
pub mod pending;

pub use binding::{BindingTable, CredentialBinding};
pub use coordinator::{CorrelationCoordinator, RegistrationOutcome, new_keys};
pub use pending::{CorrelationToken, PendingCorrelation, PendingTable};

use crate::store::CredentialKey;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorrelationError {
    #[error("expected exactly one new management credential, found {found}")]
    CorrelationAmbiguous { found: usize },
    #[error("no binding for credential {0}")]
    BindingNotFound(CredentialKey),
    #[error("no pending correlation for this token")]
    NoPendingCorrelation,
    #[error("malformed correlation token: expected 32 hex digits")]
    MalformedToken,
    #[error("management slot registration requires a correlation token")]
    MissingCorrelationToken,
    #[error("too many pending correlations")]
    TooManyPending,
    #[error("credential {0} is already bound")]
    AlreadyBound(CredentialKey),
}
