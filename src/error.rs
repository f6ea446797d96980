use crate::ceremony::CeremonyError;
use crate::correlation::CorrelationError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store: {0}")]
    Store(#[from] StoreError),
    #[error("Ceremony: {0}")]
    Ceremony(CeremonyError),
    #[error("Correlation: {0}")]
    Correlation(#[from] CorrelationError),
    #[error("{0}")]
    Internal(String),
}

// Storage failures raised while the ceremony library persists keep their store type.
impl From<CeremonyError> for Error {
    fn from(e: CeremonyError) -> Self {
        match e {
            CeremonyError::Store(e) => Error::Store(e),
            other => Error::Ceremony(other),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CredentialKey;

    #[test]
    fn test_ceremony_store_error_is_lifted() {
        let key = CredentialKey::from_id(&[0x01]);
        let err = Error::from(CeremonyError::Store(StoreError::DuplicateCredential(key.clone())));
        assert!(matches!(err, Error::Store(StoreError::DuplicateCredential(k)) if k == key));

        let err = Error::from(CeremonyError::InvalidSignature);
        assert!(matches!(err, Error::Ceremony(CeremonyError::InvalidSignature)));
    }
}
