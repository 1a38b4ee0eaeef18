/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("no pending credentials to mint")]
    EmptyPool,

    #[error("ledger {0} lock poisoned")]
    LockPoisoned(&'static str),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bka_crypto::HasherError> for LedgerError {
    fn from(err: bka_crypto::HasherError) -> Self {
        match err {
            bka_crypto::HasherError::Serialization(msg) => Self::Serialization(msg),
        }
    }
}
