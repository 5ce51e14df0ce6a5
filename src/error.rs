use crate::domain::status::{AccountStatus, Transition};
use thiserror::Error;

/// Errors raised by the account ledger.
///
/// Insufficient balance is deliberately absent: it is a normal debit outcome,
/// not an error.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Account not found: {0}")]
    NotFound(String),
    #[error("Account number already exists: {0}")]
    DuplicateAccount(String),
    #[error("Account is frozen: {0}")]
    Frozen(String),
    #[error("Account is closed: {0}")]
    Closed(String),
    #[error("Cannot {transition} account with status: {status}")]
    InvalidStateTransition {
        transition: Transition,
        status: AccountStatus,
    },
    #[error("Concurrent modification of account {0}, giving up")]
    Conflict(String),
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LedgerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn storage(message: impl Into<String>) -> Self {
        Self::Storage(Box::new(std::io::Error::other(message.into())))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Storage(Box::new(e))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Faults surfaced by a remote account service.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("account service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
    /// The remote ledger refused to debit because the account is no longer active.
    #[error("{0}")]
    AccountInactive(String),
}
