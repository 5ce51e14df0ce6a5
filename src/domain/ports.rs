use super::account::{Account, Amount};
use super::debit::DebitOutcome;
use super::status::AccountStatus;
use crate::error::{RemoteError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persistence for accounts.
///
/// Implementations must make `insert` and `compare_and_swap` atomic with respect
/// to each other: the ledger relies on them for serializable read-modify-write.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Stores a new account. Fails with `DuplicateAccount` if the number is taken.
    async fn insert(&self, account: Account) -> Result<()>;

    async fn get(&self, account_number: &str) -> Result<Option<Account>>;

    /// Replaces the stored account only if its version is still `expected_version`.
    ///
    /// Returns `Ok(false)` when another writer got there first.
    async fn compare_and_swap(&self, expected_version: u64, account: Account) -> Result<bool>;

    async fn all_accounts(&self) -> Result<Vec<Account>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type ClockBox = Box<dyn Clock>;

/// Account state as reported by a remote account service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account_number: String,
    pub owner_name: String,
    pub balance: Decimal,
    pub status: AccountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            account_number: account.account_number().to_string(),
            owner_name: account.owner_name().to_string(),
            balance: account.balance().value(),
            status: account.status(),
            created_at: Some(account.created_at()),
        }
    }
}

/// The two account operations a payment needs, owned by another service.
#[async_trait]
pub trait RemoteAccountClient: Send + Sync {
    async fn get_account(
        &self,
        account_number: &str,
    ) -> std::result::Result<AccountSnapshot, RemoteError>;

    async fn debit(
        &self,
        account_number: &str,
        amount: Amount,
    ) -> std::result::Result<DebitOutcome, RemoteError>;
}

pub type RemoteAccountClientBox = Box<dyn RemoteAccountClient>;
