use crate::domain::account::Account;
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for accounts.
///
/// Uses `Arc<RwLock<HashMap<String, Account>>>` to allow shared concurrent access.
/// Version checks happen under the write lock, so swaps are atomic.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(account.account_number()) {
            return Err(LedgerError::DuplicateAccount(
                account.account_number().to_string(),
            ));
        }
        accounts.insert(account.account_number().to_string(), account);
        Ok(())
    }

    async fn get(&self, account_number: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(account_number).cloned())
    }

    async fn compare_and_swap(&self, expected_version: u64, account: Account) -> Result<bool> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .get_mut(account.account_number())
            .ok_or_else(|| LedgerError::NotFound(account.account_number().to_string()))?;

        if stored.version() != expected_version {
            return Ok(false);
        }
        *stored = account;
        Ok(true)
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.account_number().cmp(b.account_number()));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn account(number: &str) -> Account {
        Account::open(number, "Owner", dec!(100.00), Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_account_store() {
        let store = InMemoryAccountStore::new();
        let account = account("ACC-001");

        store.insert(account.clone()).await.unwrap();
        let retrieved = store.get("ACC-001").await.unwrap().unwrap();
        assert_eq!(retrieved, account);

        assert!(store.get("ACC-002").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = InMemoryAccountStore::new();
        store.insert(account("ACC-001")).await.unwrap();

        let result = store.insert(account("ACC-001")).await;
        assert!(matches!(result, Err(LedgerError::DuplicateAccount(n)) if n == "ACC-001"));
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        let store = InMemoryAccountStore::new();
        store.insert(account("ACC-001")).await.unwrap();

        let mut next = store.get("ACC-001").await.unwrap().unwrap();
        next.set_version(1);
        assert!(store.compare_and_swap(0, next.clone()).await.unwrap());

        // stale writer still expects version 0
        assert!(!store.compare_and_swap(0, next).await.unwrap());
        assert_eq!(store.get("ACC-001").await.unwrap().unwrap().version(), 1);
    }

    #[tokio::test]
    async fn test_compare_and_swap_missing_account() {
        let store = InMemoryAccountStore::new();
        let result = store.compare_and_swap(0, account("ACC-404")).await;
        assert!(matches!(result, Err(LedgerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_all_accounts_sorted() {
        let store = InMemoryAccountStore::new();
        store.insert(account("ACC-003")).await.unwrap();
        store.insert(account("ACC-001")).await.unwrap();

        let all = store.all_accounts().await.unwrap();
        let numbers: Vec<&str> = all.iter().map(|a| a.account_number()).collect();
        assert_eq!(numbers, vec!["ACC-001", "ACC-003"]);
    }
}
