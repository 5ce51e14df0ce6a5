use crate::domain::account::Account;
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing account states.
pub const CF_ACCOUNTS: &str = "accounts";

/// A persistent store implementation using RocksDB.
///
/// Accounts are stored as JSON under their account number. Inserts and swaps
/// take a process-wide write lock so the version check and the put cannot
/// interleave with another writer.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "accounts" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn read(&self, account_number: &str) -> Result<Option<Account>> {
        let cf = self
            .db
            .cf_handle(CF_ACCOUNTS)
            .ok_or_else(|| LedgerError::storage("Accounts column family not found"))?;

        match self.db.get_cf(&cf, account_number.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, account: &Account) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_ACCOUNTS)
            .ok_or_else(|| LedgerError::storage("Accounts column family not found"))?;

        let value = serde_json::to_vec(account)?;
        self.db
            .put_cf(&cf, account.account_number().as_bytes(), value)?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn insert(&self, account: Account) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.read(account.account_number())?.is_some() {
            return Err(LedgerError::DuplicateAccount(
                account.account_number().to_string(),
            ));
        }
        self.write(&account)
    }

    async fn get(&self, account_number: &str) -> Result<Option<Account>> {
        self.read(account_number)
    }

    async fn compare_and_swap(&self, expected_version: u64, account: Account) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let stored = self
            .read(account.account_number())?
            .ok_or_else(|| LedgerError::NotFound(account.account_number().to_string()))?;

        if stored.version() != expected_version {
            return Ok(false);
        }
        self.write(&account)?;
        Ok(true)
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let handle = self
            .db
            .cf_handle(CF_ACCOUNTS)
            .ok_or_else(|| LedgerError::storage("Accounts column family not found"))?;

        // keys are account numbers, so iteration order is already sorted
        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(&handle, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            accounts.push(serde_json::from_slice(&value)?);
        }
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_rocksdb_round_trip_and_swap() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let account = Account::open("ACC-001", "Owner", dec!(10.00), Utc::now()).unwrap();
        store.insert(account.clone()).await.unwrap();
        assert!(matches!(
            store.insert(account.clone()).await,
            Err(LedgerError::DuplicateAccount(_))
        ));

        let mut next = account.clone();
        next.set_version(1);
        assert!(store.compare_and_swap(0, next.clone()).await.unwrap());
        assert!(!store.compare_and_swap(0, next).await.unwrap());

        let all = store.all_accounts().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].version(), 1);
    }
}
