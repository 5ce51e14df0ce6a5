use crate::application::ledger::AccountLedger;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use tracing::{info, warn};

/// One row of an account seed file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct SeedAccount {
    pub account_number: String,
    pub owner_name: String,
    pub balance: Decimal,
}

/// Reads initial accounts from a CSV source with the header
/// `account_number,owner_name,balance`.
pub struct AccountSeedReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> AccountSeedReader<R> {
    /// Creates a new `AccountSeedReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes seed rows.
    pub fn accounts(self) -> impl Iterator<Item = Result<SeedAccount>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(|e| LedgerError::invalid(format!("seed file: {e}"))))
    }
}

/// Creates every well-formed row through the ledger and returns how many
/// accounts were created. Bad rows and rejected creations are logged and skipped.
pub async fn seed_ledger<R: Read>(ledger: &AccountLedger, reader: AccountSeedReader<R>) -> usize {
    let rows: Vec<Result<SeedAccount>> = reader.accounts().collect();
    let mut created = 0;

    for (line, row) in rows.into_iter().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping seed row");
                continue;
            }
        };
        match ledger
            .create_account(&row.account_number, &row.owner_name, row.balance)
            .await
        {
            Ok(_) => created += 1,
            Err(e) => warn!(account = %row.account_number, error = %e, "seed account rejected"),
        }
    }

    info!(created, "seed accounts loaded");
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::in_memory::InMemoryAccountStore;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "account_number, owner_name, balance\n\
                    ACC-001, Wang Da-ming, 10000.00\n\
                    ACC-003, Chen, 500";
        let reader = AccountSeedReader::new(data.as_bytes());
        let results: Vec<Result<SeedAccount>> = reader.accounts().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.account_number, "ACC-001");
        assert_eq!(first.owner_name, "Wang Da-ming");
        assert_eq!(first.balance, dec!(10000.00));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "account_number,owner_name,balance\nACC-001,Wang,lots\nACC-002,Li,1.00";
        let reader = AccountSeedReader::new(data.as_bytes());
        let results: Vec<Result<SeedAccount>> = reader.accounts().collect();

        assert!(matches!(results[0], Err(LedgerError::InvalidArgument(_))));
        assert!(results[1].is_ok());
    }

    #[tokio::test]
    async fn test_seed_ledger_skips_bad_rows() {
        let ledger = AccountLedger::new(
            Box::new(InMemoryAccountStore::new()),
            Box::new(SystemClock),
        );
        let data = "account_number,owner_name,balance\n\
                    ACC-001,Wang,10000.00\n\
                    ACC-002,Li,not-a-number\n\
                    ACC-001,Duplicate,1.00\n\
                    ACC-003,Chen,500.00\n\
                    ACC-004,Negative,-1";

        let created = seed_ledger(&ledger, AccountSeedReader::new(data.as_bytes())).await;
        assert_eq!(created, 2);

        let accounts = ledger.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].owner_name(), "Wang");
        assert_eq!(accounts[1].balance().value(), dec!(500.00));
    }
}
