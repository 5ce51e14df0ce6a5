use crate::domain::account::{Account, Amount};
use crate::domain::debit::{DebitOutcome, DebitResult};
use crate::domain::ports::{AccountStoreBox, ClockBox};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Default number of read-modify-swap rounds before a write gives up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

/// What a mutation decided to do with the account copy it was handed.
enum Change<T> {
    /// Persist the modified copy, then return the value.
    Write(T),
    /// Discard the copy and return the value without touching the store.
    Keep(T),
}

/// The authoritative record of account balances and statuses.
///
/// Every mutation is a read, a pure transition on a copy, and a
/// compare-and-swap against the version that was read. A lost race re-reads
/// and re-applies, so concurrent operations on one account behave as if they
/// had run one after the other.
pub struct AccountLedger {
    store: AccountStoreBox,
    clock: ClockBox,
    max_attempts: u32,
}

impl AccountLedger {
    /// Creates a new `AccountLedger`.
    ///
    /// # Arguments
    ///
    /// * `store` - Where accounts are persisted.
    /// * `clock` - Source of `created_at` / `updated_at` timestamps.
    pub fn new(store: AccountStoreBox, clock: ClockBox) -> Self {
        Self {
            store,
            clock,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub async fn create_account(
        &self,
        account_number: &str,
        owner_name: &str,
        initial_balance: Decimal,
    ) -> Result<Account> {
        info!(account = account_number, "creating account");

        let account = Account::open(account_number, owner_name, initial_balance, self.clock.now())?;
        self.store.insert(account.clone()).await?;

        info!(
            account = account_number,
            balance = %account.balance().value(),
            "account created"
        );
        Ok(account)
    }

    pub async fn get_account(&self, account_number: &str) -> Result<Account> {
        debug!(account = account_number, "getting account");
        self.store
            .get(account_number)
            .await?
            .ok_or_else(|| LedgerError::NotFound(account_number.to_string()))
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.store.all_accounts().await
    }

    /// Debits `amount` from the account.
    ///
    /// Insufficient balance is not an error: it comes back as an outcome with
    /// `succeeded == false` and the balance unchanged.
    pub async fn debit(&self, account_number: &str, amount: Decimal) -> Result<DebitOutcome> {
        let amount = Amount::new(amount)?;
        info!(account = account_number, amount = %amount.value(), "debiting account");

        let outcome = self
            .mutate(account_number, |account, now| {
                match account.debit(amount, now) {
                    DebitResult::Rejected(e) => Err(e),
                    DebitResult::InsufficientFunds { balance, requested } => {
                        Ok(Change::Keep(DebitOutcome::insufficient_balance(
                            account.account_number(),
                            balance,
                            requested,
                        )))
                    }
                    DebitResult::Applied {
                        previous,
                        current,
                        debited,
                    } => Ok(Change::Write(DebitOutcome::success(
                        account.account_number(),
                        previous,
                        current,
                        debited,
                    ))),
                }
            })
            .await;

        match &outcome {
            Ok(o) if o.succeeded => info!(
                account = account_number,
                previous_balance = %o.previous_balance,
                new_balance = %o.current_balance,
                "debit successful"
            ),
            Ok(o) => warn!(
                account = account_number,
                balance = %o.current_balance,
                requested = %o.debited_amount,
                "debit failed due to insufficient balance"
            ),
            Err(e) => warn!(account = account_number, error = %e, "debit rejected"),
        }
        outcome
    }

    pub async fn freeze(&self, account_number: &str) -> Result<Account> {
        info!(account = account_number, "freezing account");
        let account = self
            .transition(account_number, |account, now| account.freeze(now))
            .await?;
        info!(account = account_number, "account frozen");
        Ok(account)
    }

    pub async fn unfreeze(&self, account_number: &str) -> Result<Account> {
        info!(account = account_number, "unfreezing account");
        let account = self
            .transition(account_number, |account, now| account.unfreeze(now))
            .await?;
        info!(account = account_number, "account unfrozen");
        Ok(account)
    }

    pub async fn close(&self, account_number: &str) -> Result<Account> {
        info!(account = account_number, "closing account");
        let account = self
            .transition(account_number, |account, now| account.close(now))
            .await?;
        info!(account = account_number, "account closed");
        Ok(account)
    }

    async fn transition<F>(&self, account_number: &str, mut apply: F) -> Result<Account>
    where
        F: FnMut(&mut Account, DateTime<Utc>) -> Result<()> + Send,
    {
        self.mutate(account_number, |account, now| {
            apply(account, now)?;
            Ok(Change::Write(account.clone()))
        })
        .await
    }

    async fn mutate<T, F>(&self, account_number: &str, mut apply: F) -> Result<T>
    where
        T: Send,
        F: FnMut(&mut Account, DateTime<Utc>) -> Result<Change<T>> + Send,
    {
        for attempt in 1..=self.max_attempts {
            let current = self.get_account(account_number).await?;
            let expected = current.version();

            let mut next = current;
            next.set_version(expected + 1);
            match apply(&mut next, self.clock.now())? {
                Change::Keep(value) => return Ok(value),
                Change::Write(value) => {
                    if self.store.compare_and_swap(expected, next).await? {
                        return Ok(value);
                    }
                    debug!(
                        account = account_number,
                        attempt, "concurrent modification, retrying"
                    );
                }
            }
        }

        Err(LedgerError::Conflict(account_number.to_string()))
    }
}
