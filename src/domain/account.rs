use super::debit::DebitResult;
use super::status::{AccountStatus, Transition, allowed};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimal places carried by every monetary value.
pub const MONEY_SCALE: u32 = 2;

fn to_money_scale(value: Decimal, what: &str) -> Result<Decimal> {
    if value.normalize().scale() > MONEY_SCALE {
        return Err(LedgerError::invalid(format!(
            "{what} must have at most {MONEY_SCALE} decimal places"
        )));
    }
    let mut scaled = value;
    scaled.rescale(MONEY_SCALE);
    Ok(scaled)
}

/// Represents an account balance with 2 decimal places precision.
///
/// A `Balance` can never be negative: the only way to lower one is
/// [`Balance::checked_sub`], which refuses to cross zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Balance(Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(LedgerError::invalid(
                "Initial balance cannot be null or negative",
            ));
        }
        to_money_scale(value, "Balance").map(Self)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Subtracts `amount`, or returns `None` if the result would be negative.
    pub fn checked_sub(self, amount: Amount) -> Option<Self> {
        if self.0 >= amount.0 {
            Some(Self(self.0 - amount.0))
        } else {
            None
        }
    }

    pub fn covers(&self, amount: Amount) -> bool {
        self.0 >= amount.0
    }
}

impl TryFrom<Decimal> for Balance {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Balance> for Decimal {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}

/// Represents a positive monetary amount for debits and payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(LedgerError::invalid("Debit amount must be positive"));
        }
        to_money_scale(value, "Amount").map(Self)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// One account's balance and status.
///
/// Mutations go through the transition methods below, which consult the guard
/// table and refresh `updated_at`. `version` is bumped by the ledger on every
/// persisted write and is what the store compares on swap.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    account_number: String,
    owner_name: String,
    balance: Balance,
    status: AccountStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    version: u64,
}

impl Account {
    /// Opens a new `ACTIVE` account.
    pub fn open(
        account_number: impl Into<String>,
        owner_name: impl Into<String>,
        initial_balance: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let account_number = account_number.into();
        let owner_name = owner_name.into();

        if account_number.trim().is_empty() {
            return Err(LedgerError::invalid(
                "Account number cannot be null or blank",
            ));
        }
        if owner_name.trim().is_empty() {
            return Err(LedgerError::invalid("Owner name cannot be null or blank"));
        }
        let balance = Balance::new(initial_balance)?;

        Ok(Self {
            account_number,
            owner_name,
            balance,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Debits `amount` if the account is active and the balance covers it.
    ///
    /// The balance is left untouched unless the result is `Applied`.
    pub fn debit(&mut self, amount: Amount, now: DateTime<Utc>) -> DebitResult {
        if !allowed(Transition::Debit, self.status) {
            return DebitResult::Rejected(self.debit_rejection());
        }

        let previous = self.balance;
        match previous.checked_sub(amount) {
            Some(current) => {
                self.balance = current;
                self.updated_at = now;
                DebitResult::Applied {
                    previous,
                    current,
                    debited: amount,
                }
            }
            None => DebitResult::InsufficientFunds {
                balance: previous,
                requested: amount,
            },
        }
    }

    pub fn freeze(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(Transition::Freeze, now)
    }

    pub fn unfreeze(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(Transition::Unfreeze, now)
    }

    pub fn close(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(Transition::Close, now)
    }

    fn transition(&mut self, transition: Transition, now: DateTime<Utc>) -> Result<()> {
        if !allowed(transition, self.status) {
            return Err(LedgerError::InvalidStateTransition {
                transition,
                status: self.status,
            });
        }
        self.status = transition.target(self.status);
        self.updated_at = now;
        Ok(())
    }

    fn debit_rejection(&self) -> LedgerError {
        match self.status {
            AccountStatus::Frozen => LedgerError::Frozen(self.account_number.clone()),
            AccountStatus::Closed => LedgerError::Closed(self.account_number.clone()),
            AccountStatus::Active => LedgerError::InvalidStateTransition {
                transition: Transition::Debit,
                status: self.status,
            },
        }
    }
}
