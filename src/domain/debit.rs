use super::account::{Amount, Balance};
use crate::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEBIT_SUCCESSFUL: &str = "Debit successful";
pub const INSUFFICIENT_BALANCE: &str = "Insufficient balance";

/// Result of attempting a debit against a single account.
///
/// Structural violations, the soft "not enough money" outcome and an applied
/// debit are three distinct branches so callers have to handle each one.
#[derive(Debug)]
pub enum DebitResult {
    Rejected(LedgerError),
    InsufficientFunds { balance: Balance, requested: Amount },
    Applied {
        previous: Balance,
        current: Balance,
        debited: Amount,
    },
}

/// The debit outcome as reported to callers and sent over the wire.
///
/// `succeeded == false` means insufficient balance; the balances are then equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitOutcome {
    pub account_number: String,
    pub previous_balance: Decimal,
    pub current_balance: Decimal,
    pub debited_amount: Decimal,
    #[serde(rename = "success")]
    pub succeeded: bool,
    pub message: String,
}

impl DebitOutcome {
    pub fn success(
        account_number: impl Into<String>,
        previous: Balance,
        current: Balance,
        debited: Amount,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            previous_balance: previous.value(),
            current_balance: current.value(),
            debited_amount: debited.value(),
            succeeded: true,
            message: DEBIT_SUCCESSFUL.to_string(),
        }
    }

    pub fn insufficient_balance(
        account_number: impl Into<String>,
        balance: Balance,
        requested: Amount,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            previous_balance: balance.value(),
            current_balance: balance.value(),
            debited_amount: requested.value(),
            succeeded: false,
            message: INSUFFICIENT_BALANCE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_success_outcome() {
        let outcome = DebitOutcome::success(
            "ACC-001",
            Balance::new(dec!(10000)).unwrap(),
            Balance::new(dec!(9000)).unwrap(),
            Amount::new(dec!(1000)).unwrap(),
        );
        assert!(outcome.succeeded);
        assert_eq!(outcome.message, DEBIT_SUCCESSFUL);
        assert_eq!(
            outcome.current_balance,
            outcome.previous_balance - outcome.debited_amount
        );
    }

    #[test]
    fn test_insufficient_balance_outcome() {
        let outcome = DebitOutcome::insufficient_balance(
            "ACC-003",
            Balance::new(dec!(500)).unwrap(),
            Amount::new(dec!(99999)).unwrap(),
        );
        assert!(!outcome.succeeded);
        assert_eq!(outcome.message, INSUFFICIENT_BALANCE);
        assert_eq!(outcome.previous_balance, dec!(500.00));
        assert_eq!(outcome.current_balance, dec!(500.00));
        assert_eq!(outcome.debited_amount, dec!(99999.00));
    }

    #[test]
    fn test_wire_field_names() {
        let json = r#"{
            "accountNumber": "ACC-001",
            "previousBalance": 10000.00,
            "currentBalance": 9000.00,
            "debitedAmount": 1000.00,
            "success": true,
            "message": "Debit successful"
        }"#;
        let outcome: DebitOutcome = serde_json::from_str(json).unwrap();
        assert!(outcome.succeeded);
        assert_eq!(outcome.current_balance, dec!(9000));

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], serde_json::json!(true));
        assert!(value.get("succeeded").is_none());
    }
}
