use super::account::Amount;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const PAYMENT_SUCCESSFUL: &str = "Payment successful";
pub const ACCOUNT_NOT_ACTIVE: &str = "Account is not active";

/// A request to pay `amount` out of `account_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default)]
    pub account_number: String,
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PaymentRequest {
    /// Checks the request shape and returns the validated amount.
    pub fn validate(&self) -> Result<Amount> {
        if self.account_number.trim().is_empty() {
            return Err(LedgerError::invalid("Account number is required"));
        }
        let amount = self
            .amount
            .ok_or_else(|| LedgerError::invalid("Amount is required"))?;
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid("Amount must be greater than 0"));
        }
        Amount::new(amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// The debit was applied.
    Success,
    /// A business rule refused the payment (inactive account, insufficient balance).
    Failed,
    /// The account service could not be consulted reliably.
    Error,
}

/// Outcome of a payment as seen by the client.
///
/// Balances and amount are only present on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub status: PaymentStatus,
    pub message: String,
}

impl PaymentResult {
    pub fn success(
        account_number: impl Into<String>,
        previous_balance: Decimal,
        current_balance: Decimal,
        amount: Amount,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            previous_balance: Some(previous_balance),
            current_balance: Some(current_balance),
            amount: Some(amount.value()),
            status: PaymentStatus::Success,
            message: PAYMENT_SUCCESSFUL.to_string(),
        }
    }

    pub fn failed(account_number: impl Into<String>, message: impl Into<String>) -> Self {
        Self::without_balances(account_number, PaymentStatus::Failed, message)
    }

    pub fn error(account_number: impl Into<String>, message: impl Into<String>) -> Self {
        Self::without_balances(account_number, PaymentStatus::Error, message)
    }

    fn without_balances(
        account_number: impl Into<String>,
        status: PaymentStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            previous_balance: None,
            current_balance: None,
            amount: None,
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(account: &str, amount: Option<Decimal>) -> PaymentRequest {
        PaymentRequest {
            account_number: account.to_string(),
            amount,
            description: None,
        }
    }

    #[test]
    fn test_request_validation() {
        assert_eq!(
            request("ACC-001", Some(dec!(10))).validate().unwrap().value(),
            dec!(10.00)
        );
        assert!(request(" ", Some(dec!(10))).validate().is_err());
        assert!(request("ACC-001", None).validate().is_err());
        assert!(request("ACC-001", Some(dec!(0))).validate().is_err());
        assert!(request("ACC-001", Some(dec!(-5))).validate().is_err());
    }

    #[test]
    fn test_request_description_is_optional() {
        let req: PaymentRequest =
            serde_json::from_str(r#"{"accountNumber":"ACC-001","amount":"12.00"}"#).unwrap();
        assert_eq!(req.description, None);
        assert_eq!(req.amount, Some(dec!(12)));
    }

    #[test]
    fn test_failed_result_has_no_balances() {
        let result = PaymentResult::failed("ACC-001", ACCOUNT_NOT_ACTIVE);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "FAILED");
        assert_eq!(value["message"], ACCOUNT_NOT_ACTIVE);
        assert!(value.get("previousBalance").is_none());
        assert!(value.get("amount").is_none());
    }
}
