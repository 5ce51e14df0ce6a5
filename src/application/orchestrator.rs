use crate::domain::account::Amount;
use crate::domain::payment::{ACCOUNT_NOT_ACTIVE, PaymentResult};
use crate::domain::ports::{AccountSnapshot, RemoteAccountClientBox};
use crate::domain::status::AccountStatus;
use crate::error::RemoteError;
use tracing::{debug, error, info, warn};

/// Turns an account lookup and a debit, both owned by the account service,
/// into a single payment outcome.
///
/// The two calls are not atomic. The status check is a pre-check only: the
/// account can change between the lookup and the debit, and the remote
/// ledger's own guard is what finally decides.
pub struct PaymentOrchestrator {
    client: RemoteAccountClientBox,
}

impl PaymentOrchestrator {
    pub fn new(client: RemoteAccountClientBox) -> Self {
        Self { client }
    }

    /// Proxies the remote account lookup.
    pub async fn get_account(&self, account_number: &str) -> Result<AccountSnapshot, RemoteError> {
        info!(account = account_number, "getting account");
        self.client.get_account(account_number).await
    }

    /// Processes a payment by debiting `amount` from the account.
    ///
    /// Never fails: remote faults come back as `PaymentStatus::Error`.
    pub async fn process_payment(&self, account_number: &str, amount: Amount) -> PaymentResult {
        info!(account = account_number, amount = %amount.value(), "processing payment");

        match self.try_process(account_number, amount).await {
            Ok(result) => result,
            Err(RemoteError::AccountInactive(message)) => {
                warn!(
                    account = account_number,
                    reason = %message,
                    "debit refused, account no longer active"
                );
                PaymentResult::failed(account_number, ACCOUNT_NOT_ACTIVE)
            }
            Err(e) => {
                error!(account = account_number, error = %e, "payment error");
                PaymentResult::error(account_number, e.to_string())
            }
        }
    }

    async fn try_process(
        &self,
        account_number: &str,
        amount: Amount,
    ) -> Result<PaymentResult, RemoteError> {
        let account = self.client.get_account(account_number).await?;
        debug!(
            account = %account.account_number,
            status = %account.status,
            "account found"
        );

        if account.status != AccountStatus::Active {
            warn!(account = account_number, status = %account.status, "account is not active");
            return Ok(PaymentResult::failed(account_number, ACCOUNT_NOT_ACTIVE));
        }

        let outcome = self.client.debit(account_number, amount).await?;

        if outcome.succeeded {
            info!(account = account_number, amount = %amount.value(), "payment successful");
            Ok(PaymentResult::success(
                account_number,
                outcome.previous_balance,
                outcome.current_balance,
                amount,
            ))
        } else {
            warn!(account = account_number, reason = %outcome.message, "payment failed");
            Ok(PaymentResult::failed(account_number, outcome.message))
        }
    }
}
