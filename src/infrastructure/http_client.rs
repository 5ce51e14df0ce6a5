//! HTTP client for a remote account service.
//!
//! Speaks the account service's JSON surface:
//! - `GET  {base}/api/v1/accounts/{accountNumber}`
//! - `POST {base}/api/v1/accounts/{accountNumber}/debit` with `{"amount": ...}`

use crate::domain::account::Amount;
use crate::domain::debit::DebitOutcome;
use crate::domain::ports::{AccountSnapshot, RemoteAccountClient};
use crate::error::RemoteError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct DebitRequestBody {
    amount: Amount,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Flattens a reqwest error and its causes into one message, so a refused
/// connection and a timeout read differently.
fn transport_error(e: reqwest::Error) -> RemoteError {
    let mut message = if e.is_timeout() {
        format!("request timed out: {e}")
    } else {
        e.to_string()
    };
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    RemoteError::Transport(message)
}

/// `RemoteAccountClient` over JSON/HTTP.
#[derive(Clone)]
pub struct HttpAccountClient {
    client: Client,
    base_url: Url,
}

impl HttpAccountClient {
    /// Create a client for the account service at `base_url`.
    ///
    /// `timeout` bounds every request end to end.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RemoteError::Transport(format!("invalid base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Transport(format!(
                "invalid base url {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, base_url })
    }

    fn account_url(&self, account_number: &str, action: Option<&str>) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                RemoteError::Transport(format!("invalid base url {}", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(["api", "v1", "accounts", account_number]);
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let bytes = response
            .bytes()
            .await
            .map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        }
    }
}

#[async_trait]
impl RemoteAccountClient for HttpAccountClient {
    async fn get_account(&self, account_number: &str) -> Result<AccountSnapshot, RemoteError> {
        let url = self.account_url(account_number, None)?;
        debug!(%url, "fetching account");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            });
        }
        Self::read_json(response).await
    }

    async fn debit(
        &self,
        account_number: &str,
        amount: Amount,
    ) -> Result<DebitOutcome, RemoteError> {
        let url = self.account_url(account_number, Some("debit"))?;
        debug!(%url, amount = %amount.value(), "debiting account");

        let response = self
            .client
            .post(url)
            .json(&DebitRequestBody { amount })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        match status {
            s if s.is_success() => Self::read_json(response).await,
            // the ledger refused because the account is frozen or closed
            StatusCode::FORBIDDEN => Err(RemoteError::AccountInactive(
                Self::error_message(response).await,
            )),
            _ => Err(RemoteError::Status {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_urls() {
        let client =
            HttpAccountClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();

        assert_eq!(
            client.account_url("ACC-001", None).unwrap().as_str(),
            "http://localhost:8080/api/v1/accounts/ACC-001"
        );
        assert_eq!(
            client.account_url("ACC 001", Some("debit")).unwrap().as_str(),
            "http://localhost:8080/api/v1/accounts/ACC%20001/debit"
        );
    }

    #[tokio::test]
    async fn test_refused_connection_names_the_cause() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = HttpAccountClient::new(&base, Duration::from_secs(1)).unwrap();
        let err = client.get_account("ACC-001").await.unwrap_err();

        let RemoteError::Transport(message) = err else {
            panic!("expected a transport error, got {err:?}");
        };
        assert!(!message.contains("timed out"), "{message}");
        // reqwest's own summary only names the url
        assert!(message.to_lowercase().contains("connect"), "{message}");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            HttpAccountClient::new("not a url", Duration::from_secs(1)),
            Err(RemoteError::Transport(_))
        ));
    }
}
