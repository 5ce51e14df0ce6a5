#![allow(dead_code)]

use axum::Router;
use ledgerpay::application::ledger::AccountLedger;
use ledgerpay::application::orchestrator::PaymentOrchestrator;
use ledgerpay::infrastructure::clock::SystemClock;
use ledgerpay::infrastructure::http_client::HttpAccountClient;
use ledgerpay::infrastructure::in_memory::InMemoryAccountStore;
use ledgerpay::interfaces::http::{accounts, payments};
use rust_decimal_macros::dec;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral loopback port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A loopback port with nothing listening on it.
pub async fn dead_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}

/// Ledger with the usual fixtures:
/// ACC-001 10000.00 active, ACC-002 3000.00 frozen, ACC-003 500.00 active.
pub async fn seeded_ledger() -> Arc<AccountLedger> {
    let ledger = AccountLedger::new(Box::new(InMemoryAccountStore::new()), Box::new(SystemClock))
        .with_max_attempts(10_000);
    ledger
        .create_account("ACC-001", "Wang Da-ming", dec!(10000.00))
        .await
        .unwrap();
    ledger
        .create_account("ACC-002", "Li Xiao-hua", dec!(3000.00))
        .await
        .unwrap();
    ledger.freeze("ACC-002").await.unwrap();
    ledger
        .create_account("ACC-003", "Chen Mei", dec!(500.00))
        .await
        .unwrap();
    Arc::new(ledger)
}

/// Starts an account service over `ledger` and returns its address.
pub async fn account_service(ledger: Arc<AccountLedger>) -> SocketAddr {
    spawn(accounts::router(ledger)).await
}

pub fn orchestrator(account_service: SocketAddr) -> PaymentOrchestrator {
    orchestrator_with_timeout(account_service, Duration::from_secs(5))
}

pub fn orchestrator_with_timeout(
    account_service: SocketAddr,
    timeout: Duration,
) -> PaymentOrchestrator {
    let client = HttpAccountClient::new(&url(account_service), timeout).unwrap();
    PaymentOrchestrator::new(Box::new(client))
}

/// Starts a payment service talking to `account_service`.
pub async fn payment_service(account_service: SocketAddr) -> SocketAddr {
    spawn(payments::router(Arc::new(orchestrator(account_service)))).await
}
