use ledgerpay::domain::account::Account;
use ledgerpay::domain::ports::{AccountStoreBox, Clock, ClockBox};
use ledgerpay::infrastructure::clock::SystemClock;
use ledgerpay::infrastructure::in_memory::InMemoryAccountStore;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_store_as_trait_object() {
    let store: AccountStoreBox = Box::new(InMemoryAccountStore::new());
    let clock: ClockBox = Box::new(SystemClock);

    let account = Account::open("ACC-001", "Wang", dec!(100.0), clock.now()).unwrap();

    // Verify Send + Sync by spawning tasks
    let handle = tokio::spawn(async move {
        store.insert(account).await.unwrap();
        store.get("ACC-001").await.unwrap().unwrap()
    });

    let retrieved = handle.await.unwrap();
    assert_eq!(retrieved.account_number(), "ACC-001");
    assert_eq!(retrieved.balance().value(), dec!(100.00));
}
