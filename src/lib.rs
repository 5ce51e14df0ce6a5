//! Account ledger and cross-service payment orchestration.
//!
//! - [`application::ledger::AccountLedger`] guards per-account balances and statuses.
//! - [`application::orchestrator::PaymentOrchestrator`] turns a remote account
//!   lookup plus a remote debit into one [`domain::payment::PaymentResult`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod telemetry;
