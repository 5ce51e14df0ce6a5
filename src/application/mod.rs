//! Application layer.
//!
//! `AccountLedger` owns balances and statuses behind an `AccountStore`;
//! `PaymentOrchestrator` composes the remote account calls into a payment.
//! Both receive their collaborators through their constructors.

pub mod ledger;
pub mod orchestrator;
