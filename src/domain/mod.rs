//! Domain model: accounts, their status machine, and the values exchanged
//! between the ledger and the payment orchestrator.

pub mod account;
pub mod debit;
pub mod payment;
pub mod ports;
pub mod status;
