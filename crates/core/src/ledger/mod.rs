//! Expense transactions.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{Transaction, TransactionInput, TransactionRequest, TransactionStore};
