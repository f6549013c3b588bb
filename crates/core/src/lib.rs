//! Core business logic for Mudra.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Services are written against the store traits each module declares; the
//! database crate implements them.
//!
//! # Modules
//!
//! - `auth` - Registration, OTP verification, login
//! - `ledger` - Expense transactions
//! - `budget` - Monthly category budgets and spend tracking
//! - `goals` - Savings goals and contributions
//! - `dashboard` - Spending summaries
//! - `risk` - Risk questionnaire and the advisor bridge

pub mod auth;
pub mod budget;
pub mod category;
pub mod dashboard;
pub mod goals;
pub mod ledger;
pub mod money;
pub mod period;
pub mod risk;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use category::Category;
pub use period::MonthPeriod;
pub use store::{StoreError, StoreResult, Stores};
