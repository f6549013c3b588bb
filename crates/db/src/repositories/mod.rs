//! Repository abstractions for data access.
//!
//! Each repository implements one of the core store traits, hiding the
//! `SeaORM` implementation details from the rest of the application.

pub mod budget;
pub mod goal;
pub mod summary;
pub mod transaction;
pub mod user;

pub use budget::BudgetRepository;
pub use goal::GoalRepository;
pub use summary::SummaryRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
