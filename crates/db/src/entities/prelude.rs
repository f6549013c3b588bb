//! Entity re-exports.

pub use super::budgets::Entity as Budgets;
pub use super::goals::Entity as Goals;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
