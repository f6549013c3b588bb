//! Monthly category budgets and spend tracking.

pub mod error;
pub mod service;
pub mod types;


pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{
    Budget, BudgetInput, BudgetLimitRequest, BudgetPeriodQuery, BudgetRequest, BudgetSpending,
    BudgetStatus, BudgetStore,
};
