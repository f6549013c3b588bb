//! Dashboard summary.
//!
//! Two aggregations over the user's transactions:
//! - Spending by category for the current month
//! - Monthly totals over a trailing window ending with the current month

pub mod service;
pub mod types;

pub use service::{DashboardService, TRAILING_MONTHS};
pub use types::{CategoryTotal, DashboardSummary, DateWindow, MonthlyTotal, SummaryStore};
