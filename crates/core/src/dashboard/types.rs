//! Dashboard data types.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::category::Category;
use crate::store::StoreResult;

/// A half-open date range `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First included day.
    pub from: NaiveDate,
    /// First excluded day.
    pub to: NaiveDate,
}

/// Spend in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category.
    pub category: Category,
    /// Sum of amounts.
    pub total: Decimal,
}

/// Spend in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`.
    pub month: String,
    /// Sum of amounts.
    pub total: Decimal,
}

/// Dashboard response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Current month, largest total first. Empty categories are omitted.
    pub spending_by_category: Vec<CategoryTotal>,
    /// Trailing months, oldest first. Empty months are omitted.
    pub monthly_spending: Vec<MonthlyTotal>,
}

/// Read-only aggregations over transactions.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Sum per category for transactions dated inside `window`.
    async fn spending_by_category(
        &self,
        user_id: Uuid,
        window: DateWindow,
    ) -> StoreResult<Vec<CategoryTotal>>;

    /// Sum per `YYYY-MM` month for transactions dated inside `window`.
    async fn monthly_spending(
        &self,
        user_id: Uuid,
        window: DateWindow,
    ) -> StoreResult<Vec<MonthlyTotal>>;
}
