//! Dashboard service.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::types::{DashboardSummary, DateWindow, SummaryStore};
use crate::period::MonthPeriod;
use crate::store::StoreError;

/// Months covered by the monthly trend, current month included.
pub const TRAILING_MONTHS: u32 = 6;

/// Builds the dashboard summary.
pub struct DashboardService {
    store: Arc<dyn SummaryStore>,
}

impl DashboardService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: Arc<dyn SummaryStore>) -> Self {
        Self { store }
    }

    /// The month containing `today`.
    #[must_use]
    pub fn current_month_window(today: NaiveDate) -> DateWindow {
        let (from, to) = MonthPeriod::containing(today).date_range();
        DateWindow { from, to }
    }

    /// From the first day of the month `TRAILING_MONTHS - 1` months before
    /// `today` up to the end of the current month.
    #[must_use]
    pub fn trailing_window(today: NaiveDate) -> DateWindow {
        let current = MonthPeriod::containing(today);
        DateWindow {
            from: current.months_back(TRAILING_MONTHS - 1).first_day(),
            to: current.next().first_day(),
        }
    }

    /// Summarizes spending as of `today`.
    ///
    /// Both aggregations run concurrently.
    pub async fn summary(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<DashboardSummary, StoreError> {
        let (mut spending_by_category, mut monthly_spending) = tokio::try_join!(
            self.store
                .spending_by_category(user_id, Self::current_month_window(today)),
            self.store
                .monthly_spending(user_id, Self::trailing_window(today)),
        )?;

        spending_by_category.sort_by_key(|c| (Reverse(c.total), c.category));
        monthly_spending.sort_by(|a, b| a.month.cmp(&b.month));

        Ok(DashboardSummary {
            spending_by_category,
            monthly_spending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::ledger::{TransactionInput, TransactionStore};
    use crate::testing::InMemoryStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn spend(
        store: &InMemoryStore,
        user: Uuid,
        amount: Decimal,
        category: Category,
        on: NaiveDate,
    ) {
        let input = TransactionInput {
            amount,
            category,
            description: None,
            transaction_date: on,
        };
        store.insert(user, &input).await.unwrap();
    }

    #[test]
    fn test_current_month_window() {
        let window = DashboardService::current_month_window(date(2025, 3, 15));
        assert_eq!(window.from, date(2025, 3, 1));
        assert_eq!(window.to, date(2025, 4, 1));
    }

    #[test]
    fn test_trailing_window_crosses_year() {
        let window = DashboardService::trailing_window(date(2025, 3, 15));
        assert_eq!(window.from, date(2024, 10, 1));
        assert_eq!(window.to, date(2025, 4, 1));
    }

    #[tokio::test]
    async fn test_summary_groups_and_orders() {
        let store = Arc::new(InMemoryStore::new());
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        spend(&store, user, dec!(40), Category::Food, date(2025, 3, 2)).await;
        spend(&store, user, dec!(25.50), Category::Food, date(2025, 3, 10)).await;
        spend(&store, user, dec!(120), Category::Bills, date(2025, 3, 1)).await;
        spend(&store, user, dec!(60), Category::Transport, date(2025, 1, 20)).await;
        spend(&store, user, dec!(15), Category::Health, date(2024, 10, 1)).await;
        // Outside the trailing window.
        spend(&store, user, dec!(999), Category::Other, date(2024, 9, 30)).await;
        // Another user.
        spend(&store, other, dec!(500), Category::Food, date(2025, 3, 5)).await;

        let service = DashboardService::new(store);
        let summary = service.summary(user, date(2025, 3, 15)).await.unwrap();

        let categories: Vec<_> = summary
            .spending_by_category
            .iter()
            .map(|c| (c.category, c.total))
            .collect();
        assert_eq!(
            categories,
            vec![(Category::Bills, dec!(120)), (Category::Food, dec!(65.50))]
        );

        let months: Vec<_> = summary
            .monthly_spending
            .iter()
            .map(|m| (m.month.as_str(), m.total))
            .collect();
        assert_eq!(
            months,
            vec![
                ("2024-10", dec!(15)),
                ("2025-01", dec!(60)),
                ("2025-03", dec!(185.50)),
            ]
        );
    }

    #[tokio::test]
    async fn test_summary_empty_user() {
        let service = DashboardService::new(Arc::new(InMemoryStore::new()));
        let summary = service
            .summary(Uuid::new_v4(), date(2025, 3, 15))
            .await
            .unwrap();

        assert!(summary.spending_by_category.is_empty());
        assert!(summary.monthly_spending.is_empty());

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("spendingByCategory").is_some());
        assert!(json.get("monthlySpending").is_some());
    }
}
