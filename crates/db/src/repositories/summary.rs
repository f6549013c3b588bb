//! Dashboard aggregation queries.

use async_trait::async_trait;
use mudra_core::StoreResult;
use mudra_core::dashboard::{CategoryTotal, DateWindow, MonthlyTotal, SummaryStore};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};
use uuid::Uuid;

use crate::error::{corrupt_row, store_error};

/// Read-only spending summaries over the `transactions` table.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    db: DatabaseConnection,
}

impl SummaryRepository {
    /// Creates a new summary repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn windowed(sql: &str, user_id: Uuid, window: DateWindow) -> Statement {
        Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [user_id.into(), window.from.into(), window.to.into()],
        )
    }
}

const SPENDING_BY_CATEGORY_SQL: &str = r"
SELECT category, SUM(amount) AS total
FROM transactions
WHERE user_id = $1 AND transaction_date >= $2 AND transaction_date < $3
GROUP BY category
ORDER BY total DESC
";

const MONTHLY_SPENDING_SQL: &str = r"
SELECT to_char(date_trunc('month', transaction_date), 'YYYY-MM') AS month,
       SUM(amount) AS total
FROM transactions
WHERE user_id = $1 AND transaction_date >= $2 AND transaction_date < $3
GROUP BY 1
ORDER BY 1
";

#[derive(Debug, FromQueryResult)]
struct CategoryRow {
    category: String,
    total: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct MonthRow {
    month: String,
    total: Decimal,
}

#[async_trait]
impl SummaryStore for SummaryRepository {
    async fn spending_by_category(
        &self,
        user_id: Uuid,
        window: DateWindow,
    ) -> StoreResult<Vec<CategoryTotal>> {
        let rows =
            CategoryRow::find_by_statement(Self::windowed(SPENDING_BY_CATEGORY_SQL, user_id, window))
                .all(&self.db)
                .await
                .map_err(store_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(CategoryTotal {
                    category: row
                        .category
                        .parse()
                        .map_err(|e| corrupt_row("transactions", e))?,
                    total: row.total,
                })
            })
            .collect()
    }

    async fn monthly_spending(
        &self,
        user_id: Uuid,
        window: DateWindow,
    ) -> StoreResult<Vec<MonthlyTotal>> {
        let rows = MonthRow::find_by_statement(Self::windowed(MONTHLY_SPENDING_SQL, user_id, window))
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|row| MonthlyTotal {
                month: row.month,
                total: row.total,
            })
            .collect())
    }
}
