//! Mapping from `SeaORM` errors to store errors.

use mudra_core::StoreError;
use sea_orm::{DbErr, SqlErr};
use tracing::error;

/// Converts a database error, keeping unique-constraint violations distinct.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return StoreError::UniqueViolation(detail);
    }
    error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

/// A row that cannot be mapped back to its domain type.
pub(crate) fn corrupt_row(table: &str, detail: impl std::fmt::Display) -> StoreError {
    error!(table, %detail, "Unreadable row");
    StoreError::Backend(format!("unreadable {table} row: {detail}"))
}
