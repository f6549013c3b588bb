//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories implementing the core store traits
//! - Database migrations

pub mod entities;
mod error;
pub mod migration;
pub mod repositories;

use std::sync::Arc;
use std::time::Duration;

use mudra_core::Stores;
use mudra_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

pub use repositories::{
    BudgetRepository, GoalRepository, SummaryRepository, TransactionRepository, UserRepository,
};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Builds every store on top of one connection pool.
#[must_use]
pub fn stores(db: &DatabaseConnection) -> Stores {
    Stores {
        users: Arc::new(UserRepository::new(db.clone())),
        transactions: Arc::new(TransactionRepository::new(db.clone())),
        budgets: Arc::new(BudgetRepository::new(db.clone())),
        goals: Arc::new(GoalRepository::new(db.clone())),
        summaries: Arc::new(SummaryRepository::new(db.clone())),
    }
}
