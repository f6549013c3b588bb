//! Database migration runner for Mudra.
//!
//! Reads `DATABASE_URL` (also from `.env`).
//!
//! Usage:
//!   migrator up      - Create the users, transactions, budgets and goals tables
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations

use mudra_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Sets up its own tracing.
    cli::run_cli(Migrator).await;
}
