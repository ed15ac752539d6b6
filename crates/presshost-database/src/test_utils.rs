//! Test utilities for database integration tests
//!
//! This module provides a reusable in-memory SQLite database with the full
//! schema applied, for integration testing across all presshost crates.
//! Entity enum columns persist as text, so the schema is identical under
//! SQLite and Postgres.

use crate::DbConnection;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

use presshost_migrations::Migrator;

/// Test database handle holding an isolated in-memory SQLite instance
pub struct TestDatabase {
    pub db: Arc<DbConnection>,
}

impl TestDatabase {
    /// Create a fresh in-memory database with all migrations applied.
    ///
    /// The pool is pinned to a single connection; with SQLite every pooled
    /// connection would otherwise see its own empty in-memory database.
    pub async fn with_migrations() -> anyhow::Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);

        let db = Database::connect(opt).await?;
        Migrator::up(&db, None).await?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Clone the shared connection handle
    pub fn connection_arc(&self) -> Arc<DbConnection> {
        Arc::clone(&self.db)
    }
}
