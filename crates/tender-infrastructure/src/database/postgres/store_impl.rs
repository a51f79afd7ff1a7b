// ============================================================================
// Tender Infrastructure - PostgreSQL Store
// File: crates/tender-infrastructure/src/database/postgres/store_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::error;

use tender_core::error::DomainError;
use tender_core::repositories::{Store, StoreTx};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, DomainError> {
        let tx = self.pool.begin().await.map_err(db_error("beginning transaction"))?;
        Ok(Box::new(PgStoreTx { tx: Some(tx) }))
    }
}

/// Open Postgres transaction. Dropped without `commit`, sqlx rolls it back.
pub struct PgStoreTx {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgStoreTx {
    pub(crate) fn conn(&mut self) -> Result<&mut PgConnection, DomainError> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| DomainError::store("using transaction", "transaction already committed"))
    }
}

#[async_trait]
impl StoreTx for PgStoreTx {
    async fn commit(&mut self) -> Result<(), DomainError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await.map_err(db_error("committing transaction"))?;
        }
        Ok(())
    }
}

/// Logs a sqlx error and wraps it with the operation that failed.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        error!("Database error {}: {}", context, e);
        DomainError::store(context, e.to_string())
    }
}

/// Wraps a row that failed to decode into the domain model.
pub(crate) fn decode_error(context: &'static str, e: DomainError) -> DomainError {
    error!("Invalid row while {}: {}", context, e);
    DomainError::store(context, e.to_string())
}
