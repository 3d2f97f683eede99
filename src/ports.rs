//! Narrow interfaces the payment core depends on. Adapters live in `crate::adapters`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewTransaction, Transaction, TransactionView};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Duplicate transaction id: {0}")]
    DuplicateTransactionId(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Transaction persistence. The store assigns surrogate ids on insert.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn insert(&self, tx: NewTransaction) -> RepositoryResult<Transaction>;

    /// Overwrites the record with the same `id`.
    async fn update(&self, tx: &Transaction) -> RepositoryResult<Transaction>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Transaction>>;

    async fn find_by_transaction_id(&self, transaction_id: &str)
        -> RepositoryResult<Option<Transaction>>;

    /// Newest first by `created_at`, then by `id`.
    async fn find_recent(&self, limit: usize) -> RepositoryResult<Vec<Transaction>>;

    async fn ping(&self) -> RepositoryResult<()>;
}

/// Memoized by-id views.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, id: i64) -> Option<TransactionView>;

    async fn put(&self, id: i64, view: TransactionView);

    async fn clear(&self);
}
