//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{NewTransaction, Transaction};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

const COLUMNS: &str = "id, transaction_id, card_number_masked, card_expiry, amount, status, \
     transaction_type, response_code, response_message, authorization_code, created_at, updated_at";

/// Postgres-backed transaction repository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert(&self, tx: NewTransaction) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO transactions (
                transaction_id, card_number_masked, card_expiry, amount, status,
                transaction_type, response_code, response_message, authorization_code,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&tx.transaction_id)
        .bind(&tx.card_number_masked)
        .bind(&tx.card_expiry)
        .bind(&tx.amount)
        .bind(tx.status.as_str())
        .bind(tx.transaction_type.as_str())
        .bind(&tx.response_code)
        .bind(&tx.response_message)
        .bind(&tx.authorization_code)
        .bind(tx.created_at)
        .bind(tx.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::DuplicateTransactionId(tx.transaction_id.clone())
            }
            other => RepositoryError::from(other),
        })?;

        row.into_domain()
    }

    async fn update(&self, tx: &Transaction) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            UPDATE transactions SET
                status = $2, transaction_type = $3, response_code = $4,
                response_message = $5, authorization_code = $6, updated_at = $7
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(tx.id)
        .bind(tx.status.as_str())
        .bind(tx.transaction_type.as_str())
        .bind(&tx.response_code)
        .bind(&tx.response_message)
        .bind(&tx.authorization_code)
        .bind(tx.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| RepositoryError::NotFound(tx.id.to_string()))?
            .into_domain()
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Transaction>> {
        sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(TransactionRow::into_domain)
        .transpose()
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> RepositoryResult<Option<Transaction>> {
        sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE transaction_id = $1"
        ))
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?
        .map(TransactionRow::into_domain)
        .transpose()
    }

    async fn find_recent(&self, limit: usize) -> RepositoryResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    transaction_id: String,
    card_number_masked: String,
    card_expiry: String,
    amount: bigdecimal::BigDecimal,
    status: String,
    transaction_type: String,
    response_code: String,
    response_message: String,
    authorization_code: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        Ok(Transaction {
            id: self.id,
            transaction_id: self.transaction_id,
            card_number_masked: self.card_number_masked,
            card_expiry: self.card_expiry,
            amount: self.amount,
            status: self.status.parse().map_err(RepositoryError::Corrupt)?,
            transaction_type: self
                .transaction_type
                .parse()
                .map_err(RepositoryError::Corrupt)?,
            response_code: self.response_code,
            response_message: self.response_message,
            authorization_code: self.authorization_code,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
