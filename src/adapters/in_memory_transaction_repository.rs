//! In-memory implementation of TransactionRepository.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{NewTransaction, Transaction};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    records: BTreeMap<i64, Transaction>,
    by_transaction_id: HashMap<String, i64>,
}

/// Thread-safe in-memory store. `Clone` shares the same underlying maps.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTransactionRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert(&self, tx: NewTransaction) -> RepositoryResult<Transaction> {
        let mut inner = self.inner.write().await;
        if inner.by_transaction_id.contains_key(&tx.transaction_id) {
            return Err(RepositoryError::DuplicateTransactionId(tx.transaction_id));
        }

        inner.last_id += 1;
        let record = tx.with_id(inner.last_id);
        inner
            .by_transaction_id
            .insert(record.transaction_id.clone(), record.id);
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, tx: &Transaction) -> RepositoryResult<Transaction> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .records
            .get_mut(&tx.id)
            .ok_or_else(|| RepositoryError::NotFound(tx.id.to_string()))?;
        *slot = tx.clone();
        Ok(tx.clone())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Transaction>> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> RepositoryResult<Option<Transaction>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_transaction_id
            .get(transaction_id)
            .and_then(|id| inner.records.get(id))
            .cloned())
    }

    async fn find_recent(&self, limit: usize) -> RepositoryResult<Vec<Transaction>> {
        let inner = self.inner.read().await;
        let mut recent: Vec<Transaction> = inner.records.values().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
