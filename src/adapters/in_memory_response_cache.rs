//! Process-local response cache keyed by surrogate transaction id.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::TransactionView;
use crate::ports::ResponseCache;

#[derive(Debug, Default, Clone)]
pub struct InMemoryResponseCache {
    entries: Arc<RwLock<HashMap<i64, TransactionView>>>,
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, id: i64) -> Option<TransactionView> {
        self.entries.read().await.get(&id).cloned()
    }

    async fn put(&self, id: i64, view: TransactionView) {
        self.entries.write().await.insert(id, view);
    }

    async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let evicted = entries.len();
        entries.clear();
        tracing::debug!("Evicted {} cached transaction views", evicted);
    }
}
