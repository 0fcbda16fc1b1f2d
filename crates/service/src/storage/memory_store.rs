use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{document::Document, errors::ServiceError, storage::DocumentStore};

/// In-process document store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Document>,
    persists: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Start from an existing document.
    pub fn with_document(document: Document) -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(document), persists: AtomicUsize::new(0) })
    }

    pub async fn snapshot(&self) -> Document {
        self.inner.read().await.clone()
    }

    /// Number of successful `persist` calls so far.
    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Result<Document, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn persist(&self, document: &Document) -> Result<(), ServiceError> {
        *self.inner.write().await = document.clone();
        self.persists.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_round_trip() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        assert_eq!(store.load().await?, Document::default());

        let doc: Document = serde_json::from_value(json!({"history": [{"id": "1"}]}))?;
        store.persist(&doc).await?;
        assert_eq!(store.load().await?, doc);
        assert_eq!(store.snapshot().await, doc);
        assert_eq!(store.persist_count(), 1);
        Ok(())
    }
}
