use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::{
    document::{Collection, Document, Item},
    errors::ServiceError,
    ids::IdGenerator,
    storage::DocumentStore,
};

/// CRUD over the named collections of the persisted document.
///
/// Every call re-reads the document from the store. Mutations run their whole
/// load-modify-persist cycle under `write_lock`, so concurrent writers in this
/// process cannot overwrite each other's changes.
pub struct CollectionService {
    store: Arc<dyn DocumentStore>,
    ids: Arc<dyn IdGenerator>,
    write_lock: Mutex<()>,
}

impl CollectionService {
    pub fn new(store: Arc<dyn DocumentStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids, write_lock: Mutex::new(()) }
    }

    pub async fn list(&self, collection: Collection) -> Result<Vec<Item>, ServiceError> {
        let mut doc = self.store.load().await?;
        Ok(std::mem::take(doc.items_mut(collection)))
    }

    pub async fn get(&self, collection: Collection, id: &str) -> Result<Item, ServiceError> {
        let doc = self.store.load().await?;
        doc.find(collection, id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(&format!("{collection} item {id}")))
    }

    /// Append a new item with a server-assigned id.
    #[instrument(skip(self, body), fields(collection = %collection))]
    pub async fn create(&self, collection: Collection, body: Item) -> Result<Item, ServiceError> {
        let created = self
            .mutate(|doc| {
                let item = Item::with_id(self.ids.next_id(), body);
                doc.items_mut(collection).push(item.clone());
                Ok(item)
            })
            .await?;
        info!(id = created.id().unwrap_or_default(), "created item");
        Ok(created)
    }

    /// Shallow-merge `patch` into the item with `id`.
    #[instrument(skip(self, patch), fields(collection = %collection))]
    pub async fn update(&self, collection: Collection, id: &str, patch: Item) -> Result<Item, ServiceError> {
        let updated = self
            .mutate(|doc| {
                let existing = doc
                    .items_mut(collection)
                    .iter_mut()
                    .find(|item| item.has_id(id))
                    .ok_or_else(|| ServiceError::not_found(&format!("{collection} item {id}")))?;
                existing.merge(patch);
                Ok(existing.clone())
            })
            .await?;
        info!(%id, "updated item");
        Ok(updated)
    }

    /// Remove the item with `id`. Returns whether anything was removed; a miss is not an error.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<bool, ServiceError> {
        let removed = self
            .mutate(|doc| {
                let items = doc.items_mut(collection);
                let before = items.len();
                items.retain(|item| !item.has_id(id));
                Ok(items.len() != before)
            })
            .await?;
        if removed {
            info!(%id, "deleted item");
        } else {
            warn!(%id, "attempted to delete non-existent item");
        }
        Ok(removed)
    }

    /// Empty the collection. Returns how many items were dropped.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn clear(&self, collection: Collection) -> Result<usize, ServiceError> {
        let dropped = self
            .mutate(|doc| Ok(std::mem::take(doc.items_mut(collection)).len()))
            .await?;
        info!(dropped, "cleared collection");
        Ok(dropped)
    }

    /// Load, apply `f`, persist; all while holding the write lock.
    /// Nothing is persisted when `f` fails.
    async fn mutate<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Document) -> Result<T, ServiceError>,
    {
        // 整个读-改-写周期持锁，避免并发写互相覆盖
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.load().await?;
        let out = f(&mut doc)?;
        self.store.persist(&doc).await?;
        Ok(out)
    }
}
