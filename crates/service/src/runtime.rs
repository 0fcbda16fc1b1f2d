//! Runtime wiring helpers
//!
//! Builds the service graph from configuration so binaries and tests share
//! one construction path.

use std::sync::Arc;

use configs::StorageConfig;
use tracing::info;

use crate::{collections::CollectionService, errors::ServiceError, ids, storage::JsonFileStore};

/// File-backed [`CollectionService`] for the configured data path and id strategy.
pub async fn collection_service(cfg: &StorageConfig) -> Result<Arc<CollectionService>, ServiceError> {
    let store = JsonFileStore::new(&cfg.data_path).await?;
    let ids = ids::from_strategy(cfg.id_strategy);
    info!(path = %store.path().display(), id_strategy = ?cfg.id_strategy, "document store ready");
    Ok(Arc::new(CollectionService::new(store, ids)))
}
