//! Storage abstractions for service layer
//!
//! The service never touches the filesystem directly: everything goes through
//! [`DocumentStore`], which loads and persists the whole [`Document`] at once.

use async_trait::async_trait;

use crate::{document::Document, errors::ServiceError};

pub mod json_file_store;
pub mod memory_store;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;

/// Load/persist capability for the single persisted document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the current document. A missing store yields an empty document.
    async fn load(&self) -> Result<Document, ServiceError>;

    /// Replace the stored document. Readers never observe a partial write.
    async fn persist(&self, document: &Document) -> Result<(), ServiceError>;
}
