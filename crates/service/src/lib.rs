//! Service layer for the request/history document store.
//! - `document` defines the persisted shape.
//! - `storage` hides where the document lives behind `DocumentStore`.
//! - `collections` implements the CRUD operations over it.

pub mod errors;
pub mod document;
pub mod ids;
pub mod storage;
pub mod collections;
pub mod runtime;

pub use collections::CollectionService;
pub use document::{Collection, Document, Item};
