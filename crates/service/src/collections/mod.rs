//! Collection operations over the persisted document.

pub mod service;

pub use service::CollectionService;
