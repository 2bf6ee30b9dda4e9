// Repository interfaces (ports)
// Implemented by adapters in the infrastructure layer

pub mod document_store;

pub use document_store::{Document, DocumentStore, Fields, StoreError};
