// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory_document_store;
pub mod postgres_document_store;

pub use in_memory_document_store::InMemoryDocumentStore;
pub use postgres_document_store::PostgresDocumentStore;
