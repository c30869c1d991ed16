//! Database module - MongoDB implementation of the document store
//!
//! - Client construction and health checks
//! - `DocumentStore` implementation with transactional removal

pub mod connection;
pub mod mongo;

// Re-export commonly used types
pub use connection::{connect, token_store};
pub use mongo::MongoDocumentStore;
