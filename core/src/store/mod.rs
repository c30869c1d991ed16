//! Document store access
//!
//! - `document` - the backing store seam ([`DocumentStore`])
//! - `collection` - the serialized, timeout-bounded store adapter
//! - `memory` - an in-process backing store

pub mod collection;
pub mod document;
pub mod memory;


pub use collection::{DocumentCollection, DEFAULT_TIMEOUT};
pub use document::{Document, DocumentStore};
pub use memory::{MemoryDocumentStore, MemoryStoreError};
