//! # GrantStore Core
//!
//! Persistence of OAuth2 grants (authorization codes, access tokens and
//! refresh tokens) in a document store.
//!
//! - [`domain`] - token info and the persisted record shape
//! - [`store`] - the document store seam and the serialized, timeout-bounded
//!   collection adapter
//! - [`repositories`] - the [`TokenStore`] contract and its document-backed
//!   implementation
//! - [`context`] - cancellation and deadline scope for every operation
//! - [`errors`] - error taxonomy

pub mod context;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod store;

// Re-export commonly used types for convenience
pub use context::OpContext;
pub use domain::entities::{TokenInfo, TokenKey, TokenRecord};
pub use errors::{StoreError, StoreResult};
pub use repositories::{DocumentTokenStore, TokenStore};
pub use store::{DocumentCollection, DocumentStore, MemoryDocumentStore};
