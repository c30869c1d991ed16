//! Error types for token persistence.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error produced by a backing document store.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors surfaced by the store adapter and the token repository
#[derive(Error, Debug)]
pub enum StoreError {
    /// Token info was absent or every field held its zero value
    #[error("invalid token info")]
    InvalidTokenInfo,

    /// No document matched the queried key/value
    #[error("token not found")]
    NotFound,

    /// The operation or caller deadline elapsed before the store answered
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,

    /// A document could not be decoded into a record
    #[error("failed to decode document: {0}")]
    Decode(#[source] serde_json::Error),

    /// A record could not be encoded into a document
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),

    /// Error reported by the backing store, passed through as-is
    #[error(transparent)]
    Backend(BoxError),
}

impl StoreError {
    /// Wrap a backing store error without altering it
    pub fn backend<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }

    /// Whether this error came from the deadline or cancellation machinery
    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::DeadlineExceeded | StoreError::Cancelled)
    }

    /// Borrow the backing store error, if this is one
    pub fn as_backend(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            StoreError::Backend(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
