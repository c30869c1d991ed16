pub mod token;

pub use token::{DocumentTokenStore, TokenStore};
