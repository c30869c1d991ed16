pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod repository;

pub use r#trait::TokenStore;
pub use repository::DocumentTokenStore;

#[cfg(test)]
mod tests;
