//! Domain entities representing stored grants.

pub mod record;
pub mod token;


// Re-export commonly used types
pub use record::{TokenKey, TokenRecord, KEY_ACCESS, KEY_CODE, KEY_REFRESH};
pub use token::TokenInfo;
