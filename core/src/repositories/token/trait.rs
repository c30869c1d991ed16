//! Token store trait defining the contract an authorization server relies on.

use async_trait::async_trait;

use crate::context::OpContext;
use crate::domain::entities::token::TokenInfo;
use crate::errors::StoreResult;

/// Persistence contract for issued OAuth2 grants
///
/// A grant is created once and later looked up or removed by any of its three
/// identifying values: authorization code, access token or refresh token.
/// Implementations store whatever they are given; expiry and uniqueness of the
/// identifying values are the caller's concern.
///
/// Every method takes the caller's [`OpContext`] first and fails with
/// `DeadlineExceeded` or `Cancelled` when that context ends before the
/// backing store answers.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a new grant
    ///
    /// # Arguments
    /// * `ctx` - Cancellation and deadline scope
    /// * `info` - Grant to store
    ///
    /// # Returns
    /// * `Ok(())` - Exactly one new document was created
    /// * `Err(StoreError::InvalidTokenInfo)` - `info` is zero-valued; nothing was written
    /// * `Err(StoreError)` - The backing store failed
    ///
    /// # Example
    /// ```no_run
    /// # use std::time::Duration;
    /// # use chrono::Utc;
    /// # use gs_core::{OpContext, TokenInfo, TokenStore};
    /// # async fn example(store: &impl TokenStore) -> Result<(), gs_core::StoreError> {
    /// let info = TokenInfo::new("client-1", "user-1")
    ///     .with_scope("openid")
    ///     .with_code("abc123", Utc::now(), Duration::from_secs(300));
    ///
    /// store.create(&OpContext::background(), &info).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn create(&self, ctx: &OpContext, info: &TokenInfo) -> StoreResult<()>;

    /// Find a grant by its authorization code
    ///
    /// # Returns
    /// * `Ok(TokenInfo)` - A grant carrying `code`
    /// * `Err(StoreError::NotFound)` - No grant carries `code`
    /// * `Err(StoreError)` - The backing store failed
    ///
    /// # Example
    /// ```no_run
    /// # use gs_core::{OpContext, StoreError, TokenStore};
    /// # async fn example(store: &impl TokenStore) -> Result<(), StoreError> {
    /// match store.get_by_code(&OpContext::background(), "abc123").await {
    ///     Ok(info) => println!("code issued to {}", info.client_id),
    ///     Err(StoreError::NotFound) => println!("unknown code"),
    ///     Err(e) => return Err(e),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn get_by_code(&self, ctx: &OpContext, code: &str) -> StoreResult<TokenInfo>;

    /// Find a grant by its access token
    ///
    /// # Returns
    /// * `Ok(TokenInfo)` - A grant carrying `access`
    /// * `Err(StoreError::NotFound)` - No grant carries `access`
    /// * `Err(StoreError)` - The backing store failed
    async fn get_by_access(&self, ctx: &OpContext, access: &str) -> StoreResult<TokenInfo>;

    /// Find a grant by its refresh token
    ///
    /// # Returns
    /// * `Ok(TokenInfo)` - A grant carrying `refresh`
    /// * `Err(StoreError::NotFound)` - No grant carries `refresh`
    /// * `Err(StoreError)` - The backing store failed
    async fn get_by_refresh(&self, ctx: &OpContext, refresh: &str) -> StoreResult<TokenInfo>;

    /// Remove the grant carrying authorization code `code`
    ///
    /// The whole grant is removed, including its access and refresh tokens.
    /// Removing an unknown code succeeds.
    ///
    /// # Example
    /// ```no_run
    /// # use gs_core::{OpContext, TokenStore};
    /// # async fn example(store: &impl TokenStore) -> Result<(), gs_core::StoreError> {
    /// let ctx = OpContext::background();
    /// let info = store.get_by_code(&ctx, "abc123").await?;
    /// // Codes are single use
    /// store.remove_by_code(&ctx, &info.code).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn remove_by_code(&self, ctx: &OpContext, code: &str) -> StoreResult<()>;

    /// Remove the grant carrying access token `access`. Unknown values succeed.
    async fn remove_by_access(&self, ctx: &OpContext, access: &str) -> StoreResult<()>;

    /// Remove the grant carrying refresh token `refresh`. Unknown values succeed.
    async fn remove_by_refresh(&self, ctx: &OpContext, refresh: &str) -> StoreResult<()>;
}
