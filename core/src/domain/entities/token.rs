//! Token info: the caller-facing view of an issued OAuth2 grant.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Code/access/refresh material for one grant, as produced by the
/// authorization server.
///
/// The zero value (`TokenInfo::default()`) is not a storable token; see
/// [`TokenInfo::is_zero`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenInfo {
    pub client_id: String,
    pub user_id: String,
    pub redirect_uri: String,
    pub scope: String,

    pub code: String,
    pub code_challenge: String,
    pub code_challenge_method: String,
    pub code_create_at: Option<DateTime<Utc>>,
    pub code_expires_in: Duration,

    pub access: String,
    pub access_create_at: Option<DateTime<Utc>>,
    pub access_expires_in: Duration,

    pub refresh: String,
    pub refresh_create_at: Option<DateTime<Utc>>,
    pub refresh_expires_in: Duration,
}

impl TokenInfo {
    /// Start a token for the given client and user
    pub fn new(client_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Attach authorization-code material
    pub fn with_code(
        mut self,
        code: impl Into<String>,
        create_at: DateTime<Utc>,
        expires_in: Duration,
    ) -> Self {
        self.code = code.into();
        self.code_create_at = Some(create_at);
        self.code_expires_in = expires_in;
        self
    }

    /// Attach a PKCE challenge and its method (`plain` or `S256`)
    pub fn with_code_challenge(
        mut self,
        challenge: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        self.code_challenge = challenge.into();
        self.code_challenge_method = method.into();
        self
    }

    /// Attach access-token material
    pub fn with_access(
        mut self,
        access: impl Into<String>,
        create_at: DateTime<Utc>,
        expires_in: Duration,
    ) -> Self {
        self.access = access.into();
        self.access_create_at = Some(create_at);
        self.access_expires_in = expires_in;
        self
    }

    /// Attach refresh-token material
    pub fn with_refresh(
        mut self,
        refresh: impl Into<String>,
        create_at: DateTime<Utc>,
        expires_in: Duration,
    ) -> Self {
        self.refresh = refresh.into();
        self.refresh_create_at = Some(create_at);
        self.refresh_expires_in = expires_in;
        self
    }

    /// True when every field equals its zero value.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
