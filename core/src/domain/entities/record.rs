//! Persisted token record and the lookup keys it can be queried by.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenInfo;
use crate::errors::{StoreError, StoreResult};

/// Document field holding the authorization code
pub const KEY_CODE: &str = "Code";
/// Document field holding the access token
pub const KEY_ACCESS: &str = "Access";
/// Document field holding the refresh token
pub const KEY_REFRESH: &str = "Refresh";

/// The three fields a token can be looked up or removed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    Code,
    Access,
    Refresh,
}

impl TokenKey {
    /// Name of the document field this key queries
    pub const fn field(self) -> &'static str {
        match self {
            TokenKey::Code => KEY_CODE,
            TokenKey::Access => KEY_ACCESS,
            TokenKey::Refresh => KEY_REFRESH,
        }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// One stored grant. Field names are the persisted document keys.
///
/// The document's store-assigned id is intentionally absent: it is owned by
/// the backing store and never derived from the token values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(rename = "ClientID", default)]
    pub client_id: String,
    #[serde(rename = "UserID", default)]
    pub user_id: String,
    #[serde(rename = "RedirectURI", default)]
    pub redirect_uri: String,
    #[serde(rename = "Scope", default)]
    pub scope: String,

    #[serde(rename = "Code", default)]
    pub code: String,
    #[serde(rename = "CodeChallenge", default)]
    pub code_challenge: String,
    #[serde(rename = "CodeChallengeMethod", default)]
    pub code_challenge_method: String,
    #[serde(rename = "CodeCreateAt", default)]
    pub code_create_at: Option<DateTime<Utc>>,
    #[serde(rename = "CodeExpiresIn", default, with = "duration_nanos")]
    pub code_expires_in: Duration,

    #[serde(rename = "Access", default)]
    pub access: String,
    #[serde(rename = "AccessCreateAt", default)]
    pub access_create_at: Option<DateTime<Utc>>,
    #[serde(rename = "AccessExpiresIn", default, with = "duration_nanos")]
    pub access_expires_in: Duration,

    #[serde(rename = "Refresh", default)]
    pub refresh: String,
    #[serde(rename = "RefreshCreateAt", default)]
    pub refresh_create_at: Option<DateTime<Utc>>,
    #[serde(rename = "RefreshExpiresIn", default, with = "duration_nanos")]
    pub refresh_expires_in: Duration,
}

impl TokenRecord {
    /// Fields holding issue timestamps, serialized as RFC 3339 strings
    pub const TIMESTAMP_FIELDS: [&'static str; 3] =
        ["CodeCreateAt", "AccessCreateAt", "RefreshCreateAt"];

    /// Validate `info` and copy it into a storable record.
    ///
    /// Fails with [`StoreError::InvalidTokenInfo`] when `info` is absent or
    /// zero-valued.
    pub fn try_from_info(info: Option<&TokenInfo>) -> StoreResult<Self> {
        match info {
            Some(info) if !info.is_zero() => Ok(Self::copy_from(info)),
            _ => Err(StoreError::InvalidTokenInfo),
        }
    }

    fn copy_from(info: &TokenInfo) -> Self {
        Self {
            client_id: info.client_id.clone(),
            user_id: info.user_id.clone(),
            redirect_uri: info.redirect_uri.clone(),
            scope: info.scope.clone(),
            code: info.code.clone(),
            code_challenge: info.code_challenge.clone(),
            code_challenge_method: info.code_challenge_method.clone(),
            code_create_at: info.code_create_at,
            code_expires_in: info.code_expires_in,
            access: info.access.clone(),
            access_create_at: info.access_create_at,
            access_expires_in: info.access_expires_in,
            refresh: info.refresh.clone(),
            refresh_create_at: info.refresh_create_at,
            refresh_expires_in: info.refresh_expires_in,
        }
    }
}

impl TryFrom<&TokenInfo> for TokenRecord {
    type Error = StoreError;

    fn try_from(info: &TokenInfo) -> StoreResult<Self> {
        Self::try_from_info(Some(info))
    }
}

impl From<TokenRecord> for TokenInfo {
    fn from(record: TokenRecord) -> Self {
        Self {
            client_id: record.client_id,
            user_id: record.user_id,
            redirect_uri: record.redirect_uri,
            scope: record.scope,
            code: record.code,
            code_challenge: record.code_challenge,
            code_challenge_method: record.code_challenge_method,
            code_create_at: record.code_create_at,
            code_expires_in: record.code_expires_in,
            access: record.access,
            access_create_at: record.access_create_at,
            access_expires_in: record.access_expires_in,
            refresh: record.refresh,
            refresh_create_at: record.refresh_create_at,
            refresh_expires_in: record.refresh_expires_in,
        }
    }
}

/// Durations are stored as signed 64-bit nanosecond counts.
mod duration_nanos {
    use std::time::Duration;

    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = i64::try_from(value.as_nanos())
            .map_err(|_| S::Error::custom("duration does not fit in i64 nanoseconds"))?;
        serializer.serialize_i64(nanos)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = i64::deserialize(deserializer)?;
        u64::try_from(nanos)
            .map(Duration::from_nanos)
            .map_err(|_| D::Error::custom(format!("negative duration: {nanos}ns")))
    }
}
