use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AccountInfo;
use super::error::AuthError;

/// Result of a successful acquisition, held by the supplier once set.
///
/// # Example
/// ```
/// use token_supplier::auth::TokenResponse;
///
/// let response = TokenResponse::from_json(r#"{"accessToken":"abc","scopes":["User.Read"]}"#)?;
/// assert_eq!(response.access_token, "abc");
/// assert_eq!(response.token_type, "Bearer");
/// # Ok::<(), token_supplier::auth::AuthError>(())
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub from_cache: bool,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenResponse {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            id_token: None,
            token_type: default_token_type(),
            scopes: Vec::new(),
            account: None,
            expires_on: None,
            from_cache: false,
        }
    }

    /// Parse a result payload as emitted by the identity library.
    pub fn from_json(raw: &str) -> Result<Self, AuthError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Absent expiry counts as not expired.
    pub fn is_expired(&self) -> bool {
        self.expires_on.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"..")
            .field("id_token", &self.id_token.as_ref().map(|_| ".."))
            .field("token_type", &self.token_type)
            .field("scopes", &self.scopes)
            .field("account", &self.account.as_ref().map(AccountInfo::key))
            .field("expires_on", &self.expires_on)
            .field("from_cache", &self.from_cache)
            .finish()
    }
}
