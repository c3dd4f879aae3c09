use serde::{Deserialize, Serialize};

/// Signed-in identity as reported by the identity library.
///
/// The supplier treats this as opaque; only [`AccountInfo::key`] is used to
/// detect that the active account changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub home_account_id: String,
    pub environment: String,
    pub tenant_id: String,
    pub username: String,
    pub local_account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AccountInfo {
    pub fn key(&self) -> &str {
        &self.home_account_id
    }
}
