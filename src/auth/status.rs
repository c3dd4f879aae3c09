use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What the identity library is currently doing.
///
/// Text forms match the library's own status strings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum InteractionStatus {
    #[default]
    None,
    Startup,
    Login,
    Logout,
    AcquireToken,
    SsoSilent,
    HandleRedirect,
}

impl InteractionStatus {
    /// No other auth operation is mid-flight.
    pub fn is_idle(self) -> bool {
        self == Self::None
    }
}
