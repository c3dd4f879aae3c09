use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Library error codes that mean silent acquisition cannot succeed
/// without the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InteractionRequiredCode {
    InteractionRequired,
    ConsentRequired,
    LoginRequired,
    BadToken,
    NoTokensFound,
}

/// Acquisition errors as classified by the identity library.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Interaction required ({code}): {message}")]
    InteractionRequired {
        code: InteractionRequiredCode,
        message: String,
    },
    #[error("User cancelled the interactive flow")]
    UserCancelled,
    #[error("Popup window could not be opened")]
    PopupBlocked,
    #[error("No active account")]
    NoActiveAccount,
    #[error("Timeout after {0}ms")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Client error ({code}): {message}")]
    Client { code: String, message: String },
    #[error("Server error ({code}): {message}")]
    Server { code: String, message: String },
}

impl AuthError {
    pub fn interaction_required(code: InteractionRequiredCode, message: impl Into<String>) -> Self {
        Self::InteractionRequired {
            code,
            message: message.into(),
        }
    }

    /// Map a raw library error code onto the taxonomy.
    ///
    /// Unknown codes become [`AuthError::Client`] so they are never mistaken
    /// for the recoverable interaction-required kind.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        if let Ok(code) = code.parse::<InteractionRequiredCode>() {
            return Self::InteractionRequired { code, message };
        }
        match code {
            "user_cancelled" => Self::UserCancelled,
            "popup_window_error" | "empty_window_error" => Self::PopupBlocked,
            "no_account_error" => Self::NoActiveAccount,
            other => Self::Client {
                code: other.to_string(),
                message,
            },
        }
    }

    /// The only classification the supplier branches on.
    pub fn is_interaction_required(&self) -> bool {
        matches!(self, Self::InteractionRequired { .. })
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Client {
            code: "invalid_response".to_string(),
            message: error.to_string(),
        }
    }
}
