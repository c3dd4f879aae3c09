//! Error types for token-supplier.

use thiserror::Error;

use crate::auth::AuthError;

/// Primary error type for crate operations outside the acquisition path.
///
/// Acquisition failures never reach the consumer as an `Error`; they resolve
/// to an absent token response. This type covers configuration loading and
/// callers lifting an [`AuthError`] into a crate result.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, Error>;
