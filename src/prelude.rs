//! Convenience re-exports for common use.

pub use crate::auth::{
    AccountInfo, AcquireOutcome, AuthError, IdentityClient, IdentityContext, IdentityProvider,
    InteractionStatus, Scopes, TokenRequest, TokenResponse, TokenSupplier,
};
pub use crate::config::SupplierConfig;
pub use crate::error::{Error, Result};
