//! Silent-first token acquisition against an external identity library.

pub mod account;
pub mod context;
pub mod error;
pub mod request;
pub mod status;
pub mod supplier;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::AccountInfo;
pub use context::{EffectDependencies, IdentityClient, IdentityContext, IdentityProvider, InstanceId};
pub use error::{AuthError, InteractionRequiredCode};
pub use request::{Scopes, TokenRequest};
pub use status::InteractionStatus;
pub use supplier::{AcquireOutcome, SkipReason, TokenSupplier};
pub use token::TokenResponse;
