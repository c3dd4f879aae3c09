//! Explicitly passed identity context.
//!
//! The identity library's instance and its in-progress status are handed to
//! the supplier as values rather than read from ambient state, so an attempt
//! is fully determined by its inputs.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use super::account::AccountInfo;
use super::error::AuthError;
use super::request::TokenRequest;
use super::status::InteractionStatus;
use super::token::TokenResponse;

/// Identity of an identity-library instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The external identity library instance.
///
/// Implementations own the token cache, the refresh protocol and the popup
/// flow; the supplier only orchestrates these two calls.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Stable for the lifetime of the instance.
    fn instance_id(&self) -> InstanceId;

    /// Currently selected signed-in account, if any.
    fn active_account(&self) -> Option<AccountInfo>;

    /// Obtain a token from the cache or refresh token, without user interaction.
    ///
    /// Must fail with [`AuthError::InteractionRequired`] when the request
    /// cannot be satisfied non-interactively.
    async fn acquire_token_silent(&self, request: &TokenRequest)
        -> Result<TokenResponse, AuthError>;

    /// Obtain a token through a visible user prompt.
    async fn acquire_token_popup(&self, request: &TokenRequest)
        -> Result<TokenResponse, AuthError>;
}

/// Snapshot handed to the supplier: library instance plus its progress state.
#[derive(Clone)]
pub struct IdentityContext {
    pub instance: Arc<dyn IdentityClient>,
    pub in_progress: InteractionStatus,
}

impl fmt::Debug for IdentityContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityContext")
            .field("instance", &self.instance.instance_id())
            .field("in_progress", &self.in_progress)
            .finish()
    }
}

impl IdentityContext {
    pub fn new(instance: Arc<dyn IdentityClient>, in_progress: InteractionStatus) -> Self {
        Self {
            instance,
            in_progress,
        }
    }

    pub fn active_account(&self) -> Option<AccountInfo> {
        self.instance.active_account()
    }

    /// Values whose change re-runs the supplier.
    ///
    /// The scope list is not among them.
    pub fn dependencies(&self) -> EffectDependencies {
        EffectDependencies {
            account: self
                .active_account()
                .map(|account| account.key().to_string()),
            in_progress: self.in_progress,
            instance: self.instance.instance_id(),
        }
    }
}

/// Re-run key derived from an [`IdentityContext`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EffectDependencies {
    pub account: Option<String>,
    pub in_progress: InteractionStatus,
    pub instance: InstanceId,
}

/// Owner of the current identity context.
///
/// Publishes every change on a watch channel; suppliers subscribe and decide
/// for themselves whether the change is one they react to.
pub struct IdentityProvider {
    tx: watch::Sender<IdentityContext>,
}

impl IdentityProvider {
    pub fn new(instance: Arc<dyn IdentityClient>) -> Self {
        let (tx, _rx) = watch::channel(IdentityContext::new(instance, InteractionStatus::None));
        Self { tx }
    }

    pub fn current(&self) -> IdentityContext {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<IdentityContext> {
        self.tx.subscribe()
    }

    pub fn set_in_progress(&self, status: InteractionStatus) {
        self.tx.send_modify(|ctx| ctx.in_progress = status);
    }

    pub fn set_instance(&self, instance: Arc<dyn IdentityClient>) {
        self.tx.send_modify(|ctx| ctx.instance = instance);
    }

    /// Signal that state inside the instance changed (e.g. active account).
    pub fn notify(&self) {
        self.tx.send_modify(|_| {});
    }
}

impl fmt::Debug for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityProvider")
            .field("current", &*self.tx.borrow())
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}
