//! Silent-first token acquisition bound to a consumer's lifecycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::account::AccountInfo;
use super::context::IdentityContext;
use super::error::AuthError;
use super::request::{Scopes, TokenRequest};
use super::status::InteractionStatus;
use super::token::TokenResponse;
use crate::config::SupplierConfig;
use crate::util::timeout::with_timeout;

/// Why an attempt made no acquisition call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoActiveAccount,
    InteractionInProgress(InteractionStatus),
    ResponseHeld,
    Unmounted,
}

/// What a single attempt did.
///
/// Informational only: the consumer-facing view never carries an error.
#[derive(Debug, Clone)]
pub enum AcquireOutcome {
    Skipped(SkipReason),
    /// Stored a response from silent acquisition.
    Silent,
    /// Stored a response from interactive acquisition.
    Interactive,
    /// Silent acquisition failed with a non-interaction error. Nothing logged.
    SilentFailed(AuthError),
    /// Interactive fallback failed. Logged once.
    InteractiveFailed(AuthError),
    /// A newer attempt or an unmount made this result stale; discarded.
    Superseded,
}

impl AcquireOutcome {
    pub fn stored(&self) -> bool {
        matches!(self, Self::Silent | Self::Interactive)
    }
}

/// Holds at most one token response for a fixed scope list.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use token_supplier::auth::{IdentityClient, IdentityProvider, TokenSupplier};
///
/// # async fn example(client: Arc<dyn IdentityClient>) {
/// let provider = IdentityProvider::new(client);
/// let supplier = Arc::new(TokenSupplier::new(["User.Read"]));
/// tokio::spawn(supplier.clone().run(provider.subscribe()));
///
/// let mut responses = supplier.subscribe();
/// let _ = responses.wait_for(Option::is_some).await;
/// # }
/// ```
#[derive(Debug)]
pub struct TokenSupplier {
    scopes: Scopes,
    silent_timeout: Option<Duration>,
    interactive_timeout: Option<Duration>,
    response: watch::Sender<Option<TokenResponse>>,
    generation: AtomicU64,
    unmounted: CancellationToken,
}

impl TokenSupplier {
    pub fn new(scopes: impl Into<Scopes>) -> Self {
        Self::from_config(SupplierConfig::new(scopes))
    }

    pub fn from_config(config: SupplierConfig) -> Self {
        let (response, _rx) = watch::channel(None);
        Self {
            silent_timeout: config.silent_timeout(),
            interactive_timeout: config.interactive_timeout(),
            scopes: config.scopes,
            response,
            generation: AtomicU64::new(0),
            unmounted: CancellationToken::new(),
        }
    }

    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    /// Most recently stored response, or `None` before acquisition completes.
    pub fn response(&self) -> Option<TokenResponse> {
        self.response.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TokenResponse>> {
        self.response.subscribe()
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted.is_cancelled()
    }

    /// Make every attempt started before this call stale.
    pub fn supersede(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Stop the driver, discard in-flight results and drop the held response.
    pub fn unmount(&self) {
        self.unmounted.cancel();
        self.supersede();
        self.response.send_replace(None);
        tracing::debug!(scopes = %self.scopes, "token supplier unmounted");
    }

    /// Run one acquisition attempt against `ctx`.
    ///
    /// Silent acquisition first; interactive only when the silent call fails
    /// with an interaction-required error.
    pub async fn acquire(&self, ctx: &IdentityContext) -> AcquireOutcome {
        let generation = self.generation.load(Ordering::SeqCst);
        self.acquire_at(ctx, generation).await
    }

    /// Spawn a single attempt without awaiting it.
    ///
    /// The attempt belongs to the generation current at this call, not at
    /// the time the task is first polled.
    pub fn trigger(self: &Arc<Self>, ctx: IdentityContext) -> JoinHandle<AcquireOutcome> {
        let generation = self.generation.load(Ordering::SeqCst);
        let this = Arc::clone(self);
        tokio::spawn(async move { this.acquire_at(&ctx, generation).await })
    }

    async fn acquire_at(&self, ctx: &IdentityContext, generation: u64) -> AcquireOutcome {
        let account = match self.check_preconditions(ctx) {
            Ok(account) => account,
            Err(reason) => {
                tracing::debug!(scopes = %self.scopes, ?reason, "token acquisition skipped");
                return AcquireOutcome::Skipped(reason);
            }
        };
        if !self.is_current(generation) {
            tracing::debug!(scopes = %self.scopes, generation, "attempt superseded before start");
            return AcquireOutcome::Superseded;
        }

        let request = TokenRequest::builder()
            .scopes(self.scopes.clone())
            .account(account)
            .build();
        tracing::debug!(
            scopes = %self.scopes,
            account = request.account.key(),
            generation,
            "acquiring token silently"
        );

        let silent = with_timeout(
            self.silent_timeout,
            ctx.instance.acquire_token_silent(&request),
        )
        .await;

        match silent {
            Ok(response) => self.store(generation, response, AcquireOutcome::Silent),
            Err(err) if err.is_interaction_required() => {
                if !self.is_current(generation) {
                    return AcquireOutcome::Superseded;
                }
                tracing::debug!(
                    scopes = %self.scopes,
                    account = request.account.key(),
                    error = %err,
                    "falling back to interactive token acquisition"
                );
                let interactive = with_timeout(
                    self.interactive_timeout,
                    ctx.instance.acquire_token_popup(&request),
                )
                .await;
                match interactive {
                    Ok(response) => self.store(generation, response, AcquireOutcome::Interactive),
                    Err(err) => {
                        if !self.is_current(generation) {
                            return AcquireOutcome::Superseded;
                        }
                        tracing::error!(
                            scopes = %self.scopes,
                            account = request.account.key(),
                            error = %err,
                            "interactive token acquisition failed"
                        );
                        AcquireOutcome::InteractiveFailed(err)
                    }
                }
            }
            Err(err) => AcquireOutcome::SilentFailed(err),
        }
    }

    /// Drive attempts from a stream of identity contexts.
    ///
    /// One attempt for the current context, then one per change of
    /// [`super::EffectDependencies`]. Returns when the provider goes away or
    /// the supplier is unmounted. When the provider goes away the last
    /// attempt is awaited before returning.
    pub async fn run(self: Arc<Self>, mut contexts: watch::Receiver<IdentityContext>) {
        let ctx = contexts.borrow_and_update().clone();
        let mut deps = ctx.dependencies();
        let mut last = self.trigger(ctx);

        loop {
            tokio::select! {
                _ = self.unmounted.cancelled() => return,
                changed = contexts.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let ctx = contexts.borrow_and_update().clone();
                    let next = ctx.dependencies();
                    if next == deps {
                        continue;
                    }
                    // A progress toggle alone leaves the request valid; a new
                    // account or instance does not.
                    if next.account != deps.account || next.instance != deps.instance {
                        self.supersede();
                    }
                    deps = next;
                    last = self.trigger(ctx);
                }
            }
        }

        if let Err(err) = last.await {
            tracing::warn!(error = %err, "token acquisition task failed");
        }
    }

    fn check_preconditions(&self, ctx: &IdentityContext) -> Result<AccountInfo, SkipReason> {
        if self.is_unmounted() {
            return Err(SkipReason::Unmounted);
        }
        let account = ctx.active_account().ok_or(SkipReason::NoActiveAccount)?;
        if !ctx.in_progress.is_idle() {
            return Err(SkipReason::InteractionInProgress(ctx.in_progress));
        }
        if self.response.borrow().is_some() {
            return Err(SkipReason::ResponseHeld);
        }
        Ok(account)
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.is_unmounted() && self.generation.load(Ordering::SeqCst) == generation
    }

    fn store(
        &self,
        generation: u64,
        response: TokenResponse,
        outcome: AcquireOutcome,
    ) -> AcquireOutcome {
        let mut pending = Some(response);
        let stored = self.response.send_if_modified(|slot| {
            if slot.is_some() || !self.is_current(generation) {
                return false;
            }
            *slot = pending.take();
            true
        });
        if stored {
            tracing::debug!(scopes = %self.scopes, ?outcome, "token response stored");
            outcome
        } else {
            tracing::debug!(scopes = %self.scopes, generation, "discarding stale token response");
            AcquireOutcome::Superseded
        }
    }
}
