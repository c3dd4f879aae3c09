#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{watch, Notify};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use token_supplier::auth::{
    AccountInfo, AuthError, IdentityClient, InstanceId, InteractionRequiredCode, TokenRequest,
    TokenResponse,
};

type Scripted = Result<TokenResponse, AuthError>;

pub fn account(name: &str) -> AccountInfo {
    AccountInfo {
        home_account_id: format!("{name}-oid.tenant"),
        environment: "login.example.com".to_string(),
        tenant_id: "tenant".to_string(),
        username: format!("{name}@example.com"),
        local_account_id: format!("{name}-oid"),
        name: Some(name.to_string()),
    }
}

pub fn interaction_required() -> AuthError {
    AuthError::interaction_required(InteractionRequiredCode::InteractionRequired, "refresh expired")
}

/// In-memory identity library that replays queued results.
#[derive(Default)]
pub struct FakeIdentityClient {
    id: InstanceId,
    account: Mutex<Option<AccountInfo>>,
    silent: Mutex<VecDeque<Scripted>>,
    popup: Mutex<VecDeque<Scripted>>,
    silent_requests: Mutex<Vec<TokenRequest>>,
    popup_requests: Mutex<Vec<TokenRequest>>,
    silent_gate: Mutex<Option<Arc<Notify>>>,
    popup_gate: Mutex<Option<Arc<Notify>>>,
    echo: bool,
    calls: CallCounter,
}

struct CallCounter {
    silent: watch::Sender<usize>,
    popup: watch::Sender<usize>,
}

impl Default for CallCounter {
    fn default() -> Self {
        Self {
            silent: watch::channel(0).0,
            popup: watch::channel(0).0,
        }
    }
}

impl FakeIdentityClient {
    pub fn signed_in(name: &str) -> Arc<Self> {
        let client = Self::default();
        *client.account.lock().expect("account lock") = Some(account(name));
        Arc::new(client)
    }

    /// Unscripted silent calls succeed with a token naming the request's account.
    pub fn echoing(name: &str) -> Arc<Self> {
        let client = Self {
            echo: true,
            ..Self::default()
        };
        client.set_account(Some(account(name)));
        Arc::new(client)
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_account(&self, account: Option<AccountInfo>) {
        *self.account.lock().expect("account lock") = account;
    }

    pub fn push_silent(&self, result: Scripted) {
        self.silent.lock().expect("silent lock").push_back(result);
    }

    pub fn push_popup(&self, result: Scripted) {
        self.popup.lock().expect("popup lock").push_back(result);
    }

    pub fn gate_silent(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.silent_gate.lock().expect("gate lock") = Some(gate.clone());
        gate
    }

    /// Hold popup calls until the returned gate is notified.
    pub fn gate_popup(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.popup_gate.lock().expect("gate lock") = Some(gate.clone());
        gate
    }

    pub fn silent_requests(&self) -> Vec<TokenRequest> {
        self.silent_requests.lock().expect("requests lock").clone()
    }

    pub fn popup_requests(&self) -> Vec<TokenRequest> {
        self.popup_requests.lock().expect("requests lock").clone()
    }

    pub async fn wait_for_silent_calls(&self, count: usize) {
        let mut seen = self.calls.silent.subscribe();
        let _ = seen.wait_for(|n| *n >= count).await;
    }

    pub async fn wait_for_popup_calls(&self, count: usize) {
        let mut seen = self.calls.popup.subscribe();
        let _ = seen.wait_for(|n| *n >= count).await;
    }
}

fn unscripted() -> Scripted {
    Err(AuthError::Client {
        code: "unscripted".to_string(),
        message: "no scripted result".to_string(),
    })
}

pub fn echo_token(request: &TokenRequest) -> TokenResponse {
    let mut response = TokenResponse::new(format!("token-for-{}", request.account.username));
    response.scopes = request.scopes.as_slice().to_vec();
    response.account = Some(request.account.clone());
    response
}

#[async_trait]
impl IdentityClient for FakeIdentityClient {
    fn instance_id(&self) -> InstanceId {
        self.id
    }

    fn active_account(&self) -> Option<AccountInfo> {
        self.account.lock().expect("account lock").clone()
    }

    async fn acquire_token_silent(&self, request: &TokenRequest) -> Scripted {
        self.silent_requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.calls.silent.send_modify(|n| *n += 1);
        let gate = self.silent_gate.lock().expect("gate lock").clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let scripted = self.silent.lock().expect("silent lock").pop_front();
        match scripted {
            Some(result) => result,
            None if self.echo => Ok(echo_token(request)),
            None => unscripted(),
        }
    }

    async fn acquire_token_popup(&self, request: &TokenRequest) -> Scripted {
        self.popup_requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.calls.popup.send_modify(|n| *n += 1);
        let gate = self.popup_gate.lock().expect("gate lock").clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.popup
            .lock()
            .expect("popup lock")
            .pop_front()
            .unwrap_or_else(unscripted)
    }
}

/// Records the message of every ERROR-level event.
#[derive(Clone, Default)]
pub struct ErrorEvents(Arc<Mutex<Vec<String>>>);

impl ErrorEvents {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().expect("events lock").clone()
    }
}

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for ErrorEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::ERROR {
            return;
        }
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        self.0
            .lock()
            .expect("events lock")
            .push(visitor.0.unwrap_or_default());
    }
}
