use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::account::AccountInfo;
use super::context::{IdentityClient, InstanceId};
use super::error::AuthError;
use super::request::TokenRequest;
use super::token::TokenResponse;

type Scripted = Result<TokenResponse, AuthError>;

pub(crate) fn account(name: &str) -> AccountInfo {
    AccountInfo {
        home_account_id: format!("{name}-oid.tenant"),
        environment: "login.example.com".to_string(),
        tenant_id: "tenant".to_string(),
        username: format!("{name}@example.com"),
        local_account_id: format!("{name}-oid"),
        name: None,
    }
}

/// Strict client: every call must have a queued result.
pub(crate) struct ScriptedClient {
    id: InstanceId,
    account: Option<AccountInfo>,
    silent: Mutex<VecDeque<Scripted>>,
    popup: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(&'static str, TokenRequest)>>,
}

impl ScriptedClient {
    pub(crate) fn signed_in(account: AccountInfo) -> Self {
        Self {
            id: InstanceId::new(),
            account: Some(account),
            silent: Mutex::default(),
            popup: Mutex::default(),
            calls: Mutex::default(),
        }
    }

    pub(crate) fn signed_out() -> Self {
        Self {
            account: None,
            ..Self::signed_in(account("nobody"))
        }
    }

    pub(crate) fn push_silent(&self, result: Scripted) {
        self.silent.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_popup(&self, result: Scripted) {
        self.popup.lock().unwrap().push_back(result);
    }

    pub(crate) fn silent_calls(&self) -> usize {
        self.requests("silent").len()
    }

    pub(crate) fn popup_calls(&self) -> usize {
        self.requests("popup").len()
    }

    pub(crate) fn silent_request(&self, index: usize) -> TokenRequest {
        self.requests("silent").swap_remove(index)
    }

    pub(crate) fn popup_request(&self, index: usize) -> TokenRequest {
        self.requests("popup").swap_remove(index)
    }

    fn requests(&self, kind: &str) -> Vec<TokenRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, request)| request.clone())
            .collect()
    }

    fn record(
        &self,
        kind: &'static str,
        request: &TokenRequest,
        queue: &Mutex<VecDeque<Scripted>>,
    ) -> Scripted {
        self.calls.lock().unwrap().push((kind, request.clone()));
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted {kind} call"))
    }
}

#[async_trait]
impl IdentityClient for ScriptedClient {
    fn instance_id(&self) -> InstanceId {
        self.id
    }

    fn active_account(&self) -> Option<AccountInfo> {
        self.account.clone()
    }

    async fn acquire_token_silent(&self, request: &TokenRequest) -> Scripted {
        self.record("silent", request, &self.silent)
    }

    async fn acquire_token_popup(&self, request: &TokenRequest) -> Scripted {
        self.record("popup", request, &self.popup)
    }
}
