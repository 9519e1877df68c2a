//! Scripted in-memory gateway.
//!
//! Responses are queued per endpoint; when a queue runs dry the endpoint's
//! fallback answers. Calls can be held open with [`FakeGateway::hold`] so tests
//! decide the order responses resolve in.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use cmdgate_api_models::{
    CommandRequest, CommandResponse, CommandStatus, CreateUserRequest, CreateUserResponse,
    ErrorBody, ExecutionRecord, RuleRequest, Session,
};
use cmdgate_console::{Credential, Endpoint, GatewayApi, GatewayError};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Endpoint hit.
    pub endpoint: Endpoint,
    /// Credential presented.
    pub credential: String,
    /// JSON body, for POST endpoints.
    pub body: Option<Value>,
}

struct Script<T> {
    queue: VecDeque<Result<T, GatewayError>>,
    fallback: Result<T, GatewayError>,
}

impl<T: Clone> Script<T> {
    fn new(fallback: Result<T, GatewayError>) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback,
        }
    }

    fn next(&mut self) -> Result<T, GatewayError> {
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

struct Scripts {
    me: Script<Session>,
    my_history: Script<Vec<ExecutionRecord>>,
    commands: Script<CommandResponse>,
    admin_logs: Script<Vec<ExecutionRecord>>,
    admin_rules: Script<()>,
    admin_users: Script<CreateUserResponse>,
}

struct Inner {
    calls: RefCell<Vec<Call>>,
    scripts: RefCell<Scripts>,
    holds: RefCell<HashMap<Endpoint, VecDeque<oneshot::Receiver<()>>>>,
}

/// Gateway double with scripted responses and a call log.
///
/// Clones share the same script and log, so a test can keep a handle after
/// moving one into the controller.
#[derive(Clone)]
pub struct FakeGateway {
    inner: Rc<Inner>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGateway {
    /// Gateway whose `/me` rejects every credential and whose other endpoints
    /// succeed with empty payloads.
    #[must_use]
    pub fn new() -> Self {
        let scripts = Scripts {
            me: Script::new(Err(status(401, None))),
            my_history: Script::new(Ok(Vec::new())),
            commands: Script::new(Ok(CommandResponse {
                status: CommandStatus::Accepted,
                message: "ok".to_string(),
            })),
            admin_logs: Script::new(Ok(Vec::new())),
            admin_rules: Script::new(Ok(())),
            admin_users: Script::new(Ok(CreateUserResponse {
                api_key: "issued-key".to_string(),
            })),
        };
        let inner = Inner {
            calls: RefCell::new(Vec::new()),
            scripts: RefCell::new(scripts),
            holds: RefCell::new(HashMap::new()),
        };
        Self {
            inner: Rc::new(inner),
        }
    }

    /// Gateway that resolves every credential to `session`.
    #[must_use]
    pub fn signed_in_as(session: Session) -> Self {
        let gateway = Self::new();
        gateway.set_me(Ok(session));
        gateway
    }

    /// Replace the `/me` fallback.
    pub fn set_me(&self, response: Result<Session, GatewayError>) {
        self.with_scripts(|scripts| scripts.me.fallback = response);
    }

    /// Queue one `/me` response.
    pub fn push_me(&self, response: Result<Session, GatewayError>) {
        self.with_scripts(|scripts| scripts.me.queue.push_back(response));
    }

    /// Replace the `/my-history` fallback.
    pub fn set_my_history(&self, response: Result<Vec<ExecutionRecord>, GatewayError>) {
        self.with_scripts(|scripts| scripts.my_history.fallback = response);
    }

    /// Queue one `/my-history` response.
    pub fn push_my_history(&self, response: Result<Vec<ExecutionRecord>, GatewayError>) {
        self.with_scripts(|scripts| scripts.my_history.queue.push_back(response));
    }

    /// Queue one `/commands` response.
    pub fn push_command(&self, response: Result<CommandResponse, GatewayError>) {
        self.with_scripts(|scripts| scripts.commands.queue.push_back(response));
    }

    /// Replace the `/admin/logs` fallback.
    pub fn set_admin_logs(&self, response: Result<Vec<ExecutionRecord>, GatewayError>) {
        self.with_scripts(|scripts| scripts.admin_logs.fallback = response);
    }

    /// Queue one `/admin/rules` response.
    pub fn push_rule(&self, response: Result<(), GatewayError>) {
        self.with_scripts(|scripts| scripts.admin_rules.queue.push_back(response));
    }

    /// Queue one `/admin/users` response.
    pub fn push_user(&self, response: Result<CreateUserResponse, GatewayError>) {
        self.with_scripts(|scripts| scripts.admin_users.queue.push_back(response));
    }

    /// Hold the next call to `endpoint` open until the returned sender fires
    /// or is dropped.
    #[must_use]
    pub fn hold(&self, endpoint: Endpoint) -> oneshot::Sender<()> {
        let (release, held) = oneshot::channel();
        self.inner
            .holds
            .borrow_mut()
            .entry(endpoint)
            .or_default()
            .push_back(held);
        release
    }

    /// Every call so far, in issue order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.borrow().clone()
    }

    /// Endpoints hit so far, in issue order.
    #[must_use]
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.inner
            .calls
            .borrow()
            .iter()
            .map(|call| call.endpoint)
            .collect()
    }

    /// Number of calls made to `endpoint`.
    #[must_use]
    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.inner
            .calls
            .borrow()
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .count()
    }

    /// Forget recorded calls, keeping scripts.
    pub fn reset_calls(&self) {
        self.inner.calls.borrow_mut().clear();
    }

    fn with_scripts<R>(&self, apply: impl FnOnce(&mut Scripts) -> R) -> R {
        apply(&mut self.inner.scripts.borrow_mut())
    }

    async fn exchange<T>(
        &self,
        endpoint: Endpoint,
        credential: &Credential,
        body: Option<Value>,
        pick: impl FnOnce(&mut Scripts) -> Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        self.inner.calls.borrow_mut().push(Call {
            endpoint,
            credential: credential.expose().to_string(),
            body,
        });
        let response = self.with_scripts(pick);
        let held = self
            .inner
            .holds
            .borrow_mut()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        if let Some(held) = held {
            let _ = held.await;
        }
        response
    }
}

/// Error shaped like a gateway response with `status`.
#[must_use]
pub fn status(code: u16, error: Option<&str>) -> GatewayError {
    GatewayError::from_status(
        code,
        ErrorBody {
            message: None,
            error: error.map(str::to_string),
        },
    )
}

/// Error carrying a body `message`, as `/commands` sends.
#[must_use]
pub fn status_with_message(code: u16, message: &str) -> GatewayError {
    GatewayError::from_status(
        code,
        ErrorBody {
            message: Some(message.to_string()),
            error: None,
        },
    )
}

fn json<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

impl GatewayApi for FakeGateway {
    async fn me(&self, credential: &Credential) -> Result<Session, GatewayError> {
        self.exchange(Endpoint::Me, credential, None, |s| s.me.next())
            .await
    }

    async fn my_history(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ExecutionRecord>, GatewayError> {
        self.exchange(Endpoint::MyHistory, credential, None, |s| {
            s.my_history.next()
        })
        .await
    }

    async fn submit_command(
        &self,
        credential: &Credential,
        request: &CommandRequest,
    ) -> Result<CommandResponse, GatewayError> {
        self.exchange(Endpoint::Commands, credential, json(request), |s| {
            s.commands.next()
        })
        .await
    }

    async fn admin_logs(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ExecutionRecord>, GatewayError> {
        self.exchange(Endpoint::AdminLogs, credential, None, |s| {
            s.admin_logs.next()
        })
        .await
    }

    async fn create_rule(
        &self,
        credential: &Credential,
        request: &RuleRequest,
    ) -> Result<(), GatewayError> {
        self.exchange(Endpoint::AdminRules, credential, json(request), |s| {
            s.admin_rules.next()
        })
        .await
    }

    async fn create_user(
        &self,
        credential: &Credential,
        request: &CreateUserRequest,
    ) -> Result<CreateUserResponse, GatewayError> {
        self.exchange(Endpoint::AdminUsers, credential, json(request), |s| {
            s.admin_users.next()
        })
        .await
    }
}
