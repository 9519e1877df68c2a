//! Session controller: issues gateway requests and reconciles responses.
//!
//! # Design
//! - State lives in a `RefCell`; borrows never span an `.await`.
//! - Each request captures the session epoch (and, for view-scoped data, the
//!   view epoch) when issued; a response is applied only if they still match.
//! - The active credential is held beside the state, never inside it, so
//!   snapshots handed to renderers carry no secret.
//! - The observer runs after every mutation and must not re-enter the
//!   controller.

use std::cell::RefCell;

use cmdgate_api_models::{CommandRequest, CreateUserRequest, RuleAction, RuleRequest};
use futures_util::future::join;
use tracing::{debug, info, warn};

use crate::api::GatewayApi;
use crate::config::{ConsoleConfig, FetchFailurePolicy};
use crate::credential::{Credential, CredentialStore};
use crate::error::{GatewayError, NavigationError};
use crate::router::{self, Tab};
use crate::state::{
    ADMIN_REQUIRED, CommandOutcome, ConsoleState, CreatedUserKey, EMPTY_COMMAND, EMPTY_CREDENTIAL,
    INVALID_CREDENTIAL, LoginForm, Notice, RULE_ACTION_REQUIRED, RULE_ADDED, RULE_FAILED,
    RULE_PATTERN_REQUIRED, RuleForm, SESSION_EXPIRED, SIGNED_OUT, USERNAME_REQUIRED,
};

type Observer = Box<dyn Fn(&ConsoleState)>;

/// Drives one console session against a gateway.
pub struct ConsoleController<A, S> {
    api: A,
    credentials: S,
    config: ConsoleConfig,
    active: RefCell<Option<Credential>>,
    state: RefCell<ConsoleState>,
    observer: RefCell<Option<Observer>>,
}

impl<A, S> ConsoleController<A, S>
where
    A: GatewayApi,
    S: CredentialStore,
{
    /// Controller in the logged-out state.
    pub fn new(api: A, credentials: S, config: ConsoleConfig) -> Self {
        Self {
            api,
            credentials,
            config,
            active: RefCell::new(None),
            state: RefCell::new(ConsoleState::default()),
            observer: RefCell::new(None),
        }
    }

    /// Register the callback invoked after every state change.
    pub fn set_observer(&self, observer: impl Fn(&ConsoleState) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ConsoleState {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning.
    pub fn with_state<R>(&self, read: impl FnOnce(&ConsoleState) -> R) -> R {
        read(&self.state.borrow())
    }

    /// Gateway client.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Credential persistence.
    pub const fn credential_store(&self) -> &S {
        &self.credentials
    }

    /// Active policies.
    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().session.is_some()
    }

    /// Restore the persisted credential into the login form and, when
    /// configured, resume the session with it.
    pub async fn start(&self) {
        let Some(credential) = self.credentials.load() else {
            debug!("no persisted credential");
            return;
        };
        self.update(|state| state.login.key = credential.expose().to_string());
        if self.config.resume_session {
            debug!("resuming session from persisted credential");
            self.authenticate_with(credential).await;
        }
    }

    /// Authenticate with whatever the login form holds.
    pub async fn login(&self) {
        let raw = self.state.borrow().login.key.clone();
        self.authenticate(&raw).await;
    }

    /// Resolve `raw` into a session, persist it on success, and load history.
    ///
    /// Any failure ends the current session and removes the stored credential.
    pub async fn authenticate(&self, raw: &str) {
        match Credential::parse(raw) {
            Some(credential) => self.authenticate_with(credential).await,
            None => self.update(|state| state.login.error = Some(EMPTY_CREDENTIAL.to_string())),
        }
    }

    async fn authenticate_with(&self, credential: Credential) {
        let epoch = self.state.borrow().session_epoch;
        debug!("resolving identity");
        let result = self.api.me(&credential).await;
        if self.session_moved(epoch) {
            debug!("discarding identity response for a superseded session");
            return;
        }
        match result {
            Ok(session) => {
                info!(username = %session.username, role = %session.role, "session established");
                self.credentials.save(&credential);
                *self.active.borrow_mut() = Some(credential);
                self.update(|state| {
                    state.install_session(session);
                });
                self.fetch_my_history().await;
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "authentication failed");
                self.credentials.clear();
                self.active.borrow_mut().take();
                let message = login_failure(&err);
                self.update(|state| {
                    state.end_session();
                    state.login.error = Some(message);
                });
            }
        }
    }

    /// Re-resolve the identity to pick up the current credit balance.
    pub async fn refresh_credits(&self) {
        let Some((credential, epoch)) = self.session_context() else {
            return;
        };
        debug!("refreshing credits");
        let result = self.api.me(&credential).await;
        if self.session_moved(epoch) {
            debug!("discarding identity refresh for a superseded session");
            return;
        }
        match result {
            Ok(session) => {
                let changed = self.update(|state| state.install_session(session));
                if changed {
                    info!("identity changed on refresh; session data reset");
                    self.fetch_my_history().await;
                }
            }
            Err(err) if err.is_authentication() => self.expire_session(),
            Err(err) => warn!(kind = err.kind(), error = %err, "credit refresh failed"),
        }
    }

    /// End the session. Safe to call repeatedly.
    pub fn logout(&self) {
        self.credentials.clear();
        let had_session = self.active.borrow_mut().take().is_some();
        self.update(|state| {
            state.end_session();
            state.login = LoginForm::default();
            if had_session {
                state.notice = Some(Notice::info(SIGNED_OUT));
            }
        });
        if had_session {
            info!("signed out");
        }
    }

    /// Show `tab` and load whatever it needs.
    ///
    /// # Errors
    ///
    /// Refuses the selection without a session, or when a member asks for an
    /// admin tab.
    pub async fn navigate(&self, tab: Tab) -> Result<(), NavigationError> {
        self.select_tab(tab)?;
        if tab == Tab::AdminLogs {
            self.fetch_all_logs().await;
        }
        Ok(())
    }

    /// Show `tab` without issuing any request.
    ///
    /// # Errors
    ///
    /// Same refusals as [`Self::navigate`].
    pub fn select_tab(&self, tab: Tab) -> Result<(), NavigationError> {
        router::authorize(tab, self.state.borrow().session.as_ref())?;
        self.update(|state| state.enter_tab(tab));
        debug!(tab = tab.slug(), "tab selected");
        Ok(())
    }

    /// Replace personal history with the gateway's copy.
    pub async fn fetch_my_history(&self) {
        let Some((credential, epoch)) = self.session_context() else {
            return;
        };
        debug!("fetching personal history");
        let result = self.api.my_history(&credential).await;
        if self.session_moved(epoch) {
            debug!("discarding history for a superseded session");
            return;
        }
        match result {
            Ok(records) => self.update(|state| state.my_history = records),
            Err(err) => self.fetch_failed("history", &err),
        }
    }

    /// Replace the audit log with the gateway's copy. Admin only.
    pub async fn fetch_all_logs(&self) {
        let Some((credential, epoch)) = self.session_context() else {
            return;
        };
        let view = {
            let state = self.state.borrow();
            if !state.is_admin() {
                debug!("audit log fetch skipped for non-admin session");
                return;
            }
            state.view_epoch
        };
        debug!("fetching audit logs");
        let result = self.api.admin_logs(&credential).await;
        if self.session_moved(epoch) {
            debug!("discarding audit logs for a superseded session");
            return;
        }
        match result {
            Ok(_) if self.view_moved(view) => debug!("discarding audit logs for a closed view"),
            Ok(records) => self.update(|state| state.all_logs = records),
            Err(err) => self.fetch_failed("audit logs", &err),
        }
    }

    /// Submit the terminal input, record the outcome, then refresh credits and
    /// history.
    pub async fn submit_command(&self) {
        let Some((credential, epoch)) = self.session_context() else {
            return;
        };
        let command = self.state.borrow().command_input.clone();
        if command.trim().is_empty() {
            self.update(|state| state.outcome = Some(CommandOutcome::error(EMPTY_COMMAND)));
            return;
        }
        self.update(|state| state.pending_commands += 1);
        debug!("submitting command");
        let result = self
            .api
            .submit_command(&credential, &CommandRequest { command })
            .await;
        if self.session_moved(epoch) {
            debug!("discarding command outcome for a superseded session");
            return;
        }
        match result {
            Ok(response) => {
                info!(status = response.status.as_str(), "command evaluated");
                self.update(|state| {
                    state.finish_command();
                    state.outcome = Some(CommandOutcome::from_response(response));
                });
                join(self.refresh_credits(), self.fetch_my_history()).await;
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "command submission failed");
                self.update(|state| {
                    state.finish_command();
                    state.outcome = Some(CommandOutcome::failed(&err));
                });
                if err.is_authentication() {
                    self.expire_session();
                }
            }
        }
    }

    /// Create a rule from the rule form. Admin only.
    pub async fn add_rule(&self) {
        let Some((credential, epoch)) = self.session_context() else {
            return;
        };
        let prepared = {
            let state = self.state.borrow();
            prepare_rule(&state).map(|request| (request, state.view_epoch))
        };
        let (request, view) = match prepared {
            Ok(prepared) => prepared,
            Err(message) => {
                self.update(|state| {
                    state.rule_form.error = Some(message.to_string());
                    state.rule_form.confirmation = None;
                });
                return;
            }
        };
        self.update(|state| {
            state.rule_form.error = None;
            state.rule_form.confirmation = None;
        });
        debug!(action = request.action.as_str(), "creating rule");
        let result = self.api.create_rule(&credential, &request).await;
        if self.session_moved(epoch) {
            debug!("discarding rule result for a superseded session");
            return;
        }
        match result {
            Err(err) if err.is_authentication() => self.expire_session(),
            Ok(()) if self.view_moved(view) => {
                info!(action = request.action.as_str(), "rule created after leaving security rules");
                self.update(|state| {
                    state.rule_form.pattern.clear();
                    state.rule_form.action = None;
                });
            }
            Err(_) if self.view_moved(view) => {
                debug!("discarding rule failure for a closed view");
            }
            Ok(()) => {
                info!(action = request.action.as_str(), "rule created");
                self.update(|state| {
                    state.rule_form = RuleForm {
                        confirmation: Some(RULE_ADDED.to_string()),
                        ..RuleForm::default()
                    };
                });
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "rule creation failed");
                let message = err.server_error().unwrap_or(RULE_FAILED).to_string();
                self.update(|state| state.rule_form.error = Some(message));
            }
        }
    }

    /// Create a member from the user form and hold the issued key for display.
    /// Admin only.
    pub async fn create_user(&self) {
        let Some((credential, epoch)) = self.session_context() else {
            return;
        };
        let prepared = {
            let state = self.state.borrow();
            prepare_user(&state).map(|username| (username, state.view_epoch))
        };
        let (username, view) = match prepared {
            Ok(prepared) => prepared,
            Err(message) => {
                self.update(|state| state.user_form.error = Some(message.to_string()));
                return;
            }
        };
        self.update(|state| {
            state.created_user = None;
            state.user_form.error = None;
        });
        debug!(username = %username, "creating member");
        let request = CreateUserRequest {
            username: username.clone(),
        };
        let result = self.api.create_user(&credential, &request).await;
        if self.session_moved(epoch) {
            debug!("discarding member creation result for a superseded session");
            return;
        }
        match result {
            Err(err) if err.is_authentication() => self.expire_session(),
            Ok(_) if self.view_moved(view) => {
                warn!(username = %username, "member created after leaving user management; issued key discarded");
                self.update(|state| state.user_form.username.clear());
            }
            Ok(response) => {
                info!(username = %username, "member created");
                self.update(|state| {
                    state.user_form.username.clear();
                    state.created_user = Some(CreatedUserKey {
                        username,
                        issued_key: response.api_key,
                    });
                });
            }
            Err(_) if self.view_moved(view) => {
                debug!("discarding member creation failure for a closed view");
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "member creation failed");
                let message = err
                    .server_error()
                    .map_or_else(|| err.to_string(), str::to_string);
                self.update(|state| state.user_form.error = Some(message));
            }
        }
    }

    /// Update the login form.
    pub fn set_credential_input(&self, value: &str) {
        self.update(|state| {
            state.login.key = value.to_string();
            state.login.error = None;
        });
    }

    /// Update the terminal input.
    pub fn set_command_input(&self, value: &str) {
        self.update(|state| state.command_input = value.to_string());
    }

    /// Update the rule pattern.
    pub fn set_rule_pattern(&self, value: &str) {
        self.update(|state| state.rule_form.pattern = value.to_string());
    }

    /// Select or clear the rule action.
    pub fn set_rule_action(&self, action: Option<RuleAction>) {
        self.update(|state| state.rule_form.action = action);
    }

    /// Update the username being created.
    pub fn set_username_input(&self, value: &str) {
        self.update(|state| state.user_form.username = value.to_string());
    }

    /// Hide the banner.
    pub fn dismiss_notice(&self) {
        self.update(|state| state.notice = None);
    }

    /// Hide the issued key.
    pub fn dismiss_created_user(&self) {
        self.update(|state| state.created_user = None);
    }

    fn update<R>(&self, mutate: impl FnOnce(&mut ConsoleState) -> R) -> R {
        let result = mutate(&mut self.state.borrow_mut());
        self.notify();
        result
    }

    fn notify(&self) {
        let observer = self.observer.borrow();
        if let Some(observer) = observer.as_ref() {
            observer(&self.state.borrow());
        }
    }

    fn session_context(&self) -> Option<(Credential, u64)> {
        let credential = self.active.borrow().clone()?;
        let state = self.state.borrow();
        state.session.as_ref()?;
        Some((credential, state.session_epoch))
    }

    fn session_moved(&self, epoch: u64) -> bool {
        self.state.borrow().session_epoch != epoch
    }

    fn view_moved(&self, epoch: u64) -> bool {
        self.state.borrow().view_epoch != epoch
    }

    fn expire_session(&self) {
        info!("credential rejected mid-session; signing out");
        self.credentials.clear();
        self.active.borrow_mut().take();
        self.update(|state| {
            state.end_session();
            state.login.error = Some(SESSION_EXPIRED.to_string());
            state.notice = Some(Notice::error(SESSION_EXPIRED));
        });
    }

    fn fetch_failed(&self, what: &str, err: &GatewayError) {
        if err.is_authentication() {
            self.expire_session();
            return;
        }
        warn!(kind = err.kind(), error = %err, "{what} fetch failed");
        if self.config.fetch_failures == FetchFailurePolicy::Surface {
            let message = format!("Could not load {what}: {err}");
            self.update(|state| state.notice = Some(Notice::error(message)));
        }
    }
}

fn login_failure(err: &GatewayError) -> String {
    match err {
        GatewayError::Authentication { .. } => INVALID_CREDENTIAL.to_string(),
        other => other
            .server_error()
            .or_else(|| other.server_message())
            .map_or_else(|| other.to_string(), str::to_string),
    }
}

fn prepare_rule(state: &ConsoleState) -> Result<RuleRequest, &'static str> {
    if !state.is_admin() {
        return Err(ADMIN_REQUIRED);
    }
    let form = &state.rule_form;
    if form.pattern.trim().is_empty() {
        return Err(RULE_PATTERN_REQUIRED);
    }
    let action = form.action.ok_or(RULE_ACTION_REQUIRED)?;
    Ok(RuleRequest {
        pattern: form.pattern.clone(),
        action,
    })
}

fn prepare_user(state: &ConsoleState) -> Result<String, &'static str> {
    if !state.is_admin() {
        return Err(ADMIN_REQUIRED);
    }
    let username = state.user_form.username.trim();
    if username.is_empty() {
        return Err(USERNAME_REQUIRED);
    }
    Ok(username.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdgate_api_models::{Role, Session};

    fn admin_state() -> ConsoleState {
        let mut state = ConsoleState::default();
        state.install_session(Session {
            username: "root".into(),
            role: Role::Admin,
            credits: 100,
        });
        state
    }

    #[test]
    fn rule_requests_need_pattern_and_action() {
        let mut state = admin_state();
        assert_eq!(prepare_rule(&state), Err(RULE_PATTERN_REQUIRED));
        state.rule_form.pattern = "^rm -rf".into();
        assert_eq!(prepare_rule(&state), Err(RULE_ACTION_REQUIRED));
        state.rule_form.action = Some(RuleAction::AutoReject);
        let request = prepare_rule(&state).expect("request");
        assert_eq!(request.pattern, "^rm -rf");
        assert_eq!(request.action, RuleAction::AutoReject);
    }

    #[test]
    fn user_requests_trim_and_require_a_name() {
        let mut state = admin_state();
        state.user_form.username = "   ".into();
        assert_eq!(prepare_user(&state), Err(USERNAME_REQUIRED));
        state.user_form.username = "  bob ".into();
        assert_eq!(prepare_user(&state).as_deref(), Ok("bob"));
    }

    #[test]
    fn admin_forms_refuse_members() {
        let mut state = ConsoleState::default();
        state.install_session(Session {
            username: "alice".into(),
            role: Role::Member,
            credits: 1,
        });
        state.user_form.username = "bob".into();
        assert_eq!(prepare_user(&state), Err(ADMIN_REQUIRED));
        assert_eq!(prepare_rule(&state), Err(ADMIN_REQUIRED));
    }

    #[test]
    fn login_failures_explain_the_cause() {
        let rejected = GatewayError::from_status(401, cmdgate_api_models::ErrorBody::default());
        assert_eq!(login_failure(&rejected), INVALID_CREDENTIAL);
        let down = GatewayError::transport("connection refused");
        assert_eq!(
            login_failure(&down),
            "gateway unavailable: connection refused"
        );
    }
}
