//! Console state slices and the reducers applied to them.
//!
//! # Design
//! - State is plain data so front-ends can clone it into their own stores.
//! - Session-scoped data (outcome, personal history) survives tab changes and is
//!   dropped when the session ends or the identity changes.
//! - View-scoped data (audit logs, issued key, rule-form feedback) is reset on
//!   entry to its tab.
//! - Epochs only move forward.

use std::fmt;

use chrono::{DateTime, Utc};
use cmdgate_api_models::{CommandResponse, CommandStatus, ExecutionRecord, Role, RuleAction, Session};

use crate::error::GatewayError;
use crate::router::{Screen, Tab};

/// Fallback outcome message when a failed submission carries no body message.
pub const COMMAND_FAILED: &str = "Error";
/// Outcome message for a blank submission.
pub const EMPTY_COMMAND: &str = "Enter a command to run";
/// Login error for a blank credential.
pub const EMPTY_CREDENTIAL: &str = "Enter your API key";
/// Login error when the gateway rejects the credential.
pub const INVALID_CREDENTIAL: &str = "Invalid API key";
/// Notice raised when an authenticated call is rejected mid-session.
pub const SESSION_EXPIRED: &str = "Your session has expired. Sign in again.";
/// Notice raised when the user signs out.
pub const SIGNED_OUT: &str = "Signed out";
/// Rule-form confirmation.
pub const RULE_ADDED: &str = "Rule added";
/// Rule-form fallback error.
pub const RULE_FAILED: &str = "Failed to add rule";
/// Rule-form error for a blank pattern.
pub const RULE_PATTERN_REQUIRED: &str = "Enter a pattern";
/// Rule-form error for a missing action.
pub const RULE_ACTION_REQUIRED: &str = "Choose an action";
/// User-form error for a blank username.
pub const USERNAME_REQUIRED: &str = "Username is required";
/// Form error when a member reaches an admin action.
pub const ADMIN_REQUIRED: &str = "Administrator role required";

/// Full console state observed by renderers.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ConsoleState {
    /// Resolved identity; `None` means the login screen shows.
    pub session: Option<Session>,
    /// Active tab while a session exists.
    pub tab: Tab,
    /// Credential entry form.
    pub login: LoginForm,
    /// Command being edited in the terminal.
    pub command_input: String,
    /// Submissions awaiting a response in this session.
    pub pending_commands: u32,
    /// Latest command outcome.
    pub outcome: Option<CommandOutcome>,
    /// The caller's own records.
    pub my_history: Vec<ExecutionRecord>,
    /// Every user's records; admin only.
    pub all_logs: Vec<ExecutionRecord>,
    /// Rule creation form.
    pub rule_form: RuleForm,
    /// Member creation form.
    pub user_form: UserForm,
    /// Key issued by the last member creation.
    pub created_user: Option<CreatedUserKey>,
    /// Transient banner.
    pub notice: Option<Notice>,
    pub(crate) session_epoch: u64,
    pub(crate) view_epoch: u64,
}

impl ConsoleState {
    /// Screen implied by the session and tab.
    #[must_use]
    pub fn screen(&self) -> Screen {
        if self.session.is_some() {
            Screen::Console(self.tab)
        } else {
            Screen::Login
        }
    }

    /// Role of the current session.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|session| session.role)
    }

    /// Whether the current session holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(Role::is_admin)
    }

    /// Generation of the authenticated session.
    #[must_use]
    pub const fn session_epoch(&self) -> u64 {
        self.session_epoch
    }

    /// Generation of the visible view.
    #[must_use]
    pub const fn view_epoch(&self) -> u64 {
        self.view_epoch
    }

    /// Install a resolved identity. Returns `true` when it differs from the
    /// current one, in which case all session data was reset.
    pub(crate) fn install_session(&mut self, session: Session) -> bool {
        let changed = self.session.as_ref().is_none_or(|current| {
            current.username != session.username || current.role != session.role
        });
        if changed {
            self.reset_session_scoped();
            self.session_epoch += 1;
            self.view_epoch += 1;
            self.tab = Tab::Terminal;
        }
        self.session = Some(session);
        self.login.error = None;
        changed
    }

    /// Drop the session and everything scoped to it.
    pub(crate) fn end_session(&mut self) {
        self.session = None;
        self.reset_session_scoped();
        self.session_epoch += 1;
        self.view_epoch += 1;
        self.tab = Tab::Terminal;
    }

    /// Show `tab`, resetting its view-scoped data.
    pub(crate) fn enter_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.view_epoch += 1;
        match tab {
            Tab::AdminUsers => {
                self.created_user = None;
                self.user_form.error = None;
            }
            Tab::AdminRules => {
                self.rule_form.error = None;
                self.rule_form.confirmation = None;
            }
            Tab::Terminal | Tab::History | Tab::AdminLogs => {}
        }
    }

    pub(crate) fn finish_command(&mut self) {
        self.pending_commands = self.pending_commands.saturating_sub(1);
    }

    fn reset_session_scoped(&mut self) {
        self.command_input.clear();
        self.pending_commands = 0;
        self.outcome = None;
        self.my_history.clear();
        self.all_logs.clear();
        self.rule_form = RuleForm::default();
        self.user_form = UserForm::default();
        self.created_user = None;
        self.notice = None;
    }
}

/// Credential entry form.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    /// Raw credential text as typed or restored.
    pub key: String,
    /// Why the last attempt failed.
    pub error: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("key", &if self.key.is_empty() { "" } else { "<redacted>" })
            .field("error", &self.error)
            .finish()
    }
}

/// Result of the latest command submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Gateway status, or `Error` for failed submissions.
    pub status: CommandStatus,
    /// Gateway message or failure reason.
    pub message: String,
    /// When the console received the result.
    pub received_at: DateTime<Utc>,
}

impl CommandOutcome {
    /// Outcome for a successful round trip.
    #[must_use]
    pub fn from_response(response: CommandResponse) -> Self {
        Self {
            status: response.status,
            message: response.message,
            received_at: Utc::now(),
        }
    }

    /// Outcome for a failed submission.
    #[must_use]
    pub fn failed(error: &GatewayError) -> Self {
        Self::error(error.server_message().unwrap_or(COMMAND_FAILED))
    }

    /// Error outcome with a fixed message.
    #[must_use]
    pub fn error(message: &str) -> Self {
        Self {
            status: CommandStatus::Error,
            message: message.to_string(),
            received_at: Utc::now(),
        }
    }
}

/// Rule creation form.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RuleForm {
    /// Regular expression matched against commands.
    pub pattern: String,
    /// Selected action; unselected until the user picks one.
    pub action: Option<RuleAction>,
    /// Last failure.
    pub error: Option<String>,
    /// Last success confirmation.
    pub confirmation: Option<String>,
}

/// Member creation form.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UserForm {
    /// Username being entered.
    pub username: String,
    /// Last failure.
    pub error: Option<String>,
}

/// Key issued for a newly created member. Shown once, never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct CreatedUserKey {
    /// Member the key belongs to.
    pub username: String,
    /// Issued key.
    pub issued_key: String,
}

impl fmt::Debug for CreatedUserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatedUserKey")
            .field("username", &self.username)
            .field("issued_key", &"<redacted>")
            .finish()
    }
}

/// Severity of a transient banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// Neutral information.
    Info,
    /// Failure the user should see.
    Error,
}

/// Transient banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Text.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// Error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdgate_api_models::{ActionTaken, ErrorBody};

    fn session(username: &str, role: Role) -> Session {
        Session {
            username: username.to_string(),
            role,
            credits: 5,
        }
    }

    fn record() -> ExecutionRecord {
        ExecutionRecord {
            command: "ls".into(),
            timestamp: "2024-05-01T10:00:00Z".into(),
            action_taken: ActionTaken::Accepted,
            user: None,
        }
    }

    #[test]
    fn installing_same_identity_keeps_session_data() {
        let mut state = ConsoleState::default();
        assert!(state.install_session(session("alice", Role::Admin)));
        state.my_history.push(record());
        state.tab = Tab::AdminLogs;
        let epoch = state.session_epoch();

        let mut refreshed = session("alice", Role::Admin);
        refreshed.credits = 4;
        assert!(!state.install_session(refreshed));
        assert_eq!(state.session_epoch(), epoch);
        assert_eq!(state.my_history.len(), 1);
        assert_eq!(state.tab, Tab::AdminLogs);
        assert_eq!(state.session.as_ref().map(|s| s.credits), Some(4));
    }

    #[test]
    fn role_change_resets_admin_data_and_tab() {
        let mut state = ConsoleState::default();
        state.install_session(session("alice", Role::Admin));
        state.all_logs.push(record());
        state.tab = Tab::AdminLogs;
        let epochs = (state.session_epoch(), state.view_epoch());

        assert!(state.install_session(session("alice", Role::Member)));
        assert!(state.all_logs.is_empty());
        assert_eq!(state.screen(), Screen::Console(Tab::Terminal));
        assert!(state.session_epoch() > epochs.0);
        assert!(state.view_epoch() > epochs.1);
    }

    #[test]
    fn end_session_clears_everything_scoped_to_it() {
        let mut state = ConsoleState::default();
        state.install_session(session("alice", Role::Admin));
        state.outcome = Some(CommandOutcome::error("boom"));
        state.created_user = Some(CreatedUserKey {
            username: "bob".into(),
            issued_key: "k".into(),
        });
        state.pending_commands = 2;
        state.end_session();
        assert_eq!(state.screen(), Screen::Login);
        assert!(state.outcome.is_none());
        assert!(state.created_user.is_none());
        assert_eq!(state.pending_commands, 0);
        assert!(!state.is_admin());
    }

    #[test]
    fn entering_tabs_resets_their_view_data() {
        let mut state = ConsoleState::default();
        state.install_session(session("root", Role::Admin));
        state.created_user = Some(CreatedUserKey {
            username: "bob".into(),
            issued_key: "k".into(),
        });
        state.rule_form.confirmation = Some(RULE_ADDED.into());
        state.rule_form.pattern = "^ls".into();

        let before = state.view_epoch();
        state.enter_tab(Tab::AdminUsers);
        assert!(state.created_user.is_none());
        state.enter_tab(Tab::AdminRules);
        assert!(state.rule_form.confirmation.is_none());
        assert_eq!(state.rule_form.pattern, "^ls");
        assert_eq!(state.view_epoch(), before + 2);
    }

    #[test]
    fn failed_outcome_prefers_body_message() {
        let err = GatewayError::from_status(
            402,
            ErrorBody {
                message: Some("Insufficient credits".into()),
                error: None,
            },
        );
        let outcome = CommandOutcome::failed(&err);
        assert_eq!(outcome.status, CommandStatus::Error);
        assert_eq!(outcome.message, "Insufficient credits");

        let bare = CommandOutcome::failed(&GatewayError::transport("refused"));
        assert_eq!(bare.message, COMMAND_FAILED);
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let key = CreatedUserKey {
            username: "bob".into(),
            issued_key: "issued-secret".into(),
        };
        assert!(!format!("{key:?}").contains("issued-secret"));
        let login = LoginForm {
            key: "typed-secret".into(),
            error: None,
        };
        assert!(!format!("{login:?}").contains("typed-secret"));
    }
}
