//! Stateless projections shared by the browser and terminal renderers.

use chrono::Local;
use cmdgate_api_models::{ActionTaken, CommandStatus, ExecutionRecord, Role};

use crate::router::{self, NavItem};
use crate::state::ConsoleState;

/// Shown when personal history is empty.
pub const EMPTY_HISTORY: &str = "No commands executed yet.";
/// Shown when the audit log is empty.
pub const EMPTY_LOGS: &str = "No logs found.";
/// Shown beside a freshly issued key.
pub const KEY_WARNING: &str = "Copy this key now. It will not be shown again.";
/// Terminal placeholder before any submission.
pub const TERMINAL_PLACEHOLDER: &str = "Ready. Type a command and press Enter.";

/// Latest outcome as a single terminal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalLine {
    /// Local wall-clock time of receipt.
    pub time_label: String,
    /// Upper-cased status.
    pub status_label: String,
    /// Lower-case status, for styling.
    pub tone: String,
    /// Gateway message.
    pub message: String,
}

impl TerminalLine {
    /// `[time] STATUS: message`
    #[must_use]
    pub fn render(&self) -> String {
        format!("[{}] {}: {}", self.time_label, self.status_label, self.message)
    }
}

/// Personal history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// Command text.
    pub command: String,
    /// Local time, or the raw timestamp when it does not parse.
    pub time_label: String,
    /// Outcome label.
    pub action_label: String,
    /// Lower-case outcome, for styling.
    pub tone: String,
}

/// Audit log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    /// Submitting user, or `-` when the gateway omits it.
    pub user: String,
    /// Command text.
    pub command: String,
    /// Outcome label.
    pub action_label: String,
    /// Lower-case outcome, for styling.
    pub tone: String,
    /// Local time, or the raw timestamp when it does not parse.
    pub time_label: String,
}

/// Sidebar identity badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBadge {
    /// Signed-in user.
    pub username: String,
    /// Role label.
    pub role_label: &'static str,
    /// Remaining credits.
    pub credits: i64,
    /// Whether the role is admin, for styling.
    pub admin: bool,
}

/// One-time display of an issued key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedKeyPanel {
    /// Member the key belongs to.
    pub username: String,
    /// Issued key.
    pub key: String,
    /// Copy-now warning.
    pub warning: &'static str,
}

/// Sidebar entries for the current session.
#[must_use]
pub fn nav_items(state: &ConsoleState) -> Vec<NavItem> {
    router::nav_items(state.session.as_ref(), state.tab)
}

/// Terminal line for the latest outcome.
#[must_use]
pub fn terminal_line(state: &ConsoleState) -> Option<TerminalLine> {
    state.outcome.as_ref().map(|outcome| TerminalLine {
        time_label: outcome
            .received_at
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string(),
        status_label: outcome.status.as_str().to_uppercase(),
        tone: status_tone(&outcome.status),
        message: outcome.message.clone(),
    })
}

/// Personal history rows in gateway order.
#[must_use]
pub fn history_rows(state: &ConsoleState) -> Vec<HistoryRow> {
    state
        .my_history
        .iter()
        .map(|record| HistoryRow {
            command: record.command.clone(),
            time_label: time_label(record),
            action_label: record.action_taken.label().to_string(),
            tone: action_tone(&record.action_taken),
        })
        .collect()
}

/// Audit log rows in gateway order.
#[must_use]
pub fn log_rows(state: &ConsoleState) -> Vec<LogRow> {
    state
        .all_logs
        .iter()
        .map(|record| LogRow {
            user: record.user.clone().unwrap_or_else(|| "-".to_string()),
            command: record.command.clone(),
            action_label: record.action_taken.label().to_string(),
            tone: action_tone(&record.action_taken),
            time_label: time_label(record),
        })
        .collect()
}

/// Badge for the signed-in user.
#[must_use]
pub fn session_badge(state: &ConsoleState) -> Option<SessionBadge> {
    state.session.as_ref().map(|session| SessionBadge {
        username: session.username.clone(),
        role_label: role_label(session.role),
        credits: session.credits,
        admin: session.role.is_admin(),
    })
}

/// Panel for the key issued by the last member creation.
#[must_use]
pub fn created_key_panel(state: &ConsoleState) -> Option<CreatedKeyPanel> {
    state.created_user.as_ref().map(|created| CreatedKeyPanel {
        username: created.username.clone(),
        key: created.issued_key.clone(),
        warning: KEY_WARNING,
    })
}

/// Local time label for a record.
#[must_use]
pub fn time_label(record: &ExecutionRecord) -> String {
    record.recorded_at().map_or_else(
        || record.timestamp.clone(),
        |at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

const fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "ADMIN",
        Role::Member => "MEMBER",
    }
}

fn status_tone(status: &CommandStatus) -> String {
    match status {
        CommandStatus::Accepted => "accepted".to_string(),
        CommandStatus::Rejected => "rejected".to_string(),
        CommandStatus::Error | CommandStatus::Other(_) => "error".to_string(),
    }
}

fn action_tone(action: &ActionTaken) -> String {
    match action {
        ActionTaken::Accepted => "accepted".to_string(),
        ActionTaken::Rejected => "rejected".to_string(),
        ActionTaken::Other(_) => "neutral".to_string(),
    }
}
