#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Shared HTTP DTOs for the command gateway API.
//!
//! These types are used by both the browser and terminal transports so the
//! request/response contract stays in one place. Enumerations that the gateway
//! may extend (roles, record outcomes, command statuses) are string-backed and
//! keep unknown values instead of failing to decode.
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Header carrying the caller's credential on every request.
pub const API_KEY_HEADER: &str = "x-api-key";
/// Identity lookup endpoint.
pub const PATH_ME: &str = "/me";
/// Caller-scoped execution history endpoint.
pub const PATH_MY_HISTORY: &str = "/my-history";
/// Command submission endpoint.
pub const PATH_COMMANDS: &str = "/commands";
/// Global audit log endpoint (admin only).
pub const PATH_ADMIN_LOGS: &str = "/admin/logs";
/// Rule creation endpoint (admin only).
pub const PATH_ADMIN_RULES: &str = "/admin/rules";
/// User provisioning endpoint (admin only).
pub const PATH_ADMIN_USERS: &str = "/admin/users";

/// Role assigned to an authenticated identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Regular member: terminal and personal history only.
    #[default]
    Member,
    /// Administrator: additionally manages users, rules, and audit logs.
    Admin,
}

impl Role {
    /// Wire label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    /// Whether this role may reach administration views.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::Member
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity resolved by `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Account name.
    pub username: String,
    /// Role used to gate administration views.
    #[serde(default)]
    pub role: Role,
    /// Remaining credit balance as reported by the gateway.
    #[serde(default)]
    pub credits: i64,
}

/// Outcome recorded by the gateway for a single execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ActionTaken {
    /// Command was allowed.
    Accepted,
    /// Command was blocked.
    Rejected,
    /// Any other gateway-defined outcome, kept verbatim.
    Other(String),
}

impl ActionTaken {
    /// Label shown in history and audit views.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for ActionTaken {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ACCEPTED" => Self::Accepted,
            "REJECTED" => Self::Rejected,
            _ => Self::Other(value),
        }
    }
}

impl From<ActionTaken> for String {
    fn from(value: ActionTaken) -> Self {
        match value {
            ActionTaken::Other(value) => value,
            other => other.label().to_string(),
        }
    }
}

/// One logged command submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Command text as submitted.
    pub command: String,
    /// Server timestamp, kept as sent.
    pub timestamp: String,
    /// Outcome recorded for the command.
    pub action_taken: ActionTaken,
    /// Submitting user; present on global audit logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ExecutionRecord {
    /// Parse the timestamp as RFC 3339 when the gateway sends one.
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }
}

/// Body for `POST /commands`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandRequest {
    /// Command text to evaluate.
    pub command: String,
}

/// Status returned for a command submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum CommandStatus {
    /// Gateway accepted and ran the command.
    Accepted,
    /// Gateway refused the command.
    Rejected,
    /// Submission failed.
    Error,
    /// Any other gateway-defined status, kept verbatim.
    Other(String),
}

impl CommandStatus {
    /// Lower-case wire label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Error => "error",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for CommandStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            "error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<CommandStatus> for String {
    fn from(value: CommandStatus) -> Self {
        match value {
            CommandStatus::Other(value) => value,
            other => other.as_str().to_string(),
        }
    }
}

/// Response for `POST /commands`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandResponse {
    /// Evaluation status.
    pub status: CommandStatus,
    /// Human-readable explanation from the gateway.
    #[serde(default)]
    pub message: String,
}

/// Action applied by a rule when its pattern matches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleAction {
    /// Allow matching commands without review.
    AutoAccept,
    /// Block matching commands.
    AutoReject,
}

impl RuleAction {
    /// Every action, in the order the rule form offers them.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::AutoReject, Self::AutoAccept]
    }

    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoAccept => "AUTO_ACCEPT",
            Self::AutoReject => "AUTO_REJECT",
        }
    }

    /// Parse a wire label, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AUTO_ACCEPT" => Some(Self::AutoAccept),
            "AUTO_REJECT" => Some(Self::AutoReject),
            _ => None,
        }
    }
}

/// Body for `POST /admin/rules`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleRequest {
    /// Regular expression matched against submitted commands.
    pub pattern: String,
    /// Action applied on match.
    pub action: RuleAction,
}

/// Body for `POST /admin/users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserRequest {
    /// Name for the new member.
    pub username: String,
}

/// Response for `POST /admin/users`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    /// Credential issued to the new member. Shown once.
    pub api_key: String,
}

impl fmt::Debug for CreateUserResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserResponse")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Error document returned by the gateway on non-2xx responses.
///
/// The gateway is inconsistent about which field it fills, so both are optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ErrorBody {
    /// Message used by command evaluation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Message used by administration failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Decode an error body, tolerating anything that is not the expected shape.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }
}
