//! Canned sessions, records, credentials, and controllers.

use cmdgate_api_models::{ActionTaken, ExecutionRecord, Role, Session};
use cmdgate_console::{ConsoleConfig, ConsoleController, Credential, MemoryCredentialStore};

use crate::mocks::FakeGateway;

/// Controller wired to the scripted gateway and an in-memory store.
pub type TestConsole = ConsoleController<FakeGateway, MemoryCredentialStore>;

/// Key used by the administrator fixture.
pub const ADMIN_KEY: &str = "admin-secret-123";
/// Key used by the member fixture.
pub const MEMBER_KEY: &str = "member-key-456";

/// Administrator session with a healthy balance.
#[must_use]
pub fn admin_session() -> Session {
    Session {
        username: "root".to_string(),
        role: Role::Admin,
        credits: 100,
    }
}

/// Member session with a small balance.
#[must_use]
pub fn member_session() -> Session {
    Session {
        username: "alice".to_string(),
        role: Role::Member,
        credits: 10,
    }
}

/// `session` with a different balance.
#[must_use]
pub fn with_credits(session: Session, credits: i64) -> Session {
    Session { credits, ..session }
}

/// Parsed credential, for seeding stores.
///
/// # Panics
///
/// Panics when `raw` is blank.
#[must_use]
pub fn credential(raw: &str) -> Credential {
    Credential::parse(raw).expect("fixture credential must not be blank")
}

/// Personal history record.
#[must_use]
pub fn record(command: &str, action: ActionTaken) -> ExecutionRecord {
    ExecutionRecord {
        command: command.to_string(),
        timestamp: "2024-05-01T10:00:00Z".to_string(),
        action_taken: action,
        user: None,
    }
}

/// Audit log record attributed to `user`.
#[must_use]
pub fn log_record(user: &str, command: &str, action: ActionTaken) -> ExecutionRecord {
    ExecutionRecord {
        user: Some(user.to_string()),
        ..record(command, action)
    }
}

/// Logged-out controller over `gateway` with default policies.
#[must_use]
pub fn console(gateway: &FakeGateway) -> TestConsole {
    console_with(gateway, MemoryCredentialStore::new(), ConsoleConfig::default())
}

/// Logged-out controller with an explicit store and policies.
#[must_use]
pub fn console_with(
    gateway: &FakeGateway,
    store: MemoryCredentialStore,
    config: ConsoleConfig,
) -> TestConsole {
    ConsoleController::new(gateway.clone(), store, config)
}

/// Controller already signed in as `session` with `key`; the call log is
/// cleared afterwards so tests only see their own traffic.
pub async fn signed_in(session: Session, key: &str) -> (FakeGateway, TestConsole) {
    let gateway = FakeGateway::signed_in_as(session);
    let console = console(&gateway);
    console.authenticate(key).await;
    gateway.reset_calls();
    (gateway, console)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_have_expected_roles() {
        assert!(admin_session().role.is_admin());
        assert!(!member_session().role.is_admin());
        assert_eq!(with_credits(member_session(), 3).credits, 3);
        assert_eq!(
            log_record("bob", "ls", ActionTaken::Accepted).user.as_deref(),
            Some("bob")
        );
        assert_eq!(credential(" k ").expose(), "k");
    }
}
