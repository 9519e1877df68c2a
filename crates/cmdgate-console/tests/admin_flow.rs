use cmdgate_api_models::{ActionTaken, RuleAction};
use cmdgate_console::state::{
    RULE_ACTION_REQUIRED, RULE_ADDED, RULE_FAILED, USERNAME_REQUIRED,
};
use cmdgate_console::{
    ConsoleConfig, Endpoint, FetchFailurePolicy, MemoryCredentialStore, NavigationError,
    NoticeKind, Screen, Tab, views,
};
use cmdgate_test_support::fixtures::{
    ADMIN_KEY, MEMBER_KEY, admin_session, log_record, member_session,
};
use cmdgate_test_support::{FakeGateway, console_with, signed_in, status};
use serde_json::json;

#[tokio::test]
async fn members_never_reach_admin_views() {
    let (gateway, console) = signed_in(member_session(), MEMBER_KEY).await;

    for tab in Tab::all() {
        let result = console.navigate(tab).await;
        if tab.requires_admin() {
            assert_eq!(result, Err(NavigationError::AdminRequired(tab)));
        } else {
            assert!(result.is_ok());
        }
        console.refresh_credits().await;
        assert!(!matches!(
            console.snapshot().screen(),
            Screen::Console(tab) if tab.requires_admin()
        ));
    }

    console.fetch_all_logs().await;
    console.set_username_input("mallory");
    console.create_user().await;
    assert_eq!(gateway.count(Endpoint::AdminLogs), 0);
    assert_eq!(gateway.count(Endpoint::AdminUsers), 0);
    assert_eq!(views::nav_items(&console.snapshot()).len(), 2);
}

#[tokio::test]
async fn navigation_without_a_session_is_refused() {
    let gateway = FakeGateway::new();
    let console = cmdgate_test_support::console(&gateway);
    assert_eq!(
        console.navigate(Tab::History).await,
        Err(NavigationError::NotAuthenticated(Tab::History))
    );
    assert_eq!(console.snapshot().screen(), Screen::Login);
}

#[tokio::test]
async fn audit_logs_load_lazily_on_entry() {
    let (gateway, console) = signed_in(admin_session(), ADMIN_KEY).await;
    gateway.set_admin_logs(Ok(vec![
        log_record("alice", "ls", ActionTaken::Accepted),
        log_record("bob", "rm -rf /", ActionTaken::Rejected),
    ]));

    console.navigate(Tab::History).await.expect("history");
    assert_eq!(gateway.count(Endpoint::AdminLogs), 0);

    console.navigate(Tab::AdminLogs).await.expect("logs");
    let rows = views::log_rows(&console.snapshot());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].user, "bob");
    assert_eq!(rows[1].action_label, "REJECTED");

    console.fetch_all_logs().await;
    assert_eq!(gateway.count(Endpoint::AdminLogs), 2);
}

#[tokio::test]
async fn issued_key_is_shown_once_and_cleared_on_return() {
    let (gateway, console) = signed_in(admin_session(), ADMIN_KEY).await;

    console.navigate(Tab::AdminUsers).await.expect("users");
    assert!(console.snapshot().created_user.is_none());

    console.set_username_input("  bob ");
    console.create_user().await;

    let state = console.snapshot();
    let panel = views::created_key_panel(&state).expect("issued key");
    assert_eq!(panel.username, "bob");
    assert_eq!(panel.key, "issued-key");
    assert!(state.user_form.username.is_empty());
    assert_eq!(
        gateway.calls()[0].body,
        Some(json!({ "username": "bob" }))
    );

    console.navigate(Tab::Terminal).await.expect("terminal");
    console.navigate(Tab::AdminUsers).await.expect("users");
    assert!(console.snapshot().created_user.is_none());
}

#[tokio::test]
async fn user_creation_validates_and_reports_server_errors() {
    let (gateway, console) = signed_in(admin_session(), ADMIN_KEY).await;
    console.navigate(Tab::AdminUsers).await.expect("users");

    console.set_username_input("   ");
    console.create_user().await;
    assert_eq!(
        console.snapshot().user_form.error.as_deref(),
        Some(USERNAME_REQUIRED)
    );
    assert!(gateway.calls().is_empty());

    gateway.push_user(Err(status(409, Some("User already exists"))));
    console.set_username_input("alice");
    console.create_user().await;
    let state = console.snapshot();
    assert_eq!(state.user_form.error.as_deref(), Some("User already exists"));
    assert_eq!(state.user_form.username, "alice");
    assert!(state.created_user.is_none());

    gateway.push_user(Err(cmdgate_console::GatewayError::transport("timed out")));
    console.create_user().await;
    assert_eq!(
        console.snapshot().user_form.error.as_deref(),
        Some("gateway unavailable: timed out")
    );
}

#[tokio::test]
async fn saved_rule_clears_the_form() {
    let (gateway, console) = signed_in(admin_session(), ADMIN_KEY).await;
    console.navigate(Tab::AdminRules).await.expect("rules");

    console.set_rule_pattern("^rm -rf");
    console.set_rule_action(Some(RuleAction::AutoReject));
    console.add_rule().await;

    let form = console.snapshot().rule_form;
    assert!(form.pattern.is_empty());
    assert!(form.action.is_none());
    assert_eq!(form.confirmation.as_deref(), Some(RULE_ADDED));
    assert_eq!(
        gateway.calls()[0].body,
        Some(json!({ "pattern": "^rm -rf", "action": "AUTO_REJECT" }))
    );

    console.navigate(Tab::Terminal).await.expect("terminal");
    console.navigate(Tab::AdminRules).await.expect("rules");
    assert!(console.snapshot().rule_form.confirmation.is_none());
}

#[tokio::test]
async fn rule_failures_keep_the_inputs() {
    let (gateway, console) = signed_in(admin_session(), ADMIN_KEY).await;
    console.navigate(Tab::AdminRules).await.expect("rules");

    console.set_rule_pattern("^shutdown");
    console.add_rule().await;
    assert_eq!(
        console.snapshot().rule_form.error.as_deref(),
        Some(RULE_ACTION_REQUIRED)
    );
    assert!(gateway.calls().is_empty());

    console.set_rule_action(Some(RuleAction::AutoAccept));
    gateway.push_rule(Err(status(400, Some("Invalid regex"))));
    console.add_rule().await;
    let form = console.snapshot().rule_form;
    assert_eq!(form.error.as_deref(), Some("Invalid regex"));
    assert_eq!(form.pattern, "^shutdown");
    assert_eq!(form.action, Some(RuleAction::AutoAccept));

    gateway.push_rule(Err(status(403, None)));
    console.add_rule().await;
    assert_eq!(
        console.snapshot().rule_form.error.as_deref(),
        Some(RULE_FAILED)
    );
    assert_eq!(console.snapshot().screen(), Screen::Console(Tab::AdminRules));
}

#[tokio::test]
async fn fetch_failure_policy_controls_notices() {
    for (policy, expect_notice) in [
        (FetchFailurePolicy::Silent, false),
        (FetchFailurePolicy::Surface, true),
    ] {
        let gateway = FakeGateway::signed_in_as(admin_session());
        let config = ConsoleConfig {
            fetch_failures: policy,
            ..ConsoleConfig::default()
        };
        let console = console_with(&gateway, MemoryCredentialStore::new(), config);
        console.authenticate(ADMIN_KEY).await;
        gateway.set_admin_logs(Ok(vec![log_record("alice", "ls", ActionTaken::Accepted)]));
        console.navigate(Tab::AdminLogs).await.expect("logs");

        gateway.set_admin_logs(Err(status(500, None)));
        console.fetch_all_logs().await;

        let state = console.snapshot();
        assert_eq!(state.all_logs.len(), 1, "previous data is kept");
        assert_eq!(
            state
                .notice
                .as_ref()
                .is_some_and(|notice| notice.kind == NoticeKind::Error),
            expect_notice
        );
    }
}
