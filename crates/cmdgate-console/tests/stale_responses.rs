use cmdgate_api_models::{ActionTaken, CommandResponse, CommandStatus, RuleAction};
use cmdgate_console::{Endpoint, Screen, Tab};
use cmdgate_test_support::fixtures::{
    ADMIN_KEY, MEMBER_KEY, admin_session, log_record, member_session, record,
};
use cmdgate_test_support::{FakeGateway, console, signed_in};
use futures_util::future::join;

#[tokio::test]
async fn logs_arriving_after_leaving_the_view_are_discarded() {
    let (gateway, console) = signed_in(admin_session(), ADMIN_KEY).await;
    gateway.set_admin_logs(Ok(vec![log_record("bob", "ls", ActionTaken::Accepted)]));
    let release = gateway.hold(Endpoint::AdminLogs);

    let leave = async {
        console.select_tab(Tab::Terminal).expect("terminal");
        let _ = release.send(());
    };
    let (navigated, ()) = join(console.navigate(Tab::AdminLogs), leave).await;

    navigated.expect("admin may open logs");
    let state = console.snapshot();
    assert_eq!(state.tab, Tab::Terminal);
    assert!(state.all_logs.is_empty());
}

#[tokio::test]
async fn history_arriving_after_logout_is_discarded() {
    let (gateway, console) = signed_in(member_session(), MEMBER_KEY).await;
    gateway.set_my_history(Ok(vec![record("ls", ActionTaken::Accepted)]));
    let release = gateway.hold(Endpoint::MyHistory);

    let leave = async {
        console.logout();
        let _ = release.send(());
    };
    join(console.fetch_my_history(), leave).await;

    let state = console.snapshot();
    assert_eq!(state.screen(), Screen::Login);
    assert!(state.my_history.is_empty());
}

#[tokio::test]
async fn identity_resolved_after_logout_does_not_sign_in() {
    let gateway = FakeGateway::signed_in_as(member_session());
    let console = console(&gateway);
    let release = gateway.hold(Endpoint::Me);

    let leave = async {
        console.logout();
        let _ = release.send(());
    };
    join(console.authenticate(MEMBER_KEY), leave).await;

    assert_eq!(console.snapshot().screen(), Screen::Login);
    assert!(console.credential_store().stored().is_none());
    assert_eq!(gateway.count(Endpoint::MyHistory), 0);
}

#[tokio::test]
async fn issued_key_arriving_after_leaving_the_view_is_dropped() {
    let (gateway, console) = signed_in(admin_session(), ADMIN_KEY).await;
    console.navigate(Tab::AdminUsers).await.expect("users");
    console.set_username_input("bob");
    let release = gateway.hold(Endpoint::AdminUsers);

    let leave = async {
        console.select_tab(Tab::History).expect("history");
        let _ = release.send(());
    };
    join(console.create_user(), leave).await;
    assert!(console.snapshot().created_user.is_none());

    console.navigate(Tab::AdminUsers).await.expect("users");
    assert!(console.snapshot().created_user.is_none());
    assert_eq!(gateway.count(Endpoint::AdminUsers), 1);
}

#[tokio::test]
async fn member_created_after_leaving_the_view_clears_the_username() {
    let (gateway, console) = signed_in(admin_session(), ADMIN_KEY).await;
    console.navigate(Tab::AdminUsers).await.expect("users");
    console.set_username_input("bob");
    let release = gateway.hold(Endpoint::AdminUsers);

    let leave = async {
        console.select_tab(Tab::Terminal).expect("terminal");
        let _ = release.send(());
    };
    join(console.create_user(), leave).await;

    console.navigate(Tab::AdminUsers).await.expect("users");
    let state = console.snapshot();
    assert!(state.user_form.username.is_empty());
    assert!(state.user_form.error.is_none());
    assert!(state.created_user.is_none());
}

#[tokio::test]
async fn rule_created_after_leaving_the_view_clears_the_form() {
    let (gateway, console) = signed_in(admin_session(), ADMIN_KEY).await;
    console.navigate(Tab::AdminRules).await.expect("rules");
    console.set_rule_pattern("^rm -rf");
    console.set_rule_action(Some(RuleAction::AutoReject));
    let release = gateway.hold(Endpoint::AdminRules);

    let leave = async {
        console.select_tab(Tab::Terminal).expect("terminal");
        let _ = release.send(());
    };
    join(console.add_rule(), leave).await;

    console.navigate(Tab::AdminRules).await.expect("rules");
    let form = console.snapshot().rule_form;
    assert!(form.pattern.is_empty());
    assert_eq!(form.action, None);
    assert!(form.confirmation.is_none());
    assert!(form.error.is_none());
    assert_eq!(gateway.count(Endpoint::AdminRules), 1);
}

#[tokio::test]
async fn command_outcome_after_logout_is_discarded() {
    let (gateway, console) = signed_in(member_session(), MEMBER_KEY).await;
    gateway.push_command(Ok(CommandResponse {
        status: CommandStatus::Accepted,
        message: "late".to_string(),
    }));
    let release = gateway.hold(Endpoint::Commands);
    console.set_command_input("ls");

    let leave = async {
        console.logout();
        let _ = release.send(());
    };
    join(console.submit_command(), leave).await;

    let state = console.snapshot();
    assert!(state.outcome.is_none());
    assert_eq!(state.pending_commands, 0);
    assert_eq!(gateway.count(Endpoint::Me), 0);
}
