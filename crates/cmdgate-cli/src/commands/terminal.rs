use cmdgate_console::Tab;

use super::require_session;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_login_error, render_outcome, render_view};

pub(crate) async fn handle_submit(ctx: &AppContext, command: &str) -> CliResult<()> {
    require_session(ctx)?;
    ctx.console.set_command_input(command);
    ctx.console.submit_command().await;
    ctx.console.with_state(|state| {
        if state.session.is_some() {
            render_outcome(state);
        } else {
            render_login_error(state);
        }
    });
    Ok(())
}

pub(crate) async fn handle_tab(ctx: &AppContext, tab: Tab) -> CliResult<()> {
    ctx.console
        .navigate(tab)
        .await
        .map_err(|err| CliError::validation(err.to_string()))?;
    ctx.console
        .with_state(|state| render_view(state, ctx.output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, mock_empty_history, mock_identity};
    use cmdgate_api_models::CommandStatus;
    use cmdgate_console::state::SESSION_EXPIRED;
    use httpmock::prelude::*;
    use serde_json::json;

    async fn member(server: &MockServer, dir: &tempfile::TempDir) -> AppContext {
        mock_identity(
            server,
            "member-key",
            json!({"username": "alice", "role": "member", "credits": 10}),
        );
        mock_empty_history(server);
        let ctx = context(server, &dir.path().join("key"));
        ctx.console.authenticate("member-key").await;
        ctx
    }

    #[tokio::test]
    async fn submission_requires_a_session() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context(&server, &dir.path().join("key"));
        let err = handle_submit(&ctx, "ls").await.expect_err("signed out");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn rejected_command_shows_gateway_message() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = member(&server, &dir).await;
        server.mock(|when, then| {
            when.method(POST).path("/api/commands");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"status": "rejected", "message": "blocked by rule"}));
        });

        handle_submit(&ctx, "rm -rf /").await.expect("submit");

        let outcome = ctx
            .console
            .with_state(|state| state.outcome.clone())
            .expect("outcome");
        assert_eq!(outcome.status, CommandStatus::Rejected);
        assert_eq!(outcome.message, "blocked by rule");
    }

    #[tokio::test]
    async fn expired_key_during_submission_signs_out() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = member(&server, &dir).await;
        server.mock(|when, then| {
            when.method(POST).path("/api/commands");
            then.status(401);
        });

        handle_submit(&ctx, "ls").await.expect("submit");

        assert!(!ctx.console.is_authenticated());
        assert_eq!(
            ctx.console
                .with_state(|state| state.notice.as_ref().map(|notice| notice.message.clone())),
            Some(SESSION_EXPIRED.to_string())
        );
    }

    #[tokio::test]
    async fn members_cannot_open_admin_tabs() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = member(&server, &dir).await;

        let err = handle_tab(&ctx, Tab::AdminUsers).await.expect_err("gated");
        assert_eq!(err.display_message(), "User Management requires the admin role");
        handle_tab(&ctx, Tab::History).await.expect("history");
        assert_eq!(ctx.console.with_state(|state| state.tab), Tab::History);
    }
}
