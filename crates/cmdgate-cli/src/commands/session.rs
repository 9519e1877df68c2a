use anyhow::anyhow;
use cmdgate_console::Tab;
use futures_util::future::join;

use super::require_session;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_history, render_session, render_sign_in};

pub(crate) async fn handle_login(ctx: &AppContext, key: Option<String>) -> CliResult<()> {
    let key = match key {
        Some(key) => key,
        None => prompt_key().await?,
    };
    ctx.console.set_credential_input(&key);
    ctx.console.login().await;
    ctx.console.with_state(render_sign_in);
    Ok(())
}

async fn prompt_key() -> CliResult<String> {
    tokio::task::spawn_blocking(|| rpassword::prompt_password("API key: "))
        .await
        .map_err(|err| CliError::failure(anyhow!("API key prompt was interrupted: {err}")))?
        .map_err(|err| CliError::failure(anyhow!("failed to read API key: {err}")))
}

pub(crate) fn handle_logout(ctx: &AppContext) {
    ctx.console.logout();
}

pub(crate) fn handle_whoami(ctx: &AppContext) {
    ctx.console.with_state(render_session);
}

pub(crate) async fn handle_refresh(ctx: &AppContext) -> CliResult<()> {
    require_session(ctx)?;
    join(ctx.console.refresh_credits(), ctx.console.fetch_my_history()).await;
    ctx.console.with_state(|state| {
        render_session(state);
        if state.session.is_some() && state.tab == Tab::History {
            render_history(state, ctx.output)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, mock_empty_history, mock_identity};
    use cmdgate_console::CredentialStore;
    use cmdgate_console::state::INVALID_CREDENTIAL;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn login_persists_the_key() {
        let server = MockServer::start_async().await;
        mock_identity(
            &server,
            "member-key",
            json!({"username": "alice", "role": "member", "credits": 10}),
        );
        mock_empty_history(&server);
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context(&server, &dir.path().join("key"));

        handle_login(&ctx, Some("member-key".into()))
            .await
            .expect("login");

        assert!(ctx.console.is_authenticated());
        assert_eq!(
            ctx.console
                .credential_store()
                .load()
                .map(|key| key.expose().to_string()),
            Some("member-key".to_string())
        );
    }

    #[tokio::test]
    async fn rejected_key_reports_and_clears_store() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/me");
            then.status(401);
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("key");
        std::fs::write(&path, "old-key").expect("seed");
        let ctx = context(&server, &path);

        handle_login(&ctx, Some("wrong".into())).await.expect("login runs");

        assert!(!ctx.console.is_authenticated());
        assert_eq!(
            ctx.console.with_state(|state| state.login.error.clone()),
            Some(INVALID_CREDENTIAL.to_string())
        );
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn refresh_requires_a_session() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context(&server, &dir.path().join("key"));
        let err = handle_refresh(&ctx).await.expect_err("signed out");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn refresh_updates_credits() {
        let server = MockServer::start_async().await;
        let mut first = server.mock(|when, then| {
            when.method(GET).path("/api/me");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"username": "alice", "role": "member", "credits": 10}));
        });
        mock_empty_history(&server);
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context(&server, &dir.path().join("key"));
        handle_login(&ctx, Some("member-key".into()))
            .await
            .expect("login");

        first.delete();
        mock_identity(
            &server,
            "member-key",
            json!({"username": "alice", "role": "member", "credits": 9}),
        );
        handle_refresh(&ctx).await.expect("refresh");

        assert_eq!(
            ctx.console
                .with_state(|state| state.session.as_ref().map(|session| session.credits)),
            Some(9)
        );
        handle_logout(&ctx);
        handle_logout(&ctx);
        assert!(!ctx.console.is_authenticated());
    }
}
