use cmdgate_api_models::RuleAction;
use cmdgate_console::state::ADMIN_REQUIRED;
use cmdgate_console::{ConsoleState, Tab};

use super::require_session;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_logs, render_rule_feedback, render_user_feedback};

fn require_admin(ctx: &AppContext) -> CliResult<()> {
    require_session(ctx)?;
    if ctx.console.with_state(ConsoleState::is_admin) {
        Ok(())
    } else {
        Err(CliError::validation(ADMIN_REQUIRED))
    }
}

pub(crate) async fn handle_logs(ctx: &AppContext) -> CliResult<()> {
    require_admin(ctx)?;
    if ctx.console.with_state(|state| state.tab) == Tab::AdminLogs {
        ctx.console.fetch_all_logs().await;
    } else {
        ctx.console
            .navigate(Tab::AdminLogs)
            .await
            .map_err(|err| CliError::validation(err.to_string()))?;
    }
    ctx.console
        .with_state(|state| render_logs(state, ctx.output))
}

pub(crate) async fn handle_rule(
    ctx: &AppContext,
    action: RuleAction,
    pattern: &str,
) -> CliResult<()> {
    require_admin(ctx)?;
    ctx.console.set_rule_pattern(pattern);
    ctx.console.set_rule_action(Some(action));
    ctx.console.add_rule().await;
    ctx.console.with_state(render_rule_feedback);
    Ok(())
}

/// The issued key is printed once and then dropped from the console state.
pub(crate) async fn handle_user(ctx: &AppContext, username: &str) -> CliResult<()> {
    require_admin(ctx)?;
    ctx.console.set_username_input(username);
    ctx.console.create_user().await;
    ctx.console.with_state(render_user_feedback);
    ctx.console.dismiss_created_user();
    Ok(())
}
