//! Input handlers grouped by concern.

mod admin;
mod session;
mod terminal;

pub(crate) use admin::{handle_logs, handle_rule, handle_user};
pub(crate) use session::{handle_login, handle_logout, handle_refresh, handle_whoami};
pub(crate) use terminal::{handle_submit, handle_tab};

use crate::client::{AppContext, CliError, CliResult};

fn require_session(ctx: &AppContext) -> CliResult<()> {
    if ctx.console.is_authenticated() {
        Ok(())
    } else {
        Err(CliError::validation("not signed in (use :login)"))
    }
}
