//! Output renderers and formatting helpers for the terminal console.

use std::io::{self, Write};

use anyhow::anyhow;
use clap::ValueEnum;
use cmdgate_console::views::{
    self, EMPTY_HISTORY, EMPTY_LOGS, HistoryRow, LogRow, TERMINAL_PLACEHOLDER,
};
use cmdgate_console::{ConsoleState, NoticeKind, Screen, Tab};

use crate::client::{CliError, CliResult};

/// Rendering for tabular views.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub(crate) fn render_prompt(state: &ConsoleState) -> CliResult<()> {
    let prompt = match views::session_badge(state) {
        Some(badge) => format!(
            "{}@cmdgate [{}] {}> ",
            badge.username,
            badge.credits,
            state.tab.slug()
        ),
        None => "cmdgate (signed out)> ".to_string(),
    };
    let mut stdout = io::stdout().lock();
    write!(stdout, "{prompt}")
        .and_then(|()| stdout.flush())
        .map_err(|err| CliError::failure(anyhow!("failed to write prompt: {err}")))
}

pub(crate) fn render_session(state: &ConsoleState) {
    match views::session_badge(state) {
        Some(badge) => {
            println!("user: {}", badge.username);
            println!("role: {}", badge.role_label);
            println!("credits: {}", badge.credits);
        }
        None => println!("not signed in (use :login)"),
    }
}

pub(crate) fn render_login_error(state: &ConsoleState) {
    if let Some(error) = &state.login.error {
        println!("login failed: {error}");
    }
}

/// Report the result of a sign-in attempt.
pub(crate) fn render_sign_in(state: &ConsoleState) {
    if state.login.error.is_some() {
        render_login_error(state);
        return;
    }
    render_session(state);
    if state.session.is_some() {
        render_nav(state);
    }
}

pub(crate) fn render_notice(state: &ConsoleState) -> bool {
    let Some(notice) = &state.notice else {
        return false;
    };
    let label = match notice.kind {
        NoticeKind::Info => "info",
        NoticeKind::Error => "error",
    };
    println!("[{label}] {}", notice.message);
    true
}

pub(crate) fn render_nav(state: &ConsoleState) {
    let items = views::nav_items(state);
    let tabs: Vec<String> = items
        .iter()
        .map(|item| {
            if item.active {
                format!("[{}]", item.tab.slug())
            } else {
                item.tab.slug().to_string()
            }
        })
        .collect();
    println!("tabs: {}", tabs.join("  "));
}

pub(crate) fn render_outcome(state: &ConsoleState) {
    match views::terminal_line(state) {
        Some(line) => println!("{}", line.render()),
        None => println!("{TERMINAL_PLACEHOLDER}"),
    }
}

pub(crate) fn render_history(state: &ConsoleState, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&state.my_history),
        OutputFormat::Table => {
            let rows = views::history_rows(state);
            if rows.is_empty() {
                println!("{EMPTY_HISTORY}");
                return Ok(());
            }
            println!("{:<19} {:<10} COMMAND", "TIME", "ACTION");
            for HistoryRow {
                command,
                time_label,
                action_label,
                ..
            } in rows
            {
                println!("{time_label:<19} {action_label:<10} {command}");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_logs(state: &ConsoleState, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&state.all_logs),
        OutputFormat::Table => {
            let rows = views::log_rows(state);
            if rows.is_empty() {
                println!("{EMPTY_LOGS}");
                return Ok(());
            }
            println!("{:<16} {:<19} {:<10} COMMAND", "USER", "TIME", "ACTION");
            for LogRow {
                user,
                command,
                action_label,
                time_label,
                ..
            } in rows
            {
                println!("{user:<16} {time_label:<19} {action_label:<10} {command}");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_rule_feedback(state: &ConsoleState) {
    let form = &state.rule_form;
    if let Some(confirmation) = &form.confirmation {
        println!("{confirmation}");
    }
    if let Some(error) = &form.error {
        println!("error: {error}");
    }
}

pub(crate) fn render_user_feedback(state: &ConsoleState) {
    if let Some(panel) = views::created_key_panel(state) {
        println!("created user: {}", panel.username);
        println!("api key: {}", panel.key);
        println!("{}", panel.warning);
    }
    if let Some(error) = &state.user_form.error {
        println!("error: {error}");
    }
}

/// Render whatever the active tab shows.
pub(crate) fn render_view(state: &ConsoleState, format: OutputFormat) -> CliResult<()> {
    let Screen::Console(tab) = state.screen() else {
        println!("not signed in (use :login)");
        return Ok(());
    };
    println!("== {} ==", tab.title());
    match tab {
        Tab::Terminal => render_outcome(state),
        Tab::History => render_history(state, format)?,
        Tab::AdminUsers => {
            println!("use :user <name> to create a member");
            render_user_feedback(state);
        }
        Tab::AdminRules => {
            println!("use :rule <AUTO_ACCEPT|AUTO_REJECT> <pattern> to add a rule");
            render_rule_feedback(state);
        }
        Tab::AdminLogs => render_logs(state, format)?,
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdgate_api_models::{ActionTaken, ExecutionRecord, Role, Session};

    fn admin_state() -> ConsoleState {
        let mut state = ConsoleState::default();
        state.session = Some(Session {
            username: "root".into(),
            role: Role::Admin,
            credits: 100,
        });
        state.all_logs = vec![ExecutionRecord {
            command: "ls".into(),
            timestamp: "2024-05-01T10:00:00Z".into(),
            action_taken: ActionTaken::Accepted,
            user: Some("alice".into()),
        }];
        state
    }

    #[test]
    fn renders_every_tab_without_error() {
        let mut state = admin_state();
        for tab in Tab::all() {
            state.tab = tab;
            render_view(&state, OutputFormat::Table).expect("table");
            render_view(&state, OutputFormat::Json).expect("json");
        }
        render_nav(&state);
        render_sign_in(&state);
    }

    #[test]
    fn signed_out_views_render_hint() {
        let state = ConsoleState::default();
        render_view(&state, OutputFormat::Table).expect("render");
        assert!(!render_notice(&state));
    }
}
