//! Console input language.
//!
//! Plain lines are commands for the gateway. Lines starting with `:` drive the
//! console itself; `::` escapes a command that really starts with a colon.

use cmdgate_api_models::RuleAction;
use cmdgate_console::Tab;

use crate::client::{CliError, CliResult};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConsoleInput {
    Empty,
    Submit(String),
    Login(Option<String>),
    Logout,
    WhoAmI,
    Refresh,
    Tab(Tab),
    Logs,
    Rule { action: RuleAction, pattern: String },
    User(String),
    Help,
    Quit,
}

pub(crate) const HELP: &str = "\
Type a command and press Enter to submit it to the gateway.

  :login [key]              sign in (prompts when the key is omitted)
  :logout                   sign out and forget the stored key
  :whoami                   show user, role, and credits
  :refresh                  reload credits and history
  :tab <name>               terminal | history | users | rules | logs
  :logs                     reload the audit log (admin)
  :rule <ACTION> <pattern>  add a rule, ACTION is AUTO_ACCEPT or AUTO_REJECT (admin)
  :user <name>              create a member and print their key (admin)
  :help                     show this help
  :quit                     leave the console

Start a command with :: to send a literal leading colon.";

/// Parse one line of input.
pub(crate) fn parse_line(line: &str) -> CliResult<ConsoleInput> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(ConsoleInput::Empty);
    }
    if let Some(escaped) = line.strip_prefix("::") {
        return Ok(ConsoleInput::Submit(format!(":{escaped}")));
    }
    let Some(directive) = line.trim_start().strip_prefix(':') else {
        return Ok(ConsoleInput::Submit(line.to_string()));
    };

    let (name, rest) = directive
        .trim()
        .split_once(char::is_whitespace)
        .map_or((directive.trim(), ""), |(name, rest)| (name, rest.trim()));

    match name.to_ascii_lowercase().as_str() {
        "login" => Ok(ConsoleInput::Login(
            (!rest.is_empty()).then(|| rest.to_string()),
        )),
        "logout" => Ok(ConsoleInput::Logout),
        "whoami" => Ok(ConsoleInput::WhoAmI),
        "refresh" => Ok(ConsoleInput::Refresh),
        "tab" => Tab::from_slug(rest).map(ConsoleInput::Tab).ok_or_else(|| {
            CliError::validation(
                "usage: :tab <terminal|history|users|rules|logs>",
            )
        }),
        "logs" => Ok(ConsoleInput::Logs),
        "rule" => parse_rule(rest),
        "user" if !rest.is_empty() => Ok(ConsoleInput::User(rest.to_string())),
        "user" => Err(CliError::validation("usage: :user <name>")),
        "help" | "?" => Ok(ConsoleInput::Help),
        "quit" | "exit" | "q" => Ok(ConsoleInput::Quit),
        other => Err(CliError::validation(format!(
            "unknown directive ':{other}' (try :help)"
        ))),
    }
}

fn parse_rule(rest: &str) -> CliResult<ConsoleInput> {
    let usage = || CliError::validation("usage: :rule <AUTO_ACCEPT|AUTO_REJECT> <pattern>");
    let (action, pattern) = rest.split_once(char::is_whitespace).ok_or_else(usage)?;
    let action = RuleAction::parse(action).ok_or_else(usage)?;
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(usage());
    }
    Ok(ConsoleInput::Rule {
        action,
        pattern: pattern.to_string(),
    })
}
