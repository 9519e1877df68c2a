//! Argument parsing, startup, and the read-eval loop.

use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use cmdgate_console::{ConsoleConfig, ConsoleController, FetchFailurePolicy};
use cmdgate_telemetry::{
    ConsoleSpanGuard, DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging,
};
use reqwest::Url;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::{AppContext, CliDependencies, CliError, CliResult, HttpGateway, parse_url};
use crate::commands::{
    handle_login, handle_logout, handle_logs, handle_refresh, handle_rule, handle_submit,
    handle_tab, handle_user, handle_whoami,
};
use crate::input::{ConsoleInput, HELP, parse_line};
use crate::output::{OutputFormat, render_notice, render_prompt, render_sign_in};
use crate::store::FileCredentialStore;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Parser, Debug)]
#[command(name = "cmdgate", about = "Operator console for the command gateway")]
pub(crate) struct Cli {
    #[arg(
        long,
        env = "CMDGATE_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        env = "CMDGATE_API_KEY",
        help = "Sign in with this key instead of the stored one"
    )]
    pub(crate) api_key: Option<String>,
    #[arg(
        long,
        env = "CMDGATE_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(long, env = "CMDGATE_CREDENTIAL_FILE")]
    pub(crate) credential_file: Option<PathBuf>,
    #[arg(
        long,
        value_enum,
        default_value_t = FetchFailures::Silent,
        help = "Whether failed background history loads raise a notice"
    )]
    pub(crate) fetch_failures: FetchFailures,
    #[arg(long, help = "Do not sign in with the stored key at startup")]
    pub(crate) no_resume: bool,
    #[arg(long, env = "CMDGATE_LOG", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[arg(long, env = "CMDGATE_LOG_FORMAT")]
    pub(crate) log_format: Option<LogFormat>,
    #[arg(
        long = "output",
        alias = "format",
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for history and audit log listings"
    )]
    pub(crate) output: OutputFormat,
}

/// `--fetch-failures` values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum FetchFailures {
    Silent,
    Surface,
}

impl From<FetchFailures> for FetchFailurePolicy {
    fn from(value: FetchFailures) -> Self {
        match value {
            FetchFailures::Silent => Self::Silent,
            FetchFailures::Surface => Self::Surface,
        }
    }
}

impl Cli {
    fn console_config(&self) -> ConsoleConfig {
        ConsoleConfig {
            fetch_failures: self.fetch_failures.into(),
            resume_session: !self.no_resume,
        }
    }
}

/// Parses CLI arguments, runs the interactive console on stdin, and returns
/// the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let trace_id = Uuid::new_v4().to_string();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_sha: build_sha(),
        ansi: true,
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("error: failed to initialise logging: {err:#}");
        return CliError::failure(err).exit_code();
    }
    let _span = ConsoleSpanGuard::enter(&trace_id);

    let result = async {
        let ctx = build_context(&cli, &trace_id)?;
        start(&ctx, cli.api_key.as_deref()).await?;
        drive(&ctx, BufReader::new(tokio::io::stdin())).await
    }
    .await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

pub(crate) fn build_context(cli: &Cli, trace_id: &str) -> CliResult<AppContext> {
    let deps = CliDependencies::new(cli.timeout, trace_id)?;
    let store = FileCredentialStore::resolve(cli.credential_file.clone())?;
    debug!(
        api_url = %cli.api_url,
        credential_file = %store.path().display(),
        "console configured"
    );
    let gateway = HttpGateway::new(deps.client, &cli.api_url);
    Ok(AppContext {
        console: ConsoleController::new(gateway, store, cli.console_config()),
        output: cli.output,
    })
}

/// Sign in with an explicit key, or resume from the credential store.
pub(crate) async fn start(ctx: &AppContext, api_key: Option<&str>) -> CliResult<()> {
    match api_key {
        Some(key) if key.trim().is_empty() => {
            return Err(CliError::validation(
                "API key cannot be empty (check --api-key or CMDGATE_API_KEY)",
            ));
        }
        Some(key) => ctx.console.authenticate(key).await,
        None => ctx.console.start().await,
    }
    ctx.console.with_state(render_sign_in);
    Ok(())
}

/// Read lines until EOF or `:quit`, dispatching each one.
pub(crate) async fn drive<R>(ctx: &AppContext, reader: R) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        ctx.console.with_state(render_prompt)?;
        let Some(line) = lines
            .next_line()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to read input: {err}")))?
        else {
            println!();
            break;
        };

        match parse_line(&line) {
            Ok(ConsoleInput::Quit) => break,
            Ok(input) => {
                if let Err(err) = dispatch(ctx, input).await {
                    eprintln!("error: {}", err.display_message());
                }
            }
            Err(err) => eprintln!("error: {}", err.display_message()),
        }

        if ctx.console.with_state(render_notice) {
            ctx.console.dismiss_notice();
        }
    }
    info!("console closed");
    Ok(())
}

async fn dispatch(ctx: &AppContext, input: ConsoleInput) -> CliResult<()> {
    match input {
        ConsoleInput::Empty => Ok(()),
        ConsoleInput::Submit(command) => handle_submit(ctx, &command).await,
        ConsoleInput::Login(key) => handle_login(ctx, key).await,
        ConsoleInput::Logout => {
            handle_logout(ctx);
            Ok(())
        }
        ConsoleInput::WhoAmI => {
            handle_whoami(ctx);
            Ok(())
        }
        ConsoleInput::Refresh => handle_refresh(ctx).await,
        ConsoleInput::Tab(tab) => handle_tab(ctx, tab).await,
        ConsoleInput::Logs => handle_logs(ctx).await,
        ConsoleInput::Rule { action, pattern } => handle_rule(ctx, action, &pattern).await,
        ConsoleInput::User(username) => handle_user(ctx, &username).await,
        ConsoleInput::Help => {
            println!("{HELP}");
            Ok(())
        }
        ConsoleInput::Quit => Ok(()),
    }
}
