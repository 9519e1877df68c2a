//! HTTP gateway client, CLI error type, and shared dependencies.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use cmdgate_api_models::{
    API_KEY_HEADER, CommandRequest, CommandResponse, CreateUserRequest, CreateUserResponse,
    ErrorBody, ExecutionRecord, RuleRequest, Session,
};
use cmdgate_console::{ConsoleController, Credential, Endpoint, GatewayApi, GatewayError};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::output::OutputFormat;
use crate::store::FileCredentialStore;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Dependencies constructed from CLI options.
#[derive(Clone)]
pub(crate) struct CliDependencies {
    pub(crate) client: Client,
}

impl CliDependencies {
    /// Build an HTTP client that tags every request with the process trace id.
    pub(crate) fn new(timeout_secs: u64, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self { client })
    }
}

/// Controller type driven by the terminal console.
pub(crate) type Console = ConsoleController<HttpGateway, FileCredentialStore>;

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) console: Console,
    pub(crate) output: OutputFormat,
}

/// Gateway client over reqwest.
#[derive(Clone)]
pub(crate) struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub(crate) fn new(client: Client, base_url: &Url) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn execute<B: Serialize + Sync>(
        &self,
        endpoint: Endpoint,
        credential: &Credential,
        body: Option<&B>,
    ) -> Result<Response, GatewayError> {
        let method = if endpoint.method() == "POST" {
            Method::POST
        } else {
            Method::GET
        };
        debug!(method = endpoint.method(), path = endpoint.path(), "gateway request");
        let mut request = self
            .client
            .request(method, self.url(endpoint))
            .header(API_KEY_HEADER, credential.expose());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|err| {
            GatewayError::transport(format!("request to {} failed: {err}", endpoint.path()))
        })?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(classify_response(response).await)
        }
    }

    async fn fetch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: Endpoint,
        credential: &Credential,
        body: Option<&B>,
    ) -> Result<T, GatewayError> {
        let response = self.execute(endpoint, credential, body).await?;
        response.json::<T>().await.map_err(|err| {
            GatewayError::transport(format!(
                "failed to parse {} response: {err}",
                endpoint.path()
            ))
        })
    }
}

/// Classify a non-2xx response, tolerating bodies that are not JSON.
pub(crate) async fn classify_response(response: Response) -> GatewayError {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.unwrap_or_default();
    GatewayError::from_status(status, ErrorBody::from_slice(&bytes))
}

impl GatewayApi for HttpGateway {
    async fn me(&self, credential: &Credential) -> Result<Session, GatewayError> {
        self.fetch(Endpoint::Me, credential, None::<&()>).await
    }

    async fn my_history(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ExecutionRecord>, GatewayError> {
        self.fetch(Endpoint::MyHistory, credential, None::<&()>)
            .await
    }

    async fn submit_command(
        &self,
        credential: &Credential,
        request: &CommandRequest,
    ) -> Result<CommandResponse, GatewayError> {
        self.fetch(Endpoint::Commands, credential, Some(request))
            .await
    }

    async fn admin_logs(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ExecutionRecord>, GatewayError> {
        self.fetch(Endpoint::AdminLogs, credential, None::<&()>)
            .await
    }

    async fn create_rule(
        &self,
        credential: &Credential,
        request: &RuleRequest,
    ) -> Result<(), GatewayError> {
        self.execute(Endpoint::AdminRules, credential, Some(request))
            .await
            .map(drop)
    }

    async fn create_user(
        &self,
        credential: &Credential,
        request: &CreateUserRequest,
    ) -> Result<CreateUserResponse, GatewayError> {
        self.fetch(Endpoint::AdminUsers, credential, Some(request))
            .await
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdgate_api_models::{ActionTaken, CommandStatus, Role, RuleAction};
    use httpmock::prelude::*;
    use serde_json::json;

    fn gateway(server: &MockServer) -> HttpGateway {
        let base = parse_url(&format!("{}/api/", server.base_url())).expect("valid URL");
        let deps = CliDependencies::new(5, "trace-1").expect("client");
        HttpGateway::new(deps.client, &base)
    }

    fn key() -> Credential {
        Credential::parse("member-key").expect("credential")
    }

    #[test]
    fn cli_error_exit_codes_distinguish_validation() {
        assert_eq!(CliError::validation("bad flag").exit_code(), 2);
        let failure = CliError::failure(anyhow!("boom"));
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(failure.display_message(), "boom");
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("not a url").is_err());
        assert!(parse_url("http://localhost:5000/api").is_ok());
    }

    #[tokio::test]
    async fn me_sends_credential_and_trace_headers() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/me")
                .header("x-api-key", "member-key")
                .header("x-request-id", "trace-1");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"username": "alice", "role": "member", "credits": 7}));
        });

        let session = gateway(&server).me(&key()).await.expect("session");
        mock.assert();
        assert_eq!(session.username, "alice");
        assert_eq!(session.role, Role::Member);
        assert_eq!(session.credits, 7);
    }

    #[tokio::test]
    async fn command_submission_posts_json_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/commands")
                .json_body(json!({"command": "rm -rf /"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"status": "rejected", "message": "blocked by rule"}));
        });

        let response = gateway(&server)
            .submit_command(
                &key(),
                &CommandRequest {
                    command: "rm -rf /".into(),
                },
            )
            .await
            .expect("response");
        mock.assert();
        assert_eq!(response.status, CommandStatus::Rejected);
        assert_eq!(response.message, "blocked by rule");
    }

    #[tokio::test]
    async fn history_decodes_camel_case_records() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/my-history");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([
                    {"command": "ls", "timestamp": "2024-05-01T10:00:00Z", "actionTaken": "ACCEPTED"}
                ]));
        });

        let records = gateway(&server).my_history(&key()).await.expect("records");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action_taken, ActionTaken::Accepted);
    }

    #[tokio::test]
    async fn error_statuses_are_classified() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/admin/rules");
            then.status(400)
                .header("content-type", "application/json")
                .json_body(json!({"error": "Invalid regex"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/logs");
            then.status(403).body("forbidden");
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/me");
            then.status(401);
        });

        let gateway = gateway(&server);
        let rule = RuleRequest {
            pattern: "(".into(),
            action: RuleAction::AutoReject,
        };
        let err = gateway.create_rule(&key(), &rule).await.expect_err("400");
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.server_error(), Some("Invalid regex"));

        let err = gateway.admin_logs(&key()).await.expect_err("403");
        assert_eq!(err.kind(), "authorization");
        assert_eq!(err.body(), &ErrorBody::default());

        assert!(gateway.me(&key()).await.expect_err("401").is_authentication());
    }

    #[tokio::test]
    async fn unreachable_gateway_is_a_transport_error() {
        let base = parse_url("http://127.0.0.1:9/api").expect("valid URL");
        let deps = CliDependencies::new(1, "trace-2").expect("client");
        let gateway = HttpGateway::new(deps.client, &base);
        let err = gateway.me(&key()).await.expect_err("refused");
        assert_eq!(err.kind(), "transport");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn created_user_key_is_decoded() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/admin/users")
                .json_body(json!({"username": "bob"}));
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!({"apiKey": "bob-key"}));
        });

        let created = gateway(&server)
            .create_user(
                &key(),
                &CreateUserRequest {
                    username: "bob".into(),
                },
            )
            .await
            .expect("created");
        assert_eq!(created.api_key, "bob-key");
    }
}
