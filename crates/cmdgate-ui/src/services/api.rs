//! Gateway client over gloo-net.

use cmdgate_api_models::{
    API_KEY_HEADER, CommandRequest, CommandResponse, CreateUserRequest, CreateUserResponse,
    ErrorBody, ExecutionRecord, RuleRequest, Session,
};
use cmdgate_console::{Credential, Endpoint, GatewayApi, GatewayError};
use gloo_net::http::{Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Clone, Debug)]
pub(crate) struct GlooGateway {
    base_url: String,
}

impl GlooGateway {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn execute<B: Serialize>(
        &self,
        endpoint: Endpoint,
        credential: &Credential,
        body: Option<&B>,
    ) -> Result<Response, GatewayError> {
        let url = self.url(endpoint);
        let request = if endpoint.method() == "POST" {
            Request::post(&url)
        } else {
            Request::get(&url)
        }
        .header(API_KEY_HEADER, credential.expose());

        let sent = match body {
            Some(body) => {
                request
                    .json(body)
                    .map_err(|err| {
                        GatewayError::transport(format!(
                            "failed to encode {} body: {err}",
                            endpoint.path()
                        ))
                    })?
                    .send()
                    .await
            }
            None => request.send().await,
        };
        let response = sent.map_err(|err| {
            GatewayError::transport(format!("request to {} failed: {err}", endpoint.path()))
        })?;

        if response.ok() {
            Ok(response)
        } else {
            Err(classify_response(response).await)
        }
    }

    async fn fetch<T: DeserializeOwned, B: Serialize>(
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

async fn classify_response(response: Response) -> GatewayError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    GatewayError::from_status(status, ErrorBody::from_slice(text.as_bytes()))
}

impl GatewayApi for GlooGateway {
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
