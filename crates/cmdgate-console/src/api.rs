//! Transport seam between the controller and the gateway.

use cmdgate_api_models::{
    CommandRequest, CommandResponse, CreateUserRequest, CreateUserResponse, ExecutionRecord,
    PATH_ADMIN_LOGS, PATH_ADMIN_RULES, PATH_ADMIN_USERS, PATH_COMMANDS, PATH_ME, PATH_MY_HISTORY,
    RuleRequest, Session,
};

use crate::credential::Credential;
use crate::error::GatewayError;

/// Gateway operations used by the console.
///
/// Every call carries the credential explicitly; implementations attach it as
/// the `x-api-key` header and classify non-2xx responses with
/// [`GatewayError::from_status`]. Futures are not required to be `Send` so the
/// browser client can hold `Rc` state.
#[allow(async_fn_in_trait)]
pub trait GatewayApi {
    /// `GET /me`: resolve the identity behind a credential.
    async fn me(&self, credential: &Credential) -> Result<Session, GatewayError>;

    /// `GET /my-history`: the caller's own execution records.
    async fn my_history(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ExecutionRecord>, GatewayError>;

    /// `POST /commands`: submit a command for evaluation.
    async fn submit_command(
        &self,
        credential: &Credential,
        request: &CommandRequest,
    ) -> Result<CommandResponse, GatewayError>;

    /// `GET /admin/logs`: every user's execution records.
    async fn admin_logs(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ExecutionRecord>, GatewayError>;

    /// `POST /admin/rules`: create an auto-accept or auto-reject rule.
    async fn create_rule(
        &self,
        credential: &Credential,
        request: &RuleRequest,
    ) -> Result<(), GatewayError>;

    /// `POST /admin/users`: create a member and issue their key.
    async fn create_user(
        &self,
        credential: &Credential,
        request: &CreateUserRequest,
    ) -> Result<CreateUserResponse, GatewayError>;
}

/// Gateway endpoints, for logging and call accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /me`
    Me,
    /// `GET /my-history`
    MyHistory,
    /// `POST /commands`
    Commands,
    /// `GET /admin/logs`
    AdminLogs,
    /// `POST /admin/rules`
    AdminRules,
    /// `POST /admin/users`
    AdminUsers,
}

impl Endpoint {
    /// Path relative to the API base.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Me => PATH_ME,
            Self::MyHistory => PATH_MY_HISTORY,
            Self::Commands => PATH_COMMANDS,
            Self::AdminLogs => PATH_ADMIN_LOGS,
            Self::AdminRules => PATH_ADMIN_RULES,
            Self::AdminUsers => PATH_ADMIN_USERS,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::Me | Self::MyHistory | Self::AdminLogs => "GET",
            Self::Commands | Self::AdminRules | Self::AdminUsers => "POST",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_pair_methods_with_paths() {
        assert_eq!(Endpoint::Me.path(), "/me");
        assert_eq!(Endpoint::Me.method(), "GET");
        assert_eq!(Endpoint::AdminUsers.path(), "/admin/users");
        assert_eq!(Endpoint::Commands.method(), "POST");
    }
}
