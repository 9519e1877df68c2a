//! Error taxonomy for gateway calls and navigation.

use cmdgate_api_models::ErrorBody;
use thiserror::Error;

use crate::router::Tab;

/// Failure of a single gateway call, classified by how the console reacts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The credential is missing, wrong, or revoked. Ends the session.
    #[error("credential rejected by the gateway")]
    Authentication {
        /// HTTP status returned by the gateway.
        status: u16,
        /// Decoded error document.
        body: ErrorBody,
    },
    /// The caller lacks the admin role.
    #[error("administrator role required")]
    Authorization {
        /// HTTP status returned by the gateway.
        status: u16,
        /// Decoded error document.
        body: ErrorBody,
    },
    /// Malformed request, caught client-side or rejected by the gateway.
    #[error("{message}")]
    Validation {
        /// HTTP status when the gateway rejected the request.
        status: Option<u16>,
        /// Human-readable reason.
        message: String,
        /// Decoded error document; empty for client-side checks.
        body: ErrorBody,
    },
    /// Network failure, server error, or an undecodable response.
    #[error("gateway unavailable: {detail}")]
    Transport {
        /// HTTP status when a response was received.
        status: Option<u16>,
        /// Diagnostic detail.
        detail: String,
        /// Decoded error document, when one was sent.
        body: ErrorBody,
    },
}

impl GatewayError {
    /// Classify a non-2xx response.
    #[must_use]
    pub fn from_status(status: u16, body: ErrorBody) -> Self {
        match status {
            401 => Self::Authentication { status, body },
            403 => Self::Authorization { status, body },
            400..=499 => {
                let message = body
                    .error
                    .clone()
                    .or_else(|| body.message.clone())
                    .unwrap_or_else(|| format!("request rejected (status {status})"));
                Self::Validation {
                    status: Some(status),
                    message,
                    body,
                }
            }
            _ => Self::Transport {
                status: Some(status),
                detail: format!("status {status}"),
                body,
            },
        }
    }

    /// Client-side validation failure; no request was sent.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            status: None,
            message: message.into(),
            body: ErrorBody::default(),
        }
    }

    /// Connection-level failure or undecodable response.
    #[must_use]
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            detail: detail.into(),
            body: ErrorBody::default(),
        }
    }

    /// Whether the failure invalidates the current credential.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Authorization { status, .. } => {
                Some(*status)
            }
            Self::Validation { status, .. } | Self::Transport { status, .. } => *status,
        }
    }

    /// Error document attached to the failure.
    #[must_use]
    pub const fn body(&self) -> &ErrorBody {
        match self {
            Self::Authentication { body, .. }
            | Self::Authorization { body, .. }
            | Self::Validation { body, .. }
            | Self::Transport { body, .. } => body,
        }
    }

    /// The body's `message` field.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        self.body().message.as_deref()
    }

    /// The body's `error` field.
    #[must_use]
    pub fn server_error(&self) -> Option<&str> {
        self.body().error.as_deref()
    }

    /// Short label for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::Authorization { .. } => "authorization",
            Self::Validation { .. } => "validation",
            Self::Transport { .. } => "transport",
        }
    }
}

/// Refused tab selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// No session is active.
    #[error("sign in to open {0}")]
    NotAuthenticated(Tab),
    /// The tab is reserved for administrators.
    #[error("{0} requires the admin role")]
    AdminRequired(Tab),
}
