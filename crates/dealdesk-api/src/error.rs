//! Error types for the Dealdesk API client.

use thiserror::Error;

/// Errors produced by the API and identity clients.
#[derive(Debug, Error)]
pub enum Error {
    /// The base or identity URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// TLS material could not be loaded or parsed.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// Transport-level failure: connection refused, DNS, TLS, timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The identity provider rejected a sign-in or token refresh.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The API rejected our bearer token (401/403).
    #[error("not authorized (status {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// A referenced resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Any other non-2xx application response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("unexpected response while {context}: {detail}")]
    Deserialization { context: String, detail: String },
}

impl Error {
    /// True when the request failed before the server produced an answer,
    /// or the failure is plausibly transient (5xx, timeout).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// True when the session token was rejected and a re-login could help.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Rewrite a generic 404 into a typed `NotFound` for single-resource
    /// getters, where the missing id is known.
    pub(crate) fn or_not_found(self, resource: &'static str, id: &str) -> Self {
        match self {
            Self::Api { status: 404, .. } => Self::NotFound {
                resource,
                id: id.to_owned(),
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
