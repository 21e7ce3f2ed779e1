// ── Desk error types ──
//
// Everything transport-specific stops at this boundary. Frontends match
// on these variants to decide what to do next (retry, re-authenticate,
// show a toast) and never see status codes, reqwest internals, or serde
// messages.

use thiserror::Error;

use dealdesk_api::Error as ApiError;

/// Every failure `dealdesk-core` hands to a frontend.
#[derive(Debug, Error)]
pub enum DeskError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Not connected to the backoffice API")]
    NotConnected,

    #[error("Cannot reach the backoffice API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication rejected: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Lookups ──────────────────────────────────────────────────────
    #[error("{resource} not found: {identifier}")]
    NotFound { resource: String, identifier: String },

    // ── Mutations ────────────────────────────────────────────────────
    #[error("The backoffice rejected the change: {message}")]
    ValidationFailed { message: String },

    #[error("Saving the order failed: {failed} of {total} updates did not go through")]
    OrderCommitFailed {
        failed: usize,
        total: usize,
        /// First underlying failure, kept for logging.
        first_error: String,
    },

    #[error("The session shut down before the command ran")]
    CommandDropped,

    // ── Everything else ──────────────────────────────────────────────
    #[error("Backoffice API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Internal failure: {0}")]
    Internal(String),
}

impl DeskError {
    /// True when signing in again could resolve the failure.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Folding transport errors into desk errors ────────────────────────

impl From<ApiError> for DeskError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(message) | ApiError::Unauthorized { message, .. } => {
                DeskError::AuthenticationFailed { message }
            }
            ApiError::Network(ref e) if e.is_timeout() => DeskError::Timeout,
            ApiError::Network(ref e) if e.is_connect() => {
                let url = match e.url() {
                    Some(u) => u.to_string(),
                    None => "(unknown)".into(),
                };
                DeskError::ConnectionFailed {
                    url,
                    reason: e.to_string(),
                }
            }
            ApiError::Network(e) => DeskError::Api {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            ApiError::NotFound { resource, id } => DeskError::NotFound {
                resource: resource.into(),
                identifier: id,
            },
            ApiError::Api { status, message } if status == 400 || status == 422 => {
                DeskError::ValidationFailed { message }
            }
            ApiError::Api { status, message } => DeskError::Api {
                message,
                status: Some(status),
            },
            ApiError::InvalidUrl(e) => DeskError::Config {
                message: format!("invalid base URL: {e}"),
            },
            ApiError::Tls(msg) => DeskError::ConnectionFailed {
                reason: format!("TLS setup failed: {msg}"),
                url: String::new(),
            },
            ApiError::Deserialization { context, detail } => {
                DeskError::Internal(format!("Unexpected response while {context}: {detail}"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejected_tokens_translate_to_auth_failures() {
        let err: DeskError = ApiError::Unauthorized {
            status: 401,
            message: "Unauthorized".into(),
        }
        .into();
        assert!(err.is_auth());
    }

    #[test]
    fn bad_request_becomes_validation() {
        let err: DeskError = ApiError::Api {
            status: 400,
            message: "name should not be empty".into(),
        }
        .into();
        match err {
            DeskError::ValidationFailed { message } => {
                assert_eq!(message, "name should not be empty");
            }
            other => panic!("expected ValidationFailed, got: {other:?}"),
        }
    }

    #[test]
    fn missing_resources_keep_their_identifier() {
        let err: DeskError = ApiError::NotFound {
            resource: "product",
            id: "p42".into(),
        }
        .into();
        assert_eq!(err.to_string(), "product not found: p42");
    }
}
