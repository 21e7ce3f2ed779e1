//! CLI error types with miette diagnostics.
//!
//! Maps `DeskError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use dealdesk_config::ConfigError;
use dealdesk_core::DeskError;
use miette::Diagnostic;
use thiserror::Error;

/// Stable exit codes, one per failure family.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const API: i32 = 5;
    pub const IO: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the marketplace API at {url}")]
    #[diagnostic(
        code(dealdesk::connection_failed),
        help(
            "Check that the API is reachable from this machine.\n\
             URL: {url}\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(dealdesk::timeout),
        help("Increase the limit with --timeout <SECS> or the profile's timeout_secs.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(dealdesk::auth_failed),
        help(
            "The identity provider rejected the stored credentials.\n\
             Sign in again with: dealdesk login"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(dealdesk::no_credentials),
        help(
            "Sign in with: dealdesk login --profile {profile}\n\
             Or set DEALDESK_TOKEN / DEALDESK_REFRESH_TOKEN in the environment."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(dealdesk::not_found),
        help("Run: dealdesk {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(code(dealdesk::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    #[error("Saving the order failed: {failed} of {total} updates did not go through")]
    #[diagnostic(
        code(dealdesk::order_commit),
        help(
            "The listing is now partially reordered. Re-run the save once the\n\
             API recovers; every position is re-sent.\n\
             First failure: {first_error}"
        )
    )]
    OrderCommit {
        failed: usize,
        total: usize,
        first_error: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(dealdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(dealdesk::profile_not_found),
        help(
            "Check [profiles.{name}] in the config file.\n\
             Path: dealdesk config path"
        )
    )]
    ProfileNotFound { name: String },

    #[error(transparent)]
    #[diagnostic(code(dealdesk::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(dealdesk::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ConnectionFailed { .. }
            | Self::Timeout
            | Self::ApiError { .. }
            | Self::OrderCommit { .. } => exit_code::API,
            Self::Io(_) | Self::Json(_) => exit_code::IO,
        }
    }
}

// ── DeskError → CliError mapping ─────────────────────────────────────

impl From<DeskError> for CliError {
    fn from(err: DeskError) -> Self {
        match err {
            DeskError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            DeskError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            // The CLI connects once per invocation, so a lost session is a
            // connection failure from the user's point of view.
            DeskError::NotConnected | DeskError::CommandDropped => CliError::ConnectionFailed {
                url: "(session)".into(),
                reason: "the session closed before the request completed".into(),
            },

            DeskError::Timeout => CliError::Timeout,

            DeskError::NotFound {
                resource,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(&resource),
                resource_type: resource,
                identifier,
            },

            DeskError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            DeskError::OrderCommitFailed {
                failed,
                total,
                first_error,
            } => CliError::OrderCommit {
                failed,
                total,
                first_error,
            },

            DeskError::Api { message, status } => CliError::ApiError { message, status },

            DeskError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            DeskError::Internal(message) => CliError::ApiError {
                message,
                status: None,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoSuchProfile { name } => CliError::ProfileNotFound { name },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

/// The `list` invocation that would show the missing resource.
fn list_command_for(resource: &str) -> String {
    match resource {
        "category" => "categories list".into(),
        "product" => "products list".into(),
        "variant" => "products variants <PRODUCT>".into(),
        "vendor" => "vendors list".into(),
        "influencer" => "influencers list".into(),
        "redemption" => "coupons list".into(),
        "deal" => "deals top".into(),
        "order" => "orders list".into(),
        "plan" => "plans list".into(),
        "media" => "gallery list".into(),
        other => format!("{other}s list"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_failure_family() {
        let auth = CliError::AuthFailed { message: "bad token".into() };
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let missing = CliError::NotFound {
            resource_type: "deal".into(),
            identifier: "d1".into(),
            list_command: "deals top".into(),
        };
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let api = CliError::ApiError { message: "boom".into(), status: Some(500) };
        assert_eq!(api.exit_code(), exit_code::API);
    }

    #[test]
    fn core_not_found_maps_to_a_list_hint() {
        let err: CliError = DeskError::NotFound {
            resource: "product".into(),
            identifier: "p9".into(),
        }
        .into();
        match err {
            CliError::NotFound { list_command, .. } => {
                assert_eq!(list_command, "products list");
            }
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn profile_errors_exit_with_the_config_code() {
        let err: CliError = ConfigError::NoSuchProfile { name: "staging".into() }.into();
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    }
}
