// ── Runtime session configuration ──
//
// These types describe *how* to reach the backoffice API. They carry
// credential data and connection tuning, but never touch disk. The
// CLI/TUI constructs a `SessionConfig` and hands it in.

use std::time::Duration;

use dealdesk_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// How to establish an identity session.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Email + password sign-in through the identity provider.
    Password {
        email: String,
        password: SecretString,
    },
    /// A refresh token from an earlier sign-in (what `login` stores).
    RefreshToken(SecretString),
    /// A raw bearer token, bypassing the identity provider entirely.
    /// Used by `--token` invocations and tests.
    StaticToken(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). The backoffice API sits behind a public
    /// certificate, so this is the default.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed staging environments).
    DangerAcceptInvalid,
}

/// Configuration for one backoffice session.
///
/// Built by CLI/TUI, passed to `Backoffice` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Backoffice REST API base URL.
    pub api_url: Url,
    /// Identity provider base URL.
    pub identity_url: Url,
    /// Credentials used to open the session.
    pub credentials: Credentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Page size used when the caller does not specify one.
    pub default_take: usize,
}

impl SessionConfig {
    pub fn new(api_url: Url, identity_url: Url, credentials: Credentials) -> Self {
        Self {
            api_url,
            identity_url,
            credentials,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            default_take: 10,
        }
    }

    /// Transport tuning derived from this session's settings.
    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }
}
