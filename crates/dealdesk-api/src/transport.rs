//! HTTP transport construction shared by the API and identity clients.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::error::{Error, Result};

/// TLS verification strategy for outgoing connections.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Verify against the system CA store.
    #[default]
    System,
    /// Verify against a custom CA bundle (PEM file).
    CustomCa(PathBuf),
    /// Skip verification entirely. Only for development backends.
    DangerAcceptInvalid,
}

/// Connection tuning for the underlying `reqwest` client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Per-request timeout. Generous by default; behaviour never depends on it.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
            user_agent: format!("dealdesk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest` client with JSON accept headers.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(&self.user_agent)
            .timeout(self.timeout);

        let builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    Error::Tls(format!("cannot read CA bundle {}: {e}", path.display()))
                })?;
                let cert = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| Error::Tls(format!("invalid CA bundle: {e}")))?;
                builder.add_root_certificate(cert)
            }
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        Ok(builder.build()?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_transport_builds() {
        let cfg = TransportConfig::default();
        assert!(cfg.build_client().is_ok());
    }

    #[test]
    fn missing_ca_bundle_is_an_error() {
        let cfg = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/ca.pem")),
            ..TransportConfig::default()
        };
        assert!(cfg.build_client().is_err());
    }
}
