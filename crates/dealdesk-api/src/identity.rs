//! Identity provider integration.
//!
//! Authentication is delegated to an external identity service that speaks a
//! token endpoint separate from the marketplace API. The API client asks its
//! [`TokenSource`] for a bearer token before *every* request; the source owns
//! freshness (cached ID token, transparent refresh near expiry).

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use tokio::sync::Mutex;
use url::Url;

use crate::error::{Error, Result};
use crate::transport::TransportConfig;

/// Refresh the ID token once it is within this window of expiring.
const EXPIRY_SLACK: Duration = Duration::from_secs(30);

// ── Token source ─────────────────────────────────────────────────────

/// Where bearer tokens come from.
///
/// `Identity` is the normal path: a live session against the identity
/// provider. `Static` is for tests and `--token` invocations, where the
/// caller already holds a token and no refresh is possible.
pub enum TokenSource {
    Identity(IdentityClient),
    Static(SecretString),
}

impl TokenSource {
    /// A token valid for at least the next request.
    pub async fn bearer_token(&self) -> Result<SecretString> {
        match self {
            Self::Identity(client) => client.bearer_token().await,
            Self::Static(token) => Ok(token.clone()),
        }
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity(_) => f.write_str("TokenSource::Identity(..)"),
            Self::Static(_) => f.write_str("TokenSource::Static(..)"),
        }
    }
}

// ── Identity client ──────────────────────────────────────────────────

#[derive(Debug)]
struct TokenState {
    id_token: SecretString,
    refresh_token: SecretString,
    expires_at: Instant,
}

/// Client for the identity provider's token endpoint.
///
/// Holds the current ID token and refresh token behind an async mutex so a
/// refresh in one task is observed by all concurrent requests.
#[derive(Debug)]
pub struct IdentityClient {
    http: reqwest::Client,
    token_url: Url,
    state: Mutex<Option<TokenState>>,
}

#[derive(serde::Serialize)]
struct PasswordGrant<'a> {
    grant_type: &'static str,
    email: &'a str,
    password: &'a str,
}

#[derive(serde::Serialize)]
struct RefreshGrant<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    #[serde(deserialize_with = "seconds_from_string_or_number")]
    expires_in: u64,
}

/// The provider reports `expiresIn` as either a number or a decimal string.
fn seconds_from_string_or_number<'de, D>(de: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }

    match Raw::deserialize(de)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

impl IdentityClient {
    /// Create a client for `identity_url` (the token endpoint is
    /// `{identity_url}/v1/token`). No credentials yet; call [`sign_in`]
    /// or seed with [`with_refresh_token`].
    ///
    /// [`sign_in`]: IdentityClient::sign_in
    /// [`with_refresh_token`]: IdentityClient::with_refresh_token
    pub fn new(identity_url: &Url, transport: &TransportConfig) -> Result<Self> {
        let token_url = identity_url
            .join("v1/token")
            .map_err(|e| Error::InvalidUrl(format!("{identity_url}: {e}")))?;
        Ok(Self {
            http: transport.build_client()?,
            token_url,
            state: Mutex::new(None),
        })
    }

    /// Seed the client with a stored refresh token; the first
    /// `bearer_token()` call exchanges it for an ID token.
    pub fn with_refresh_token(mut self, refresh_token: SecretString) -> Self {
        self.state = Mutex::new(Some(TokenState {
            id_token: SecretString::from(String::new()),
            refresh_token,
            // Already past expiry, so the first use triggers an exchange.
            expires_at: Instant::now(),
        }));
        self
    }

    /// Password sign-in. On success the session is ready and the returned
    /// refresh token can be persisted by the caller.
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<SecretString> {
        let grant = PasswordGrant {
            grant_type: "password",
            email,
            password: password.expose_secret(),
        };
        let response = self.fetch_token(&grant).await?;
        let refresh = SecretString::from(response.refresh_token);
        let mut state = self.state.lock().await;
        *state = Some(TokenState {
            id_token: SecretString::from(response.id_token),
            refresh_token: refresh.clone(),
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });
        drop(state);
        tracing::info!(email, "identity sign-in succeeded");
        Ok(refresh)
    }

    /// A token valid for at least the next request, refreshing if the
    /// cached one is missing or about to expire.
    pub async fn bearer_token(&self) -> Result<SecretString> {
        let mut state = self.state.lock().await;
        match state.as_ref() {
            None => Err(Error::Auth("not signed in".into())),
            Some(current)
                if current.expires_at.saturating_duration_since(Instant::now())
                    > EXPIRY_SLACK =>
            {
                Ok(current.id_token.clone())
            }
            Some(stale) => {
                let refresh_token = stale.refresh_token.clone();
                let grant = RefreshGrant {
                    grant_type: "refresh_token",
                    refresh_token: refresh_token.expose_secret(),
                };
                let response = self.fetch_token(&grant).await?;
                let token = SecretString::from(response.id_token);
                *state = Some(TokenState {
                    id_token: token.clone(),
                    refresh_token: SecretString::from(response.refresh_token),
                    expires_at: Instant::now() + Duration::from_secs(response.expires_in),
                });
                tracing::debug!("identity token refreshed");
                Ok(token)
            }
        }
    }

    /// Whether a session (signed in or seeded) exists.
    pub async fn has_session(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// Drop the cached session.
    pub async fn sign_out(&self) {
        *self.state.lock().await = None;
    }

    async fn fetch_token<B: serde::Serialize>(&self, grant: &B) -> Result<TokenResponse> {
        let resp = self
            .http
            .post(self.token_url.clone())
            .json(grant)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let message = extract_identity_error(&body)
                .unwrap_or_else(|| format!("status {}", status.as_u16()));
            return Err(Error::Auth(message));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            context: "exchanging identity token".into(),
            detail: e.to_string(),
        })
    }
}

/// Identity errors arrive as `{"error": {"message": "..."}}` or a flat
/// `{"message": "..."}`.
fn extract_identity_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Nested {
        message: String,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        error: Option<Nested>,
        #[serde(default)]
        message: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.error.map(|e| e.message).or(parsed.message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn identity_error_shapes() {
        assert_eq!(
            extract_identity_error(r#"{"error":{"message":"INVALID_PASSWORD"}}"#).as_deref(),
            Some("INVALID_PASSWORD")
        );
        assert_eq!(
            extract_identity_error(r#"{"message":"bad grant"}"#).as_deref(),
            Some("bad grant")
        );
        assert_eq!(extract_identity_error("not json"), None);
    }

    #[test]
    fn expires_in_accepts_string_and_number() {
        let a: TokenResponse =
            serde_json::from_str(r#"{"idToken":"a","refreshToken":"b","expiresIn":"3600"}"#)
                .unwrap();
        assert_eq!(a.expires_in, 3600);
        let b: TokenResponse =
            serde_json::from_str(r#"{"idToken":"a","refreshToken":"b","expiresIn":1200}"#)
                .unwrap();
        assert_eq!(b.expires_in, 1200);
    }
}
