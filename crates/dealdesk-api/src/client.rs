//! The marketplace API client.
//!
//! One `ApiClient` serves every resource family; the typed endpoint methods
//! live in the sibling resource modules (`catalog`, `partners`, `deals`,
//! `commerce`, `media`, `account`) as `impl ApiClient` blocks over the
//! `pub(crate)` verb helpers defined here.
//!
//! Every request asks the [`TokenSource`] for a bearer token immediately
//! before it is sent. The client itself never caches tokens; freshness is
//! the source's concern.

use std::sync::Arc;
use std::time::Instant;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::identity::TokenSource;
use crate::transport::TransportConfig;

/// How much of an unparseable body to keep in the error.
const BODY_PREVIEW_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    tokens: Arc<TokenSource>,
}

impl ApiClient {
    /// Create a client for the API at `base_url`.
    ///
    /// The base URL is normalized to end with `/` so relative endpoint
    /// paths join below it rather than replacing its last segment.
    pub fn new(base_url: &Url, tokens: TokenSource, transport: &TransportConfig) -> Result<Self> {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self {
            http: transport.build_client()?,
            base,
            tokens: Arc::new(tokens),
        })
    }

    /// The token source, for session-level operations (sign-out).
    pub fn token_source(&self) -> &TokenSource {
        &self.tokens
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))
    }

    /// Start a request with a freshly fetched bearer token attached.
    async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        let token = self.tokens.bearer_token().await?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token.expose_secret()))
    }

    async fn dispatch(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response> {
        let started = Instant::now();
        let response = builder.send().await?;
        tracing::debug!(
            %method,
            path,
            status = response.status().as_u16(),
            elapsed = ?started.elapsed(),
            "api request"
        );
        Ok(response)
    }

    // ── Verb helpers ─────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.authorized(Method::GET, path).await?;
        let response = self.dispatch(Method::GET, path, builder).await?;
        Self::parse_body(response, path).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let builder = self.authorized(Method::GET, path).await?.query(params);
        let response = self.dispatch(Method::GET, path, builder).await?;
        Self::parse_body(response, path).await
    }

    pub(crate) async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.authorized(Method::POST, path).await?.json(body);
        let response = self.dispatch(Method::POST, path, builder).await?;
        Self::parse_body(response, path).await
    }

    /// POST with no body, response discarded (approve/block style actions).
    pub(crate) async fn post_empty(&self, path: &str) -> Result<()> {
        let builder = self.authorized(Method::POST, path).await?;
        let response = self.dispatch(Method::POST, path, builder).await?;
        Self::check_status(response).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let builder = self.authorized(Method::POST, path).await?.json(body);
        let response = self.dispatch(Method::POST, path, builder).await?;
        Self::check_status(response).await
    }

    pub(crate) async fn patch_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let builder = self.authorized(Method::PATCH, path).await?.json(body);
        let response = self.dispatch(Method::PATCH, path, builder).await?;
        Self::check_status(response).await
    }

    pub(crate) async fn put_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let builder = self.authorized(Method::PUT, path).await?.json(body);
        let response = self.dispatch(Method::PUT, path, builder).await?;
        Self::check_status(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.authorized(Method::DELETE, path).await?;
        let response = self.dispatch(Method::DELETE, path, builder).await?;
        Self::check_status(response).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T> {
        let builder = self.authorized(Method::POST, path).await?.multipart(form);
        let response = self.dispatch(Method::POST, path, builder).await?;
        Self::parse_body(response, path).await
    }

    pub(crate) async fn post_multipart_no_response(&self, path: &str, form: Form) -> Result<()> {
        let builder = self.authorized(Method::POST, path).await?.multipart(form);
        let response = self.dispatch(Method::POST, path, builder).await?;
        Self::check_status(response).await
    }

    pub(crate) async fn patch_multipart_no_response(&self, path: &str, form: Form) -> Result<()> {
        let builder = self.authorized(Method::PATCH, path).await?.multipart(form);
        let response = self.dispatch(Method::PATCH, path, builder).await?;
        Self::check_status(response).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn parse_body<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
            Error::Deserialization {
                context: format!("decoding response from {context}"),
                detail: format!("{e} (body starts: {preview:?})"),
            }
        })
    }

    async fn check_status(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(Self::parse_error(status, &body))
    }

    /// Map a non-2xx response to the error taxonomy. The backend emits
    /// `{"statusCode", "message", "error"}` where `message` may be a single
    /// string or a list of validation messages.
    fn parse_error(status: StatusCode, body: &str) -> Error {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum WireMessage {
            One(String),
            Many(Vec<String>),
        }

        #[derive(serde::Deserialize)]
        struct WireError {
            #[serde(default)]
            message: Option<WireMessage>,
            #[serde(default)]
            error: Option<String>,
        }

        let message = serde_json::from_str::<WireError>(body)
            .ok()
            .and_then(|e| {
                e.message
                    .map(|m| match m {
                        WireMessage::One(s) => s,
                        WireMessage::Many(v) => v.join("; "),
                    })
                    .or(e.error)
            })
            .unwrap_or_else(|| {
                let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
                if preview.is_empty() {
                    format!("HTTP {}", status.as_u16())
                } else {
                    preview
                }
            });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized {
                status: status.as_u16(),
                message,
            },
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn error_parsing_covers_backend_shapes() {
        let e = ApiClient::parse_error(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":400,"message":["name must not be empty","index must be a number"],"error":"Bad Request"}"#,
        );
        match e {
            Error::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("name must not be empty"));
                assert!(message.contains("; "));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let e = ApiClient::parse_error(StatusCode::UNAUTHORIZED, r#"{"message":"token expired"}"#);
        assert!(e.is_auth());

        let e = ApiClient::parse_error(StatusCode::BAD_GATEWAY, "<html>upstream</html>");
        assert!(e.is_transient());
    }
}
