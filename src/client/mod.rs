//! HTTP layer for the TestAI API.
//!
//! One configured [`reqwest::Client`] shared by all auth operations: base URL
//! and timeout are fixed at construction, the bearer token is read from the
//! credential store on every request, and cookies ride along for cross-origin
//! deployments behind the gateway.
//!
//! A `401` on a request that carried our token is not a recoverable error for
//! the caller: the store is cleared and an unauthenticated signal is
//! broadcast before [`Error::Unauthenticated`] is returned. The front end
//! subscribes to the signal and steers the user back to login. A `401` on a
//! bare request (a failed login attempt) stays a domain error, since there is
//! no session to tear down. Every other non-success status
//! is decoded into [`Error::Api`] and propagated unmodified; a request that
//! never got a response becomes [`Error::NoConnection`].

use crate::auth::error::{Error, ErrorCode};
use crate::store::CredentialStore;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{debug, info_span, warn, Instrument};
use url::Url;

/// Default per-request timeout, matching the original client configuration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Structured error body returned by the API on 4xx/5xx.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    code: Option<ErrorCode>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<CredentialStore>,
    unauthenticated: watch::Sender<u64>,
}

impl ApiClient {
    /// Build a client for `base_url` with the given per-request timeout.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        store: Arc<CredentialStore>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let parsed = Url::parse(base_url)?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => anyhow::bail!("unsupported scheme in API URL: {other}"),
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        let (unauthenticated, _) = watch::channel(0);

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store: Arc::clone(&store),
            unauthenticated,
        })
    }

    /// Receiver that ticks whenever a request is rejected with `401` and the
    /// session has been torn down. The front end watches this to send the
    /// user back to login.
    #[must_use]
    pub fn subscribe_unauthenticated(&self) -> watch::Receiver<u64> {
        self.unauthenticated.subscribe()
    }

    #[must_use]
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a JSON endpoint with query parameters.
    ///
    /// # Errors
    /// See [`Error`] for the taxonomy.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, Error> {
        self.execute(Method::GET, path, query, None).await
    }

    /// POST a JSON body.
    ///
    /// # Errors
    /// See [`Error`] for the taxonomy.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = self.endpoint_url(path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Accept", "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        // Bearer attachment: present token means authenticated request,
        // absent token means the request goes out bare.
        let token = self.store.access_token();
        let authenticated = token.is_some();
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let span = info_span!(
            "api.request",
            http.method = %method,
            url = %url
        );
        let response = request
            .send()
            .instrument(span)
            .await
            .map_err(|e| Error::NoConnection(e.to_string()))?;

        let status = response.status();
        debug!("{} {} -> {}", method, url, status);

        if status == StatusCode::UNAUTHORIZED && authenticated {
            // Our token was rejected: the session is dead. Tear it down here
            // so no caller keeps acting on stale credentials, then tell the
            // front end. A 401 on a bare request (e.g. a failed login) is a
            // plain domain error and falls through below.
            if let Err(e) = self.store.clear() {
                warn!("failed to clear credential store after 401: {e}");
            }
            self.unauthenticated.send_modify(|n| *n += 1);
            return Err(Error::Unauthenticated);
        }

        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                code: body.code,
                message: body
                    .message
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::UnexpectedResponse(e.to_string()))
    }
}
