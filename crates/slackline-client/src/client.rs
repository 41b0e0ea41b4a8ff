//! Main client implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue, RETRY_AFTER};
use serde_json::Value;
use tracing::trace;
use url::Url;

use crate::api::{AuthApi, ConversationsApi, EdgeApi, UsersApi};
use crate::error::{Error, Result};

/// Global API endpoint.
pub const DEFAULT_API_URL: &str = "https://slack.com/api/";

/// Browser user agent sent unless the caller overrides it.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// Empty query for methods that take no parameters.
pub(crate) const NO_PARAMS: &[(&str, &str)] = &[];

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Workspace API client.
///
/// Cheap to clone; clones share one connection pool. A client is bound to a
/// single API base URL. Use [`SlackClient::rebased`] to reach the same
/// credential's workspace-specific endpoint (the edge surface).
#[derive(Clone)]
pub struct SlackClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    http: reqwest::Client,
    api_url: Url,
    timeout: Duration,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_url", &self.inner.api_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the API base URL.
    pub fn api_url(&self) -> &Url {
        &self.inner.api_url
    }

    /// Same credential and connection pool, different API base.
    ///
    /// `base` is a workspace URL such as `https://acme.slack.com/`; calls go
    /// to `<base>api/<method>`.
    pub fn rebased(&self, base: &str) -> Result<SlackClient> {
        let mut api_url = normalize_base(Url::parse(base)?);
        api_url = api_url.join("api/")?;
        Ok(SlackClient {
            inner: Arc::new(ClientInner {
                http: self.inner.http.clone(),
                api_url,
                timeout: self.inner.timeout,
            }),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the conversations API.
    pub fn conversations(&self) -> ConversationsApi {
        ConversationsApi::new(self.clone())
    }

    /// Access the edge (organization-wide) API.
    pub fn edge(&self) -> EdgeApi {
        EdgeApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API method.
    pub(crate) fn url(&self, method: &str) -> Result<Url> {
        self.inner
            .api_url
            .join(method.trim_start_matches('/'))
            .map_err(Error::from)
    }

    /// Call a method with GET and query parameters.
    pub(crate) async fn get<T, Q>(&self, method: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(method)?;
        trace!(method = %method, url = %url, "GET");
        let response = self
            .inner
            .http
            .get(url)
            .query(query)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(method, response).await
    }

    /// Call a method with POST and query parameters.
    pub(crate) async fn post<T, Q>(&self, method: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(method)?;
        trace!(method = %method, url = %url, "POST");
        let response = self
            .inner
            .http
            .post(url)
            .query(query)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(method, response).await
    }

    /// Unwrap the `{ "ok": ..., "error": ... }` envelope.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(Error::RateLimited {
                method: method.to_string(),
                retry_after,
            });
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(Error::Status {
                    method: method.to_string(),
                    status: status.as_u16(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            return Err(Error::Api {
                method: method.to_string(),
                error,
            });
        }

        Ok(serde_json::from_value(body)?)
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    url
}

/// Builder for creating a [`SlackClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    api_url: Option<String>,
    token: Option<String>,
    cookie: Option<String>,
    proxy: Option<String>,
    ca_cert: Option<PathBuf>,
    insecure: bool,
    user_agent: Option<String>,
    timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            api_url: None,
            token: None,
            cookie: None,
            proxy: None,
            ca_cert: None,
            insecure: false,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the API base URL (defaults to the global endpoint).
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the access token sent as a bearer credential.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the session cookie (`d`) that accompanies a session token.
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Route all traffic through a proxy.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Trust an additional PEM root certificate.
    pub fn ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// Skip TLS certificate verification.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SlackClient> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Config("token is required".to_string()))?;

        if self.insecure && self.ca_cert.is_some() {
            return Err(Error::Config(
                "a custom CA certificate cannot be combined with insecure mode".to_string(),
            ));
        }

        let api_url = normalize_base(Url::parse(
            self.api_url.as_deref().unwrap_or(DEFAULT_API_URL),
        )?);

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Config("Invalid token".to_string()))?;
        headers.insert(AUTHORIZATION, auth);

        if let Some(cookie) = self.cookie.filter(|c| !c.is_empty()) {
            let value = if cookie.starts_with("d=") {
                cookie
            } else {
                format!("d={}", cookie)
            };
            let value = HeaderValue::from_str(&value)
                .map_err(|_| Error::Config("Invalid session cookie".to_string()))?;
            headers.insert(COOKIE, value);
        }

        let user_agent = self
            .user_agent
            .filter(|ua| !ua.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent);

        if let Some(proxy) = self.proxy.filter(|p| !p.is_empty()) {
            let proxy = reqwest::Proxy::all(&proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL '{}': {}", proxy, e)))?;
            http = http.proxy(proxy);
        }

        if let Some(path) = self.ca_cert {
            let pem = std::fs::read(&path).map_err(|source| Error::ReadCert {
                path: path.clone(),
                source,
            })?;
            let certs = reqwest::Certificate::from_pem_bundle(&pem)?;
            if certs.is_empty() {
                tracing::warn!(path = %path.display(), "No certificates found, using system roots only");
            }
            for cert in certs {
                http = http.add_root_certificate(cert);
            }
        }

        if self.insecure {
            http = http.danger_accept_invalid_certs(true);
        }

        Ok(SlackClient {
            inner: Arc::new(ClientInner {
                http: http.build()?,
                api_url,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
