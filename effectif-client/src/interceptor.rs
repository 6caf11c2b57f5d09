//! Request interceptor
//!
//! Wraps the reqwest transport: decorates every outgoing request with the
//! required headers, detects authentication failure, drives one
//! refresh-and-retry cycle through the [`TokenAuthority`], and surfaces
//! the final response or a terminal failure.
//!
//! Non-2xx statuses are not interceptor failures; whatever the backend
//! answers is delivered for the resource clients to interpret. The one
//! failure class recovered here is an expired access token: a 401 on a
//! non-login, non-refresh path triggers exactly one refresh and one retry,
//! and the retry's outcome is final.

use crate::auth::TokenAuthority;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Callback fired when the session dies (refresh failed after a 401).
/// The embedding application decides what "redirect to login" means.
pub type SessionHook = Box<dyn Fn() + Send + Sync>;

#[derive(Deserialize)]
struct IpEchoResponse {
    ip: String,
}

/// Intercepting HTTP client
///
/// One instance per process, constructed by the composition root and
/// shared by the resource clients.
pub struct HttpInterceptor {
    client: Client,
    base_url: String,
    auth: Arc<TokenAuthority>,
    ip_echo_url: String,
    ip_timeout: Duration,
    ip_fallback: String,
    session_hook: Option<SessionHook>,
}

impl HttpInterceptor {
    pub fn new(config: &ClientConfig, client: Client, auth: Arc<TokenAuthority>) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            auth,
            ip_echo_url: config.ip_echo_url.clone(),
            ip_timeout: Duration::from_millis(config.ip_timeout_ms),
            ip_fallback: config.ip_fallback.clone(),
            session_hook: None,
        }
    }

    /// Install the session-invalidated callback
    pub fn with_session_hook(mut self, hook: SessionHook) -> Self {
        self.session_hook = Some(hook);
        self
    }

    /// GET request
    pub async fn get(&self, path: &str) -> ClientResult<Response> {
        self.execute(Method::GET, path, None).await
    }

    /// POST request with optional JSON body
    pub async fn post<B: Serialize>(&self, path: &str, body: Option<&B>) -> ClientResult<Response> {
        let body = body.map(serde_json::to_string).transpose()?;
        self.execute(Method::POST, path, body).await
    }

    /// PUT request with optional JSON body
    pub async fn put<B: Serialize>(&self, path: &str, body: Option<&B>) -> ClientResult<Response> {
        let body = body.map(serde_json::to_string).transpose()?;
        self.execute(Method::PUT, path, body).await
    }

    /// DELETE request
    pub async fn delete(&self, path: &str) -> ClientResult<Response> {
        self.execute(Method::DELETE, path, None).await
    }

    /// Run one intercepted call to its terminal state
    ///
    /// The body, when present, is already serialized so the recovery retry
    /// replays identical bytes.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> ClientResult<Response> {
        // Compose
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        };
        let is_login = path.contains("/auth/login");
        let is_refresh = path.contains("/auth/refresh");

        // Best-effort client IP, login requests only
        let forwarded_for = if is_login {
            Some(self.client_ip().await)
        } else {
            None
        };

        let bearer = if !is_login && self.auth.is_authenticated() {
            let token = self.auth.access_token();
            if token.is_none() {
                // Authenticated but the token vanished between checks;
                // dispatch without the header rather than failing
                warn!(url = %url, "authenticated but no access token resolvable");
            }
            token
        } else {
            debug!(url = %url, "no authentication required");
            None
        };

        // Dispatch
        let mut response = self
            .dispatch(&method, &url, &body, bearer.as_deref(), forwarded_for.as_deref())
            .await?;

        // Outcome check: one refresh-and-retry cycle on 401
        if response.status() == reqwest::StatusCode::UNAUTHORIZED && !is_login && !is_refresh {
            debug!(url = %url, "received 401, attempting token refresh");

            if self.auth.refresh().await {
                let bearer = self.auth.access_token();
                response = self
                    .dispatch(&method, &url, &body, bearer.as_deref(), None)
                    .await?;
            } else {
                warn!(url = %url, "token refresh failed, session invalidated");
                let _ = self.auth.clear();
                if let Some(hook) = &self.session_hook {
                    hook();
                }
                return Err(ClientError::AuthenticationFailed);
            }
        }

        Ok(response)
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        body: &Option<String>,
        bearer: Option<&str>,
        forwarded_for: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(ip) = forwarded_for {
            request = request.header("X-Forwarded-For", ip);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.body(body.clone());
        }

        request.send().await
    }

    /// Best-effort client IP lookup, bounded by the configured timeout
    ///
    /// Failure of any kind yields the configured fallback address; this
    /// never fails or delays the surrounding request beyond the bound.
    async fn client_ip(&self) -> String {
        let lookup = async {
            let response = self.client.get(&self.ip_echo_url).send().await.ok()?;
            let echo: IpEchoResponse = response.json().await.ok()?;
            Some(echo.ip)
        };

        match tokio::time::timeout(self.ip_timeout, lookup).await {
            Ok(Some(ip)) => ip,
            _ => {
                warn!("client IP lookup failed, using fallback");
                self.ip_fallback.clone()
            }
        }
    }
}
