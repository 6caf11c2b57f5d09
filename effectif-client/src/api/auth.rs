//! Auth API

use crate::auth::TokenAuthority;
use crate::error::ClientResult;
use crate::interceptor::HttpInterceptor;
use serde::Deserialize;
use shared::{ApiResponse, LoginRequest, LoginResponse};
use std::sync::Arc;
use tracing::warn;

/// User-facing message for transport-level login failures
const LOGIN_TRANSPORT_ERROR: &str = "Erreur de connexion au serveur";

/// Error body shape of the login endpoint
#[derive(Deserialize)]
struct LoginErrorBody {
    message: Option<String>,
}

/// Typed client for the auth endpoints
pub struct AuthApi {
    http: Arc<HttpInterceptor>,
    authority: Arc<TokenAuthority>,
}

impl AuthApi {
    pub fn new(http: Arc<HttpInterceptor>, authority: Arc<TokenAuthority>) -> Self {
        Self { http, authority }
    }

    /// Authenticate and persist the returned credential set
    ///
    /// The login path is exempt from the Authorization header by the
    /// interceptor's composition rules.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResponse<LoginResponse> {
        match self.try_login(credentials).await {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "login failed");
                ApiResponse::error(500, LOGIN_TRANSPORT_ERROR)
            }
        }
    }

    async fn try_login(&self, credentials: &LoginRequest) -> ClientResult<ApiResponse<LoginResponse>> {
        let response = self.http.post("/auth/login", Some(credentials)).await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<LoginErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("Erreur HTTP: {}", status.as_u16()));
            return Ok(ApiResponse::error(status.as_u16(), message));
        }

        // The backend returns the LoginResponse object directly
        let login: LoginResponse = response.json().await?;

        if !login.access_token.is_empty() {
            self.authority.store_credentials(&login)?;
        }

        Ok(ApiResponse::ok_with_state(login, 200, "success"))
    }

    /// Drop the credential set; no network call
    pub fn logout(&self) {
        if let Err(err) = self.authority.clear() {
            warn!(error = %err, "clearing credentials on logout failed");
        }
    }
}
