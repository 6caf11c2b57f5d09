//! Token authority
//!
//! Owns the credential lifecycle: decides whether the caller is
//! authenticated, writes/clears the credential set atomically, and runs
//! the bearer-refresh protocol against the backend.

use crate::error::{ClientError, ClientResult};
use crate::store::{CredentialStore, StoreResult};
use reqwest::Client;
use shared::{LoginResponse, UserProfile};
use std::sync::Arc;
use tracing::{debug, warn};

/// Store entry holding the access token
pub const ACCESS_TOKEN_ENTRY: &str = "accessToken";
/// Store entry holding the refresh token
pub const REFRESH_TOKEN_ENTRY: &str = "refreshToken";
/// Store entry holding the serialized [`UserProfile`]
pub const PROFILE_ENTRY: &str = "userInfo";

/// Authentication state manager
///
/// All reads go through the injected [`CredentialStore`]; the authority
/// itself keeps no token state in memory.
pub struct TokenAuthority {
    store: Arc<dyn CredentialStore>,
    client: Client,
    refresh_url: String,
    /// Serializes refreshes: at most one in flight, queued callers wait
    refresh_lock: tokio::sync::Mutex<()>,
}

impl TokenAuthority {
    pub fn new(store: Arc<dyn CredentialStore>, client: Client, refresh_url: String) -> Self {
        Self {
            store,
            client,
            refresh_url,
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// True iff an access token entry is present
    ///
    /// Presence only; no signature or server-side validity check.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Current access token, if present and unexpired
    pub fn access_token(&self) -> Option<String> {
        self.read_entry(ACCESS_TOKEN_ENTRY)
    }

    /// Current refresh token, if present and unexpired
    pub fn refresh_token(&self) -> Option<String> {
        self.read_entry(REFRESH_TOKEN_ENTRY)
    }

    /// Stored user profile, if present
    pub fn profile(&self) -> Option<UserProfile> {
        let raw = self.read_entry(PROFILE_ENTRY)?;
        serde_json::from_str(&raw).ok()
    }

    fn read_entry(&self, name: &str) -> Option<String> {
        match self.store.get_entry(name) {
            Ok(value) => value,
            Err(err) => {
                warn!(entry = name, error = %err, "credential store read failed");
                None
            }
        }
    }

    /// Atomically write access token, refresh token and profile,
    /// each with the TTL taken from the login result
    pub fn store_credentials(&self, login: &LoginResponse) -> ClientResult<()> {
        let profile = serde_json::to_string(&UserProfile::from(login))?;
        self.store.set_entries(&[
            (
                ACCESS_TOKEN_ENTRY,
                login.access_token.as_str(),
                login.access_token_expiry,
            ),
            (
                REFRESH_TOKEN_ENTRY,
                login.refresh_token.as_str(),
                login.refresh_token_expiry,
            ),
            (PROFILE_ENTRY, profile.as_str(), login.access_token_expiry),
        ])?;
        Ok(())
    }

    /// Delete all three entries unconditionally; idempotent
    pub fn clear(&self) -> StoreResult<()> {
        self.store
            .delete_entries(&[ACCESS_TOKEN_ENTRY, REFRESH_TOKEN_ENTRY, PROFILE_ENTRY])
    }

    /// Obtain a fresh credential set using the refresh token
    ///
    /// Returns false without touching the network when no refresh token is
    /// present. On any failure (network, non-OK status, malformed body,
    /// store write) the credential set is fully cleared. Never leaves a
    /// partially-updated set.
    pub async fn refresh(&self) -> bool {
        let _guard = self.refresh_lock.lock().await;

        let Some(refresh_token) = self.refresh_token() else {
            debug!("no refresh token present, skipping refresh");
            return false;
        };

        match self.request_refresh(&refresh_token).await {
            Ok(login) => match self.store_credentials(&login) {
                Ok(()) => {
                    debug!("access token refreshed");
                    true
                }
                Err(err) => {
                    warn!(error = %err, "storing refreshed credentials failed");
                    let _ = self.clear();
                    false
                }
            },
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                let _ = self.clear();
                false
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> ClientResult<LoginResponse> {
        let response = self
            .client
            .post(&self.refresh_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .bearer_auth(refresh_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::RefreshRejected(status.as_u16()));
        }

        response
            .json::<LoginResponse>()
            .await
            .map_err(ClientError::Http)
    }
}
