//! Effectif client - authenticated HTTP client for the employee admin backend
//!
//! Layering, leaf first: [`store::CredentialStore`] persists the credential
//! set, [`auth::TokenAuthority`] drives the bearer-refresh protocol,
//! [`interceptor::HttpInterceptor`] decorates and retries calls, and the
//! [`api`] resource clients translate responses into the
//! [`shared::ApiResponse`] envelope. A UI collaborator talks to the
//! resource clients only.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod store;

pub use api::{AuthApi, EmployeeApi};
pub use auth::TokenAuthority;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use interceptor::{HttpInterceptor, SessionHook};
pub use store::{CredentialStore, MemoryStore, RedbStore, StoreError};

// Re-export shared types for convenience
pub use shared::{
    ApiResponse, Employee, EmployeeFilters, EmployeeFormData, LoginRequest, LoginResponse,
    POSTES, UserProfile,
};

use std::sync::Arc;

/// Composition root: wires store, authority, interceptor and resource
/// clients into one explicitly constructed object
///
/// One instance per process; resource clients share the same interceptor
/// and token authority.
pub struct EffectifClient {
    pub auth: AuthApi,
    pub employees: EmployeeApi,
    authority: Arc<TokenAuthority>,
}

impl EffectifClient {
    /// Build a client over the given credential store
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> ClientResult<Self> {
        Self::build(config, store, None)
    }

    /// Build a client with a session-invalidated callback
    pub fn with_session_hook(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        hook: SessionHook,
    ) -> ClientResult<Self> {
        Self::build(config, store, Some(hook))
    }

    fn build(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        hook: Option<SessionHook>,
    ) -> ClientResult<Self> {
        // No global request timeout: only the IP lookup is bounded
        let client = reqwest::Client::builder().build()?;

        let authority = Arc::new(TokenAuthority::new(
            store,
            client.clone(),
            config.refresh_url.clone(),
        ));

        let mut interceptor = HttpInterceptor::new(&config, client, Arc::clone(&authority));
        if let Some(hook) = hook {
            interceptor = interceptor.with_session_hook(hook);
        }
        let interceptor = Arc::new(interceptor);

        Ok(Self {
            auth: AuthApi::new(Arc::clone(&interceptor), Arc::clone(&authority)),
            employees: EmployeeApi::new(interceptor),
            authority,
        })
    }

    /// True iff an access token is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.authority.is_authenticated()
    }

    /// Stored user profile, if any
    pub fn profile(&self) -> Option<UserProfile> {
        self.authority.profile()
    }
}
