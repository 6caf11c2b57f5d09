// effectif-client/tests/auth_flow.rs
// End-to-end coverage of the login / refresh-and-retry protocol

use effectif_client::{
    ClientConfig, EffectifClient, HttpInterceptor, LoginRequest, MemoryStore, TokenAuthority,
};
use effectif_client::{ClientError, LoginResponse};
use mockito::{Matcher, Server, ServerGuard};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const LOGIN_BODY: &str = r#"{
    "fullName": "Admin",
    "username": "admin",
    "accessToken": "A",
    "refreshToken": "R",
    "accessTokenExpiry": 3600000,
    "refreshTokenExpiry": 86400000,
    "role": "ADMIN"
}"#;

const REFRESHED_BODY: &str = r#"{
    "fullName": "Admin",
    "username": "admin",
    "accessToken": "A2",
    "refreshToken": "R2",
    "accessTokenExpiry": 3600000,
    "refreshTokenExpiry": 86400000,
    "role": "ADMIN"
}"#;

fn config_for(server: &ServerGuard) -> ClientConfig {
    ClientConfig::new(server.url()).with_ip_echo_url(format!("{}/ip", server.url()))
}

fn seeded_authority(server: &ServerGuard) -> Arc<TokenAuthority> {
    let authority = Arc::new(TokenAuthority::new(
        Arc::new(MemoryStore::new()),
        reqwest::Client::new(),
        format!("{}/auth/refresh", server.url()),
    ));
    let login: LoginResponse = serde_json::from_str(LOGIN_BODY).unwrap();
    authority.store_credentials(&login).unwrap();
    authority
}

fn interceptor_for(server: &ServerGuard, authority: Arc<TokenAuthority>) -> HttpInterceptor {
    HttpInterceptor::new(&config_for(server), reqwest::Client::new(), authority)
}

#[tokio::test]
async fn login_then_authenticated_list() {
    let mut server = Server::new_async().await;

    let ip_mock = server
        .mock("GET", "/ip")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ip": "1.2.3.4"}"#)
        .create_async()
        .await;

    // No Authorization header may reach the login path
    let login_mock = server
        .mock("POST", "/auth/login")
        .match_header("authorization", Matcher::Missing)
        .match_header("x-forwarded-for", "1.2.3.4")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LOGIN_BODY)
        .expect(1)
        .create_async()
        .await;

    let list_mock = server
        .mock("GET", "/employes")
        .match_header("authorization", "Bearer A")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let client =
        EffectifClient::new(config_for(&server), Arc::new(MemoryStore::new())).unwrap();

    let result = client
        .auth
        .login(&LoginRequest {
            username: "admin".into(),
            password: "admin123".into(),
        })
        .await;
    assert!(result.error.is_none());
    assert_eq!(result.state.as_deref(), Some("success"));
    assert_eq!(result.data.unwrap().access_token, "A");
    assert!(client.is_authenticated());
    assert_eq!(client.profile().unwrap().full_name, "Admin");

    let employees = client.employees.get_all().await;
    assert!(employees.error.is_none());
    assert_eq!(employees.data.unwrap().len(), 0);

    ip_mock.assert_async().await;
    login_mock.assert_async().await;
    list_mock.assert_async().await;
}

#[tokio::test]
async fn login_error_surfaces_backend_message() {
    let mut server = Server::new_async().await;

    let _ip_mock = server
        .mock("GET", "/ip")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ip": "1.2.3.4"}"#)
        .create_async()
        .await;

    let login_mock = server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Identifiants invalides"}"#)
        .expect(1)
        .create_async()
        .await;

    let client =
        EffectifClient::new(config_for(&server), Arc::new(MemoryStore::new())).unwrap();

    let result = client
        .auth
        .login(&LoginRequest {
            username: "admin".into(),
            password: "mauvais".into(),
        })
        .await;

    assert_eq!(result.error.as_deref(), Some("Identifiants invalides"));
    assert_eq!(result.code, 401);
    assert!(result.data.is_none());
    assert!(!client.is_authenticated());

    login_mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_ip_echo_falls_back() {
    let mut server = Server::new_async().await;

    let login_mock = server
        .mock("POST", "/auth/login")
        .match_header("x-forwarded-for", "192.168.1.1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LOGIN_BODY)
        .expect(1)
        .create_async()
        .await;

    // Port 9 (discard) refuses immediately, well inside the 3s bound
    let config = ClientConfig::new(server.url()).with_ip_echo_url("http://127.0.0.1:9/ip");
    let client = EffectifClient::new(config, Arc::new(MemoryStore::new())).unwrap();

    let result = client
        .auth
        .login(&LoginRequest {
            username: "admin".into(),
            password: "admin123".into(),
        })
        .await;
    assert!(result.error.is_none());

    login_mock.assert_async().await;
}

#[tokio::test]
async fn expired_token_refreshes_and_retries_once() {
    let mut server = Server::new_async().await;

    let stale_mock = server
        .mock("GET", "/employes")
        .match_header("authorization", "Bearer A")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let refresh_mock = server
        .mock("POST", "/auth/refresh")
        .match_header("authorization", "Bearer R")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REFRESHED_BODY)
        .expect(1)
        .create_async()
        .await;

    let retry_mock = server
        .mock("GET", "/employes")
        .match_header("authorization", "Bearer A2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let authority = seeded_authority(&server);
    let interceptor = interceptor_for(&server, Arc::clone(&authority));

    let response = interceptor.get("/employes").await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(authority.access_token().as_deref(), Some("A2"));

    stale_mock.assert_async().await;
    refresh_mock.assert_async().await;
    retry_mock.assert_async().await;
}

#[tokio::test]
async fn second_401_is_terminal_without_second_refresh() {
    let mut server = Server::new_async().await;

    let stale_mock = server
        .mock("GET", "/employes")
        .match_header("authorization", "Bearer A")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let refresh_mock = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REFRESHED_BODY)
        .expect(1)
        .create_async()
        .await;

    let retry_mock = server
        .mock("GET", "/employes")
        .match_header("authorization", "Bearer A2")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let authority = seeded_authority(&server);
    let interceptor = interceptor_for(&server, authority);

    // The retry's 401 is delivered as-is, no further recovery
    let response = interceptor.get("/employes").await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    stale_mock.assert_async().await;
    refresh_mock.assert_async().await;
    retry_mock.assert_async().await;
}

#[tokio::test]
async fn refresh_failure_clears_session_and_fires_hook() {
    let mut server = Server::new_async().await;

    let stale_mock = server
        .mock("GET", "/employes")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let refresh_mock = server
        .mock("POST", "/auth/refresh")
        .with_status(403)
        .expect(1)
        .create_async()
        .await;

    let authority = seeded_authority(&server);
    let invalidated = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&invalidated);
    let interceptor = interceptor_for(&server, Arc::clone(&authority))
        .with_session_hook(Box::new(move || {
            flag.store(true, Ordering::SeqCst);
        }));

    let result = interceptor.get("/employes").await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed)));
    assert!(!authority.is_authenticated());
    assert!(authority.refresh_token().is_none());
    assert!(invalidated.load(Ordering::SeqCst));

    stale_mock.assert_async().await;
    refresh_mock.assert_async().await;
}

#[tokio::test]
async fn logout_clears_without_network() {
    let server = Server::new_async().await;

    // The client and the seeding authority share one injected store
    let store = Arc::new(MemoryStore::new());
    let client = EffectifClient::new(config_for(&server), store.clone()).unwrap();

    let login: LoginResponse = serde_json::from_str(LOGIN_BODY).unwrap();
    let authority = TokenAuthority::new(
        store,
        reqwest::Client::new(),
        format!("{}/auth/refresh", server.url()),
    );
    authority.store_credentials(&login).unwrap();
    assert!(client.is_authenticated());

    client.auth.logout();
    assert!(!client.is_authenticated());
    assert!(client.profile().is_none());
}
