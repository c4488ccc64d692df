//! Login, registration, OAuth callback and logout against a mock backend

mod common;

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use linkrec::auth::{AuthService, OAuthCallback, RedirectPolicy};
use linkrec::error::{user_message, LinkrecError};
use linkrec::session::{SessionEvent, SessionStore};

fn immediate() -> RedirectPolicy {
    RedirectPolicy::immediate("/dashboard")
}

// ---------------------------------------------------------------------------
// Email/password login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_with_empty_fields_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (session, store) = common::session_for(&server);
    let auth = AuthService::new(session, immediate());

    for (email, password) in [("", "secret"), ("ada@example.com", ""), ("  ", "  ")] {
        let err = auth.login(email, password).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LinkrecError>(),
            Some(LinkrecError::Validation(_))
        ));
        assert_eq!(err.to_string(), "Please fill in all fields");
    }

    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_success_stores_token_and_waits_before_navigating() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": {"id": 7, "email": "ada@example.com", "name": "Ada"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, store) = common::session_for(&server);
    let mut events = session.subscribe();
    let client = session.client().clone();
    let redirect = RedirectPolicy {
        delay: Duration::from_millis(200),
        target: "/dashboard".to_string(),
    };
    let auth = AuthService::new(session, redirect);

    let started = Instant::now();
    let outcome = auth.login(" ada@example.com ", "hunter2").await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(outcome.navigate_to, "/dashboard");
    assert_eq!(outcome.session.token, "tok-1");
    assert_eq!(outcome.user.unwrap().id, "7");

    let stored = store.load().await.unwrap().expect("session stored");
    assert_eq!(stored.token, "tok-1");
    assert_eq!(stored.email.as_deref(), Some("ada@example.com"));
    assert_eq!(client.token().await.as_deref(), Some("tok-1"));

    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedIn {
            email: Some("ada@example.com".to_string())
        }
    );
}

#[tokio::test]
async fn test_login_rejection_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let (session, store) = common::session_for(&server);
    let auth = AuthService::new(session, immediate());

    let err = auth.login("ada@example.com", "wrong").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LinkrecError>(),
        Some(LinkrecError::Api { status: 401, .. })
    ));
    assert_eq!(user_message(&err, "Login failed"), "Invalid credentials");
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_rejection_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let (session, _) = common::session_for(&server);
    let err = AuthService::new(session, immediate())
        .login("ada@example.com", "pw")
        .await
        .unwrap_err();
    assert_eq!(user_message(&err, "Login failed"), "Login failed");
}

#[tokio::test]
async fn test_login_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (session, _) = common::session_for(&server);
    let err = AuthService::new(session, immediate())
        .login("ada@example.com", "pw")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LinkrecError>(),
        Some(LinkrecError::ServiceUnavailable(_))
    ));
    assert_eq!(
        user_message(&err, "Login failed"),
        "Service is currently unavailable. Please try again later."
    );
}

#[tokio::test]
async fn test_login_response_without_token_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;

    let (session, store) = common::session_for(&server);
    let err = AuthService::new(session, immediate())
        .login("ada@example.com", "pw")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LinkrecError>(),
        Some(LinkrecError::MissingToken)
    ));
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_unreachable_backend_is_service_unavailable() {
    let client = linkrec::api::ApiClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let session = linkrec::session::SessionManager::new(
        client,
        std::sync::Arc::new(linkrec::session::MemorySessionStore::default()),
    );
    let err = AuthService::new(session, immediate())
        .login("ada@example.com", "pw")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LinkrecError>(),
        Some(LinkrecError::ServiceUnavailable(_))
    ));
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_register_password_mismatch_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (session, _) = common::session_for(&server);
    let err = AuthService::new(session, immediate())
        .register("Ada", "ada@example.com", "one", "two")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match");
}

#[tokio::test]
async fn test_register_without_token_falls_back_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "created"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-new"})))
        .expect(1)
        .mount(&server)
        .await;

    let (session, store) = common::session_for(&server);
    let outcome = AuthService::new(session, immediate())
        .register("Ada", "ada@example.com", "pw", "pw")
        .await
        .unwrap();

    assert_eq!(outcome.session.token, "tok-new");
    assert_eq!(store.load().await.unwrap().unwrap().token, "tok-new");
}

// ---------------------------------------------------------------------------
// OAuth callback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_oauth_callback_without_access_token_makes_no_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/supabase-oauth"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (session, store) = common::session_for(&server);
    let handler = OAuthCallback::new(session, immediate());

    for url in [
        "https://app.example.com/auth/callback",
        "https://app.example.com/auth/callback#refresh_token=r",
        "https://app.example.com/auth/callback?access_token=in-query",
    ] {
        let err = handler.handle(url).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LinkrecError>(),
            Some(LinkrecError::OAuthCallback(_))
        ));
    }
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_oauth_callback_exchanges_token_and_loads_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/supabase-oauth"))
        .and(body_json(json!({"access_token": "provider-token"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "session-token"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("Authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "email": "ada@example.com",
            "name": "Ada"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, store) = common::session_for(&server);
    let mut events = session.subscribe();
    let handler = OAuthCallback::new(session, immediate());

    let outcome = handler
        .handle("https://app.example.com/auth/callback#access_token=provider-token&expires_in=3600")
        .await
        .unwrap();

    assert_eq!(outcome.navigate_to, "/dashboard");
    assert_eq!(outcome.user.unwrap().name, "Ada");
    assert_eq!(store.load().await.unwrap().unwrap().token, "session-token");
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedIn {
            email: Some("ada@example.com".to_string())
        }
    );
}

#[tokio::test]
async fn test_oauth_callback_tolerates_profile_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/supabase-oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "session-token"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (session, store) = common::session_for(&server);
    let outcome = OAuthCallback::new(session, immediate())
        .handle("#access_token=provider-token")
        .await
        .unwrap();

    assert!(outcome.user.is_none());
    assert!(store.load().await.unwrap().is_some());
}

#[tokio::test]
async fn test_oauth_exchange_without_session_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/supabase-oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let (session, store) = common::session_for(&server);
    let err = OAuthCallback::new(session, immediate())
        .handle("#access_token=provider-token")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("No session token received"));
    assert!(store.load().await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_logout_clears_session_and_broadcasts() {
    let server = MockServer::start().await;
    let (session, store) = common::session_for(&server);
    session.establish("tok", None).await.unwrap();
    let mut events = session.subscribe();
    let client = session.client().clone();

    AuthService::new(session, immediate()).logout().await.unwrap();

    assert!(store.load().await.unwrap().is_none());
    assert!(client.token().await.is_none());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut);
}
