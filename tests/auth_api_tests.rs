mod support;

use lumo::auth::Credential;
use lumo::error::LumoError;
use lumo::types::VerificationOutcome;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_stores_issued_credential_and_notifies() {
    let server = MockServer::start().await;
    support::mount_csrf(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("csrf-token", "csrf-1"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "issued",
            "user": { "id": "u1", "username": "ada", "email": "ada@example.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = support::client(&server);
    let mut changes = client.store().subscribe();
    let response = client.auth().login("ada@example.com", "pw").await.unwrap();

    assert!(response.is_success());
    assert_eq!(response.user.unwrap().username, "ada");
    assert_eq!(client.store().get(), Some(Credential::new("issued")));
    assert!(changes.try_recv().is_ok());
}

#[tokio::test]
async fn rejected_login_never_refreshes() {
    let server = MockServer::start().await;
    support::mount_csrf(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = support::client(&server);
    let err = client.auth().login("ada@example.com", "bad").await.unwrap_err();

    match err {
        LumoError::RequestFailed { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
    assert!(client.store().get().is_none());
}

#[tokio::test]
async fn unverified_login_is_reported_without_credential() {
    let server = MockServer::start().await;
    support::mount_csrf(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Please verify your email first"
        })))
        .mount(&server)
        .await;

    let client = support::client(&server);
    let response = client.auth().login("ada@example.com", "pw").await.unwrap();

    assert!(response.needs_verification());
    assert!(client.store().get().is_none());
}

#[tokio::test]
async fn logout_clears_store_even_when_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "abc");
    client.auth().logout().await;

    assert!(client.store().get().is_none());
    assert!(!client.store().has_persisted());
}

#[tokio::test]
async fn me_returns_signed_in_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": "u1",
                "username": "ada",
                "email": "ada@example.com",
                "isVerified": true,
                "createdAt": "2024-01-02T03:04:05Z"
            }
        })))
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "abc");
    let user = client.auth().me().await.unwrap();

    assert_eq!(user.username, "ada");
    assert!(user.is_verified);
}

#[tokio::test]
async fn signup_and_password_forms_send_csrf_token() {
    let server = MockServer::start().await;
    support::mount_csrf(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(header("csrf-token", "csrf-1"))
        .and(body_json(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .and(header("csrf-token", "csrf-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .and(body_json(json!({
            "token": "reset-1",
            "email": "ada@example.com",
            "newPassword": "new-pw"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Reset link expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = support::client(&server);
    let auth = client.auth();
    assert!(auth.signup("ada", "ada@example.com", "pw").await.unwrap().is_success());
    assert!(auth.forgot_password("ada@example.com").await.unwrap().is_success());
    let reset = auth
        .reset_password("reset-1", "ada@example.com", "new-pw")
        .await
        .unwrap();
    assert!(!reset.is_success());
    assert_eq!(reset.message.as_deref(), Some("Reset link expired"));
}

#[tokio::test]
async fn verify_email_classifies_backend_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify-email"))
        .and(query_param("token", "good"))
        .and(query_param("email", "ada@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify-email"))
        .and(query_param("token", "old"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Token expired" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify-email"))
        .and(query_param("token", "bogus"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Invalid token" })),
        )
        .mount(&server)
        .await;

    let client = support::client(&server);
    let auth = client.auth();
    let email = Some("ada@example.com");

    assert_eq!(auth.verify_email(Some("good"), email).await, VerificationOutcome::Verified);
    assert_eq!(auth.verify_email(Some("old"), email).await, VerificationOutcome::Expired);
    assert_eq!(auth.verify_email(Some("bogus"), email).await, VerificationOutcome::Invalid);
}

#[tokio::test]
async fn verify_email_without_token_skips_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify-email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = support::client(&server);
    assert_eq!(
        client.auth().verify_email(None, Some("ada@example.com")).await,
        VerificationOutcome::Invalid
    );
    assert_eq!(
        client.auth().verify_email(Some("  "), Some("ada@example.com")).await,
        VerificationOutcome::Invalid
    );
}

#[tokio::test]
async fn resend_verification_posts_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/resend-verification"))
        .and(body_json(json!({ "email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = support::client(&server);
    client
        .auth()
        .resend_verification("ada@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn unauthorized_csrf_fetch_never_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/csrf"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;

    let client = support::signed_in_client(&server, "abc");
    let err = client.auth().login("ada@example.com", "pw").await.unwrap_err();

    assert!(
        matches!(err, LumoError::RequestFailed { status: Some(401), .. }),
        "got {err:?}"
    );
    assert_eq!(client.store().get(), Some(Credential::new("abc")));
}
