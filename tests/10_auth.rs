mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn sign_up_returns_user_without_secrets() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/sign-up",
            None,
            Some(json!({
                "credentials": {
                    "email": "caleb@example.com",
                    "password": "12345",
                    "password_confirmation": "12345"
                }
            })),
        )
        .await?;

    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert_eq!(body["user"]["email"], "caleb@example.com");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("hashed_password").is_none());
    assert!(body["user"].get("token").is_none());
    Ok(())
}

#[tokio::test]
async fn sign_up_rejects_bad_input() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/sign-up",
            None,
            Some(json!({
                "credentials": {
                    "email": "caleb@example.com",
                    "password": "12345",
                    "password_confirmation": "54321"
                }
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "ValidationError");
    assert!(body["error"]["fields"]["password_confirmation"].is_string());

    let (status, _) = app
        .request(Method::POST, "/sign-up", None, Some(json!({})))
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> Result<()> {
    let app = TestApp::new();
    app.sign_up_and_in("caleb@example.com").await?;

    let (status, _) = app
        .request(
            Method::POST,
            "/sign-up",
            None,
            Some(json!({
                "credentials": {
                    "email": "caleb@example.com",
                    "password": "other",
                    "password_confirmation": "other"
                }
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn sign_in_with_wrong_password_is_unauthorized() -> Result<()> {
    let app = TestApp::new();
    app.sign_up_and_in("caleb@example.com").await?;

    let (status, body) = app
        .request(
            Method::POST,
            "/sign-in",
            None,
            Some(json!({ "credentials": { "email": "caleb@example.com", "password": "nope" } })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_null());
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_known_token() -> Result<()> {
    let app = TestApp::new();

    let (status, _) = app.request(Method::GET, "/recipes", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::GET, "/recipes", Some("Bearer notarealtoken"), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::POST, "/recipes", None, Some(json!({ "recipe": common::soup() })))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn legacy_token_header_is_accepted() -> Result<()> {
    let app = TestApp::new();
    let token = app.sign_up_and_in("caleb@example.com").await?;

    let header = format!("Token token={}", token);
    let (status, body) = app.request(Method::GET, "/recipes", Some(&header), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipes"], json!([]));
    Ok(())
}

#[tokio::test]
async fn sign_out_revokes_token() -> Result<()> {
    let app = TestApp::new();
    let token = app.sign_up_and_in("caleb@example.com").await?;

    let (status, _) = app.as_user(Method::DELETE, "/sign-out", &token, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.as_user(Method::GET, "/recipes", &token, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn change_password_rotates_credentials() -> Result<()> {
    let app = TestApp::new();
    let token = app.sign_up_and_in("caleb@example.com").await?;

    let (status, _) = app
        .as_user(
            Method::PATCH,
            "/change-password",
            &token,
            Some(json!({ "passwords": { "old": "wrong", "new": "fresh" } })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .as_user(
            Method::PATCH,
            "/change-password",
            &token,
            Some(json!({ "passwords": { "old": "secret", "new": "fresh" } })),
        )
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let sign_in = |password: &str| {
        json!({ "credentials": { "email": "caleb@example.com", "password": password } })
    };
    let (status, _) = app
        .request(Method::POST, "/sign-in", None, Some(sign_in("secret")))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::POST, "/sign-in", None, Some(sign_in("fresh")))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}
