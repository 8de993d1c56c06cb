mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn signup_then_login() -> Result<()> {
    let server = common::TestServer::start().await?;
    let client = reqwest::Client::new();
    server.signup(&client, "login@example.com").await?;

    let res = client
        .post(server.url("/login"))
        .json(&json!({ "email": "login@example.com", "password": "pw-123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);

    // The login token works on cart routes
    let token = body["token"].as_str().unwrap_or_default();
    server.get_cart(&client, token).await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_signup_and_bad_login_are_400() -> Result<()> {
    let server = common::TestServer::start().await?;
    let client = reqwest::Client::new();
    server.signup(&client, "dup@example.com").await?;

    let res = client
        .post(server.url("/signup"))
        .json(&json!({ "username": "Again", "email": "dup@example.com", "password": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"], "existing user found with this email");

    let res = client
        .post(server.url("/login"))
        .json(&json!({ "email": "dup@example.com", "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
