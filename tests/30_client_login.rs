mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn unknown_client_gets_invalid_credentials() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .post(server.url("/api/auth/client-login"))
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Invalid client credentials.");
    Ok(())
}

#[tokio::test]
async fn gallery_listing_requires_a_client_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::get(server.url("/api/my-gallery?slug=anything")).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Client authentication failed.");
    Ok(())
}

#[tokio::test]
async fn empty_selection_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .post(server.url("/api/submit"))
        .json(&json!({
            "clientName": "Ann",
            "clientEmail": "ann@example.com",
            "clientPhone": "5551234567",
            "selectedPhotos": [],
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
