mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn admin_builds_a_client_with_a_gallery() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;
    let client = reqwest::Client::new();
    let username = common::unique("ann");

    let res = client
        .post(server.url("/api/clients"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Ann", "username": username, "password": "pw-123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(server.url("/api/clients"))
        .bearer_auth(&token)
        .query(&[("search", username.as_str())])
        .send()
        .await?;
    let page: Value = res.json().await?;
    assert_eq!(page["total"], 1);
    assert!(page["data"][0].get("password").is_none(), "password hash leaked: {}", page);
    let client_id = page["data"][0]["_id"].as_str().unwrap_or_default().to_string();

    let gallery_name = common::unique("Wedding ");
    let res = client
        .post(server.url("/api/galleries"))
        .bearer_auth(&token)
        .json(&json!({
            "name": gallery_name,
            "folderLink": "https://drive.google.com/drive/folders/folder-abc",
            "clientId": client_id,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // One assigned gallery means a redirect straight to it
    let res = client
        .post(server.url("/api/auth/client-login"))
        .json(&json!({ "username": username, "password": "pw-123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let login: Value = res.json().await?;
    assert_eq!(login["action"], "redirect");
    assert!(login["destination"].as_str().unwrap_or_default().starts_with("/gallery/wedding-"));

    // Clearing the assignment set makes the next login a 403
    let res = client
        .put(server.url(&format!("/api/clients/{}/galleries", client_id)))
        .bearer_auth(&token)
        .json(&json!({ "galleryIds": [] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(server.url("/api/auth/client-login"))
        .json(&json!({ "username": username, "password": "pw-123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(server.url(&format!("/api/clients/{}", client_id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn duplicate_usernames_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;
    let client = reqwest::Client::new();
    let body = json!({ "name": "Dup", "username": common::unique("dup"), "password": "pw" });

    let first = client.post(server.url("/api/clients")).bearer_auth(&token).json(&body).send().await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client.post(server.url("/api/clients")).bearer_auth(&token).json(&body).send().await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let err: Value = second.json().await?;
    assert_eq!(err["message"], "Username already exists.");
    Ok(())
}

#[tokio::test]
async fn admin_endpoints_require_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::get(server.url("/api/dashboard-stats")).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn malformed_ids_get_a_json_400() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/galleries/not-a-uuid"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let content_type = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "content type was {}", content_type);
    let err: Value = res.json().await?;
    assert_eq!(err["message"], "Invalid gallery id.");
    assert_eq!(err["error"], true);
    Ok(())
}

#[tokio::test]
async fn client_edits_show_up_on_the_next_fetch() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;
    let client = reqwest::Client::new();
    let username = common::unique("edit");

    let res = client
        .post(server.url("/api/clients"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Before", "username": username, "password": "pw-old" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let page: Value = client
        .get(server.url("/api/clients"))
        .bearer_auth(&token)
        .query(&[("search", username.as_str())])
        .send()
        .await?
        .json()
        .await?;
    let client_id = page["data"][0]["_id"].as_str().unwrap_or_default().to_string();

    let renamed = format!("{}-renamed", username);
    let res = client
        .put(server.url(&format!("/api/clients/{}", client_id)))
        .bearer_auth(&token)
        .json(&json!({ "name": "After", "username": renamed }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Client updated successfully.");

    let page: Value = client
        .get(server.url("/api/clients"))
        .bearer_auth(&token)
        .query(&[("search", renamed.as_str())])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["_id"], client_id.as_str());
    assert_eq!(page["data"][0]["name"], "After");
    assert_eq!(page["data"][0]["username"], renamed.as_str());

    // No password in the update keeps the old one
    let res = client
        .post(server.url("/api/auth/client-login"))
        .json(&json!({ "username": renamed, "password": "pw-old" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
