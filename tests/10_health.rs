mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn head_todos_is_200_without_credentials() -> Result<()> {
    let app = common::test_app();

    let response = common::send(&app, "HEAD", "/todos", None, None).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_bytes(response).await?;
    assert!(body.is_empty());
    Ok(())
}

#[tokio::test]
async fn head_todos_ignores_presented_credentials() -> Result<()> {
    let app = common::test_app();
    let auth = common::bearer_for("alice", &["TaskUser"]);

    let response = common::send(&app, "HEAD", "/todos", Some(&auth), None).await?;
    assert_eq!(response.status(), StatusCode::OK);

    // A garbage credential must not break the probe either
    let response = common::send(&app, "HEAD", "/todos", Some("Bearer junk"), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn get_todos_still_requires_credentials() -> Result<()> {
    let app = common::test_app();

    // Same path, different method: the probe does not open GET to anonymous
    let response = common::send(&app, "GET", "/todos", None, None).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
