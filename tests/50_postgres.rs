mod common;

use std::sync::Arc;

use anyhow::Result;
use blog_api_rust::config::DatabaseConfig;
use blog_api_rust::config::StoreBackend;
use blog_api_rust::database::PgRepository;
use reqwest::StatusCode;

/// Runs the blog flow against Postgres when TEST_DATABASE_URL is set.
/// Each run uses unique emails so an existing database can be reused.
#[tokio::test]
async fn blog_flow_against_postgres() -> Result<()> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return Ok(());
    };

    let repo = PgRepository::connect(&DatabaseConfig {
        backend: StoreBackend::Postgres,
        url: Some(url),
        max_connections: 2,
        connection_timeout: 5,
    })
    .await?;
    let server = common::TestServer::spawn_with(Arc::new(repo)).await?;

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let alice_email = format!("alice-{}@example.com", suffix);
    let bob_email = format!("bob-{}@example.com", suffix);

    let alice = server.signup(&alice_email, "secret1").await?;
    let bob = server.signup(&bob_email, "secret2").await?;

    let res = server.register(&alice_email, "again").await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let blog = server.create_blog(&alice, "Hello", "World").await?;
    assert_eq!(blog["author"]["email"], alice_email.as_str());
    let url = server.url(&format!("/api/blogs/{}", blog["id"].as_str().unwrap_or_default()));

    let res = server.http.delete(&url).bearer_auth(&bob).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .http
        .put(&url)
        .bearer_auth(&alice)
        .json(&serde_json::json!({ "content": "Updated" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await?;
    assert_eq!(updated["title"], "Hello");
    assert_eq!(updated["content"], "Updated");

    let res = server.http.delete(&url).bearer_auth(&alice).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = server.http.get(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
