#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower::ServiceExt;

use gram_api::auth::TokenService;
use gram_api::database::DatabaseManager;
use gram_api::routes::{router, AppState};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

pub const TEST_SECRET: &str = "gram-api-integration-secret";

/// Pool against DATABASE_URL with the schema applied, or None when no database is
/// configured so the suite passes on machines without Postgres.
pub async fn pool() -> Result<Option<PgPool>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    MIGRATED
        .get_or_try_init(|| async { DatabaseManager::migrate(&pool).await })
        .await?;

    Ok(Some(pool))
}

pub fn tokens() -> TokenService {
    TokenService::new(TEST_SECRET, 1).expect("secret is not empty")
}

pub fn app(pool: &PgPool) -> Router {
    router(AppState::with_pool(pool.clone(), tokens()))
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@gram.test", prefix, uuid::Uuid::new_v4().simple())
}

pub async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-access-token", token);
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

/// Register through the API; returns (userIdx, jwt)
pub async fn register(app: &Router, email: &str) -> Result<(i64, String)> {
    let body = serde_json::json!({
        "name": "Test User",
        "nickName": email.split('@').next().unwrap_or("user"),
        "email": email,
        "password": "pa55word",
    });
    let (status, body) = send(app, Method::POST, "/users", None, Some(body)).await?;
    anyhow::ensure!(status == StatusCode::OK, "register failed: {}", body);

    let user_idx = body["result"]["userIdx"].as_i64().context("userIdx missing")?;
    let jwt = body["result"]["jwt"].as_str().context("jwt missing")?.to_string();
    Ok((user_idx, jwt))
}

/// The API has no follow endpoint; follows are written directly
pub async fn follow(pool: &PgPool, follower_idx: i64, followee_idx: i64) -> Result<()> {
    sqlx::query("INSERT INTO follows (follower_idx, followee_idx) VALUES ($1, $2)")
        .bind(follower_idx)
        .bind(followee_idx)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn like(pool: &PgPool, post_idx: i64, user_idx: i64) -> Result<()> {
    sqlx::query("INSERT INTO post_likes (post_idx, user_idx) VALUES ($1, $2)")
        .bind(post_idx)
        .bind(user_idx)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn comment(pool: &PgPool, post_idx: i64, user_idx: i64, content: &str) -> Result<()> {
    sqlx::query("INSERT INTO comments (post_idx, user_idx, content) VALUES ($1, $2, $3)")
        .bind(post_idx)
        .bind(user_idx)
        .bind(content)
        .execute(pool)
        .await?;
    Ok(())
}
