/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - a throwaway database per test (created, migrated, dropped)
/// - test user creation and JWT minting
/// - a request helper driving the router through `tower::Service`
///
/// Tests expect `DATABASE_URL` and `JWT_SECRET` in the environment (or a
/// `.env` file), the same variables the server itself uses. Each test
/// context appends a unique suffix to the database name, so tests can run
/// in parallel against one PostgreSQL server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::auth::jwt::{create_token, Claims};
use taskboard_shared::db::migrations::{drop_database, ensure_database_exists};
use taskboard_shared::models::task::{Task, TaskStatus};
use taskboard_shared::models::user::{CreateUser, User};
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub database_url: String,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let mut config = Config::from_env()?;

        // Unique throwaway database per test
        let database_url = format!(
            "{}_test_{}",
            config.database.url,
            Uuid::new_v4().simple()
        );
        ensure_database_exists(&database_url).await?;

        let db = PgPool::connect(&database_url).await?;

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        // Create test user
        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: "test-hash".to_string(),
            },
        )
        .await?;

        // Mint a bearer token directly, skipping the login endpoint
        let claims = Claims::new(user.id);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        // Build app against the test database
        config.database.url = database_url.clone();
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            database_url,
            user,
            jwt_token,
        })
    }

    /// Returns the authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Drops the throwaway database
    pub async fn cleanup(self) -> anyhow::Result<()> {
        self.db.close().await;
        drop_database(&self.database_url).await?;
        Ok(())
    }
}

/// Sends a request through the router and returns status plus parsed body
pub async fn send_request(
    app: axum::Router,
    method: &str,
    uri: &str,
    auth_header: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut app = app;

    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth_header {
        builder = builder.header("authorization", auth);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Seeds a task row directly, bypassing the create schema
///
/// The API never lets a client pick a status at creation time, so fixtures
/// that need a non-pending task insert it here.
pub async fn seed_task(
    db: &PgPool,
    title: &str,
    description: Option<&str>,
    status: TaskStatus,
) -> anyhow::Result<Task> {
    let task = sqlx::query_as::<_, Task>(
        r#"
        INSERT INTO tasks (title, description, status)
        VALUES ($1, $2, $3)
        RETURNING id, title, description, status, created_at
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(status)
    .fetch_one(db)
    .await?;

    Ok(task)
}
