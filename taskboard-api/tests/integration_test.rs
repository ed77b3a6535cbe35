/// Integration tests for the Taskboard API
///
/// These tests verify the full system end-to-end against a real database:
/// - task CRUD with authentication
/// - the status filter and the empty-list-is-404 contract
/// - partial-update semantics, field by field
/// - registration and login

mod common;

use axum::http::StatusCode;
use common::{seed_task, send_request, TestContext};
use serde_json::json;
use taskboard_shared::models::task::TaskStatus;

/// Creating a task assigns id and created_at and always starts as pending
#[tokio::test]
async fn test_create_task_defaults_to_pending() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send_request(
        ctx.app.clone(),
        "POST",
        "/tasks",
        Some(&ctx.auth_header()),
        Some(json!({"title": "Write report", "description": "Quarterly numbers"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(body["title"], "Write report");
    assert_eq!(body["description"], "Quarterly numbers");
    assert_eq!(body["status"], "pending");
    assert!(body["id"].is_i64());
    assert!(body["created_at"].is_string());

    ctx.cleanup().await.unwrap();
}

/// A status smuggled into the create body is dropped by the schema
#[tokio::test]
async fn test_create_task_ignores_client_status() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send_request(
        ctx.app.clone(),
        "POST",
        "/tasks",
        Some(&ctx.auth_header()),
        Some(json!({"title": "Sneaky", "status": "done"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    ctx.cleanup().await.unwrap();
}

/// An empty title fails validation
#[tokio::test]
async fn test_create_task_empty_title_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send_request(
        ctx.app.clone(),
        "POST",
        "/tasks",
        Some(&ctx.auth_header()),
        Some(json!({"title": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    ctx.cleanup().await.unwrap();
}

/// GET by id returns the exact row
#[tokio::test]
async fn test_get_task() {
    let ctx = TestContext::new().await.unwrap();

    let task = seed_task(&ctx.db, "Test Task", Some("Test Desc"), TaskStatus::Pending)
        .await
        .unwrap();

    let (status, body) = send_request(
        ctx.app.clone(),
        "GET",
        &format!("/tasks/{}", task.id),
        Some(&ctx.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], task.id);
    assert_eq!(body["title"], "Test Task");
    assert_eq!(body["description"], "Test Desc");
    assert_eq!(body["status"], "pending");

    ctx.cleanup().await.unwrap();
}

/// GET with an unknown id answers 404
#[tokio::test]
async fn test_get_nonexistent_task() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send_request(
        ctx.app.clone(),
        "GET",
        "/tasks/9999",
        Some(&ctx.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    ctx.cleanup().await.unwrap();
}

/// Patches change exactly the supplied fields and nothing else
async fn assert_patch(
    update: serde_json::Value,
    expected_title: &str,
    expected_description: &str,
    expected_status: &str,
) {
    let ctx = TestContext::new().await.unwrap();

    let task = seed_task(&ctx.db, "Test Task", Some("Test Desc"), TaskStatus::Pending)
        .await
        .unwrap();

    let (status, body) = send_request(
        ctx.app.clone(),
        "PATCH",
        &format!("/tasks/{}", task.id),
        Some(&ctx.auth_header()),
        Some(update),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(body["title"], expected_title);
    assert_eq!(body["description"], expected_description);
    assert_eq!(body["status"], expected_status);
    assert_eq!(body["id"], task.id);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_update_task_title_only() {
    assert_patch(
        json!({"title": "Updated Title"}),
        "Updated Title",
        "Test Desc",
        "pending",
    )
    .await;
}

#[tokio::test]
async fn test_update_task_description_only() {
    assert_patch(
        json!({"description": "New Description"}),
        "Test Task",
        "New Description",
        "pending",
    )
    .await;
}

#[tokio::test]
async fn test_update_task_status_only() {
    assert_patch(json!({"status": "done"}), "Test Task", "Test Desc", "done").await;
}

#[tokio::test]
async fn test_update_task_all_fields() {
    assert_patch(
        json!({"title": "New Title", "description": "New Desc", "status": "in_progress"}),
        "New Title",
        "New Desc",
        "in_progress",
    )
    .await;
}

/// An empty patch is a valid no-op update
#[tokio::test]
async fn test_update_task_empty_patch_is_noop() {
    assert_patch(json!({}), "Test Task", "Test Desc", "pending").await;
}

/// An explicit null clears the description; omitting the field keeps it
#[tokio::test]
async fn test_update_task_null_clears_description() {
    let ctx = TestContext::new().await.unwrap();

    let task = seed_task(&ctx.db, "Test Task", Some("Test Desc"), TaskStatus::Pending)
        .await
        .unwrap();

    let (status, body) = send_request(
        ctx.app.clone(),
        "PATCH",
        &format!("/tasks/{}", task.id),
        Some(&ctx.auth_header()),
        Some(json!({"description": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], serde_json::Value::Null);
    assert_eq!(body["title"], "Test Task");

    ctx.cleanup().await.unwrap();
}

/// PATCH on an unknown id answers 404
#[tokio::test]
async fn test_update_nonexistent_task() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _body) = send_request(
        ctx.app.clone(),
        "PATCH",
        "/tasks/9999",
        Some(&ctx.auth_header()),
        Some(json!({"title": "whatever"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// DELETE answers with a confirmation; the row is observably gone
#[tokio::test]
async fn test_delete_task_then_get_returns_404() {
    let ctx = TestContext::new().await.unwrap();

    let task = seed_task(&ctx.db, "Test Task", Some("Test Desc"), TaskStatus::Pending)
        .await
        .unwrap();

    let (status, body) = send_request(
        ctx.app.clone(),
        "DELETE",
        &format!("/tasks/{}", task.id),
        Some(&ctx.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");

    let (status, _body) = send_request(
        ctx.app.clone(),
        "GET",
        &format!("/tasks/{}", task.id),
        Some(&ctx.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// DELETE on an unknown id answers 404
#[tokio::test]
async fn test_delete_nonexistent_task() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _body) = send_request(
        ctx.app.clone(),
        "DELETE",
        "/tasks/9999",
        Some(&ctx.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// Seeds one task per status, returning their ids in order
async fn seed_three_statuses(ctx: &TestContext) -> Vec<i64> {
    let mut ids = Vec::new();
    for (i, status) in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done]
        .into_iter()
        .enumerate()
    {
        let task = seed_task(
            &ctx.db,
            &format!("Task {}", i + 1),
            Some(&format!("Desc {}", i + 1)),
            status,
        )
        .await
        .unwrap();
        ids.push(task.id);
    }
    ids
}

/// Unfiltered listing returns every row
#[tokio::test]
async fn test_list_tasks() {
    let ctx = TestContext::new().await.unwrap();
    let ids = seed_three_statuses(&ctx).await;

    let (status, body) = send_request(
        ctx.app.clone(),
        "GET",
        "/tasks",
        Some(&ctx.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let tasks = body.as_array().expect("list response should be an array");
    assert_eq!(tasks.len(), 3);
    for id in ids {
        assert!(tasks.iter().any(|t| t["id"] == id));
    }

    ctx.cleanup().await.unwrap();
}

/// A filtered listing returns only, and all, rows with that status
#[tokio::test]
async fn test_list_tasks_filtered_by_status() {
    let ctx = TestContext::new().await.unwrap();
    let ids = seed_three_statuses(&ctx).await;

    for (filter, expected_id) in [
        ("pending", ids[0]),
        ("in_progress", ids[1]),
        ("done", ids[2]),
    ] {
        let (status, body) = send_request(
            ctx.app.clone(),
            "GET",
            &format!("/tasks?status={}", filter),
            Some(&ctx.auth_header()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let tasks = body.as_array().expect("list response should be an array");
        assert!(tasks.iter().all(|t| t["status"] == filter));
        assert!(tasks.iter().any(|t| t["id"] == expected_id));
    }

    ctx.cleanup().await.unwrap();
}

/// Listing an empty table answers 404, not an empty list
#[tokio::test]
async fn test_list_tasks_empty_table_is_404() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send_request(
        ctx.app.clone(),
        "GET",
        "/tasks",
        Some(&ctx.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No tasks found");

    ctx.cleanup().await.unwrap();
}

/// A filter matching nothing also answers 404
#[tokio::test]
async fn test_list_tasks_filter_without_matches_is_404() {
    let ctx = TestContext::new().await.unwrap();

    seed_task(&ctx.db, "Only pending", None, TaskStatus::Pending)
        .await
        .unwrap();

    let (status, _body) = send_request(
        ctx.app.clone(),
        "GET",
        "/tasks?status=done",
        Some(&ctx.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// An invalid status filter is rejected, not silently ignored
#[tokio::test]
async fn test_list_tasks_invalid_status_rejected() {
    let ctx = TestContext::new().await.unwrap();

    seed_task(&ctx.db, "Some task", None, TaskStatus::Pending)
        .await
        .unwrap();

    let (status, _body) = send_request(
        ctx.app.clone(),
        "GET",
        "/tasks?status=archived",
        Some(&ctx.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

/// Every task endpoint rejects missing tokens before touching the store
#[tokio::test]
async fn test_authentication_required() {
    let ctx = TestContext::new().await.unwrap();

    for (method, uri, body) in [
        ("GET", "/tasks", None),
        ("GET", "/tasks/1", None),
        ("POST", "/tasks", Some(json!({"title": "t"}))),
        ("PATCH", "/tasks/1", Some(json!({"title": "t"}))),
        ("DELETE", "/tasks/1", None),
    ] {
        let (status, _body) = send_request(ctx.app.clone(), method, uri, None, body).await;
        assert_eq!(
            status,
            StatusCode::UNAUTHORIZED,
            "{} {} should require auth",
            method,
            uri
        );
    }

    ctx.cleanup().await.unwrap();
}

/// Garbage tokens are rejected with 401
#[tokio::test]
async fn test_invalid_token_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _body) = send_request(
        ctx.app.clone(),
        "GET",
        "/tasks",
        Some("Bearer not-a-real-token"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Register, login, and read the profile with the issued token
#[tokio::test]
async fn test_register_login_profile_flow() {
    let ctx = TestContext::new().await.unwrap();

    let email = format!("flow-{}@example.com", uuid::Uuid::new_v4());

    let (status, body) = send_request(
        ctx.app.clone(),
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "password": "secret123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["is_active"], true);
    assert!(body.get("password_hash").is_none());

    let (status, body) = send_request(
        ctx.app.clone(),
        "POST",
        "/auth/jwt/login",
        None,
        Some(json!({"email": email, "password": "secret123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = send_request(
        ctx.app.clone(),
        "GET",
        "/users/me",
        Some(&format!("Bearer {}", token)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email.as_str());

    ctx.cleanup().await.unwrap();
}

/// Wrong password and duplicate registration are rejected
#[tokio::test]
async fn test_login_and_register_failures() {
    let ctx = TestContext::new().await.unwrap();

    let email = format!("fail-{}@example.com", uuid::Uuid::new_v4());

    let (status, _body) = send_request(
        ctx.app.clone(),
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Wrong password
    let (status, _body) = send_request(
        ctx.app.clone(),
        "POST",
        "/auth/jwt/login",
        None,
        Some(json!({"email": email, "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Duplicate registration
    let (status, body) = send_request(
        ctx.app.clone(),
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");

    // Password policy: too short
    let (status, _body) = send_request(
        ctx.app.clone(),
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": format!("short-{}@example.com", uuid::Uuid::new_v4()), "password": "ab"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}
