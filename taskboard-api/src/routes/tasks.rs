/// Task CRUD endpoints
///
/// All routes here sit behind the bearer-token gate; the handlers never
/// inspect the principal, being authenticated is the entire policy (there
/// is no per-user ownership of tasks).
///
/// # Endpoints
///
/// - `GET    /tasks` - list tasks, optional `?status=` filter
/// - `GET    /tasks/:id` - fetch one task
/// - `POST   /tasks` - create a task (always starts as `pending`)
/// - `PATCH  /tasks/:id` - partial update
/// - `DELETE /tasks/:id` - delete, answers with a confirmation message
///
/// One deliberate quirk carried over from the service this replaces: a list
/// request whose result is empty answers **404**, not `200 []`. Clients
/// depend on it.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use taskboard_shared::models::task::{CreateTask, Task, TaskRepository, TaskStatus, UpdateTask};
use validator::Validate;

/// Query parameters for the list endpoint
///
/// A `status` value outside pending|in_progress|done fails deserialization
/// and is rejected before the handler runs.
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// Restrict the listing to one status
    pub status: Option<TaskStatus>,
}

/// Create request body
///
/// No status field: clients cannot choose a status at creation time, every
/// task starts as `pending`. Unknown JSON fields are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Partial update request body
///
/// Any subset of the three fields; absent fields are left untouched. For
/// `description`, an explicit `null` clears the column while omitting the
/// field keeps the current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New description (explicit null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,
}

/// Delete confirmation payload
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskDeletedResponse {
    /// Confirmation message
    pub message: String,
}

/// Distinguishes a field set to null from a field that is absent
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// List tasks, optionally filtered by status
///
/// # Errors
///
/// - `404 Not Found`: the result is empty (filtered or not)
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    tracing::debug!(status = ?query.status, "Listing tasks");

    let tasks = TaskRepository::list_by_status(&state.db, query.status).await?;

    // Empty result is an error here, not an empty list
    if tasks.is_empty() {
        return Err(ApiError::NotFound("No tasks found".to_string()));
    }

    Ok(Json(tasks))
}

/// Fetch a single task by id
///
/// # Errors
///
/// - `404 Not Found`: no task has that id
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = TaskRepository::get(&state.db, id).await?;

    Ok(Json(task))
}

/// Create a new task
///
/// The created task always starts as `pending` with a store-assigned id and
/// creation timestamp.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: empty title
/// - `400 Bad Request`: the insert violated a store constraint
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = TaskRepository::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    tracing::debug!(task_id = task.id, "Task created");

    Ok(Json(task))
}

/// Partially update a task
///
/// Only the supplied fields change. An empty body is a valid no-op update
/// answering with the unchanged task.
///
/// # Errors
///
/// - `404 Not Found`: no task has that id
/// - `400 Bad Request`: the update violated a store constraint
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    // Resolve existence first so a missing id reads as 404
    TaskRepository::get(&state.db, id).await?;

    let task = TaskRepository::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
        },
    )
    .await?;

    tracing::debug!(task_id = task.id, "Task updated");

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: no task has that id
/// - `400 Bad Request`: a store constraint blocked the deletion
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskDeletedResponse>> {
    // Read before the mutation: deleting an absent id is 404, not success
    TaskRepository::get(&state.db, id).await?;

    TaskRepository::delete(&state.db, id).await?;

    tracing::debug!(task_id = id, "Task deleted");

    Ok(Json(TaskDeletedResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
