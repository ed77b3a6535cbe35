/// Task model and repository specialization
///
/// Tasks are the sole domain entity of the system. Persistence goes through
/// the generic repository (`crate::repo`); this module contributes the
/// table descriptor, the per-entity insert/patch SQL, and the one
/// entity-specific query (listing filtered by status).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, TaskRepository, TaskStatus};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let task = TaskRepository::create(
///     &pool,
///     CreateTask {
///         title: "Ship release".to_string(),
///         description: None,
///     },
/// )
/// .await?;
/// assert_eq!(task.status, TaskStatus::Pending);
///
/// let pending = TaskRepository::list_by_status(&pool, Some(TaskStatus::Pending)).await?;
/// assert!(!pending.is_empty());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::repo::{Entity, Persist, RepoError, Repository};

/// Task lifecycle status
///
/// Single source of truth shared by the storage mapping (`sqlx::Type`
/// against the `task_status` Postgres enum) and the wire format (serde,
/// `snake_case`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Newly created, nothing done yet (the creation default)
    Pending,

    /// Someone is working on it
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Status as its wire/storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Task model
///
/// `id` and `created_at` are store-assigned and immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id, never reused
    pub id: i64,

    /// Short human-readable title, never empty
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// When the row was inserted
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// There is deliberately no status field: every task starts as `pending`
/// via the column default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title (required, non-empty)
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Input for partially updating a task
///
/// Only fields that are `Some` are written. `description` is doubly
/// optional: `Some(None)` clears it, `None` leaves it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,
}

impl UpdateTask {
    /// True when the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

impl Entity for Task {
    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static str = "id, title, description, status, created_at";
    const NAME: &'static str = "task";
}

#[async_trait]
impl Persist for Task {
    type Create = CreateTask;
    type Patch = UpdateTask;

    async fn insert(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, status, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    async fn apply_patch(
        pool: &PgPool,
        id: i64,
        patch: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // An empty patch is a no-op update: hand back the current row.
        if patch.is_empty() {
            return sqlx::query_as::<_, Task>(
                "SELECT id, title, description, status, created_at FROM tasks WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(pool)
            .await;
        }

        // Build the update statement from whichever fields are present
        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if patch.title.is_some() {
            bind_count += 1;
            assignments.push(format!("title = ${}", bind_count));
        }
        if patch.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }
        if patch.status.is_some() {
            bind_count += 1;
            assignments.push(format!("status = ${}", bind_count));
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 RETURNING id, title, description, status, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(description) = patch.description {
            q = q.bind(description);
        }
        if let Some(status) = patch.status {
            q = q.bind(status);
        }

        q.fetch_optional(pool).await
    }
}

/// The task repository: generic CRUD plus the status filter below
pub type TaskRepository = Repository<Task>;

impl Repository<Task> {
    /// Lists tasks, optionally restricted to one status
    ///
    /// With `None` this is plain [`Repository::list`]; with `Some(status)`
    /// only rows whose status equals the filter are returned. Zero matches
    /// yield an empty vec, not an error.
    pub async fn list_by_status(
        pool: &PgPool,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, RepoError> {
        match status {
            Some(status) => {
                let tasks = sqlx::query_as::<_, Task>(
                    "SELECT id, title, description, status, created_at FROM tasks WHERE status = $1",
                )
                .bind(status)
                .fetch_all(pool)
                .await?;

                Ok(tasks)
            }
            None => Self::list(pool).await,
        }
    }
}
