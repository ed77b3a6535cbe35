/// Database models for Taskboard
///
/// # Models
///
/// - `task`: the tracked domain entity, persisted through the generic
///   repository in `crate::repo`
/// - `user`: user accounts, owned by the authentication layer
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, TaskRepository};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let task = TaskRepository::create(
///     &pool,
///     CreateTask {
///         title: "Write report".to_string(),
///         description: Some("Quarterly numbers".to_string()),
///     },
/// )
/// .await?;
/// println!("Created task {}", task.id);
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
