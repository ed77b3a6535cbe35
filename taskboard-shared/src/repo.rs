/// Generic CRUD repository
///
/// This module separates "how to persist any entity" from "which entity and
/// which extra filters". [`Repository`] provides id-based lookup, listing,
/// creation, partial update, and deletion for any type implementing
/// [`Entity`] and [`Persist`]; an entity adds its own filtered queries as
/// inherent methods on its `Repository` instantiation (see
/// `models::task::TaskRepository`).
///
/// Every function takes the pool explicitly. There is no ambient session:
/// the per-request connection flows through the call chain, which keeps the
/// repository substitutable in tests.
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
///         description: None,
///     },
/// )
/// .await?;
///
/// let found = TaskRepository::get(&pool, task.id).await?;
/// assert_eq!(found.title, "Write report");
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use std::marker::PhantomData;
use tracing::debug;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No row exists with the requested id
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A store-level integrity constraint rejected the mutation
    #[error("error while {op} {entity}")]
    Conflict { entity: &'static str, op: &'static str },

    /// Any other database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Table descriptor for a persisted entity
///
/// Implementors supply the table name, the select column list, and the name
/// used in error messages. Everything id-shaped ([`Repository::get`],
/// [`Repository::list`], [`Repository::delete`]) is derived from these
/// constants alone.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin + Sized {
    /// Table name
    const TABLE: &'static str;

    /// Comma-separated select column list
    const COLUMNS: &'static str;

    /// Entity name used in error messages
    const NAME: &'static str;
}

/// Per-entity insert and partial-update statements
///
/// Only the SQL that depends on the entity's column set lives here; the
/// error mapping and not-found handling stay in [`Repository`].
#[async_trait]
pub trait Persist: Entity {
    /// Input for creating a new row
    type Create: Send;

    /// Input for partially updating a row
    type Patch: Send;

    /// Inserts a new row, returning it with store-assigned fields
    async fn insert(pool: &PgPool, data: Self::Create) -> Result<Self, sqlx::Error>;

    /// Applies a partial update to the row with the given id
    ///
    /// Only fields present in the patch change; an empty patch must return
    /// the current row unchanged. Returns `None` if no row has that id.
    async fn apply_patch(
        pool: &PgPool,
        id: i64,
        patch: Self::Patch,
    ) -> Result<Option<Self>, sqlx::Error>;
}

/// Generic CRUD operations over one entity type
///
/// A zero-sized type; all operations are associated functions taking the
/// pool explicitly.
pub struct Repository<E> {
    _entity: PhantomData<E>,
}

impl<E: Entity> Repository<E> {
    /// Fetches the row with the given id
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] when no row has that id.
    pub async fn get(pool: &PgPool, id: i64) -> Result<E, RepoError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            E::COLUMNS,
            E::TABLE
        );

        sqlx::query_as::<_, E>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(RepoError::NotFound { entity: E::NAME, id })
    }

    /// Lists all rows in store-default order
    ///
    /// An empty table yields an empty vec, not an error; callers decide
    /// whether empty is an error.
    pub async fn list(pool: &PgPool) -> Result<Vec<E>, RepoError> {
        let query = format!("SELECT {} FROM {}", E::COLUMNS, E::TABLE);

        let rows = sqlx::query_as::<_, E>(&query).fetch_all(pool).await?;
        Ok(rows)
    }

    /// Deletes the row with the given id permanently
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Conflict`] if a store-level constraint blocks
    /// the deletion.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), RepoError> {
        debug!(entity = E::NAME, id, "Deleting row");

        let query = format!("DELETE FROM {} WHERE id = $1", E::TABLE);

        sqlx::query(&query)
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| mutation_error(E::NAME, "deleting", e))?;

        Ok(())
    }
}

impl<E: Persist> Repository<E> {
    /// Inserts a new row using only the fields present in the input
    ///
    /// Unset fields take their column defaults. Returns the persisted row
    /// including store-assigned id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Conflict`] if the insert violates an integrity
    /// constraint; the statement is rolled back.
    pub async fn create(pool: &PgPool, data: E::Create) -> Result<E, RepoError> {
        debug!(entity = E::NAME, "Creating row");

        E::insert(pool, data)
            .await
            .map_err(|e| mutation_error(E::NAME, "creating", e))
    }

    /// Applies a partial update to the row with the given id
    ///
    /// Fields absent from the patch are left untouched; an empty patch is a
    /// no-op returning the current row.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] when no row has that id, or
    /// [`RepoError::Conflict`] on an integrity violation (rolled back).
    pub async fn update(pool: &PgPool, id: i64, patch: E::Patch) -> Result<E, RepoError> {
        debug!(entity = E::NAME, id, "Updating row");

        E::apply_patch(pool, id, patch)
            .await
            .map_err(|e| mutation_error(E::NAME, "updating", e))?
            .ok_or(RepoError::NotFound { entity: E::NAME, id })
    }
}

/// Maps a failed mutation to a repository error
///
/// Integrity violations carry the violated constraint's name; anything else
/// is surfaced as a plain database error.
fn mutation_error(entity: &'static str, op: &'static str, err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::Database(db_err) if db_err.constraint().is_some() => {
            RepoError::Conflict { entity, op }
        }
        other => RepoError::Database(other),
    }
}
