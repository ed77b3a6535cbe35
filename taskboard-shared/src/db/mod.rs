/// Database layer for Taskboard
///
/// This module provides connection pooling and migrations; models live in
/// the `models` module at the crate root.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: database migration runner

pub mod migrations;
pub mod pool;
