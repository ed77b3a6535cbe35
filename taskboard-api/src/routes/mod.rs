/// API route handlers
///
/// Organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: registration and JWT login
/// - `users`: profile read/update for the authenticated user
/// - `tasks`: task CRUD endpoints

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
