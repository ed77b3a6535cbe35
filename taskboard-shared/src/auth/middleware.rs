/// Bearer-token authentication middleware for Axum
///
/// The middleware resolves `Authorization: Bearer <token>` to a
/// [`CurrentUser`] principal: it validates the JWT, loads the user row, and
/// rejects missing, invalid, or inactive accounts before any handler runs.
/// On success the principal is added to request extensions, where handlers
/// extract it with Axum's `Extension` extractor.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use sqlx::PgPool;
/// use taskboard_shared::auth::middleware::{bearer_auth_middleware, CurrentUser};
///
/// async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.email)
/// }
///
/// fn protected_routes(pool: PgPool, secret: String) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn(move |req, next| {
///             bearer_auth_middleware(pool.clone(), secret.clone(), req, next)
///         }))
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::jwt::{validate_token, JwtError};
use crate::models::user::User;

/// The authenticated principal added to request extensions
///
/// A read-only, request-scoped view of the user row the token resolved to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Authenticated user id
    pub id: i64,

    /// Email address
    pub email: String,

    /// Active flag (always true once past the auth gate)
    pub is_active: bool,

    /// Superuser flag
    pub is_superuser: bool,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
        }
    }
}

/// Error type for the authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed, or no user matches the token
    InvalidToken(String),

    /// The account exists but is deactivated
    InactiveUser,

    /// Database error
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::InactiveUser => {
                (StatusCode::UNAUTHORIZED, "Inactive user").into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Bearer-token authentication middleware
///
/// Short-circuits with 401 before any handler or repository code when:
/// - the Authorization header is missing
/// - the token is malformed, invalid, or expired
/// - no user matches the token's subject
/// - the user is inactive
///
/// On success a [`CurrentUser`] is inserted into request extensions.
pub async fn bearer_auth_middleware(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // Extract Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    // Parse Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    // Validate token
    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    // Resolve the subject to a user row
    let user = User::find_by_id(&pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("Database error: {}", e)))?
        .ok_or_else(|| AuthError::InvalidToken("Unknown user".to_string()))?;

    if !user.is_active {
        return Err(AuthError::InactiveUser);
    }

    // Add the principal to request extensions
    req.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(req).await)
}
