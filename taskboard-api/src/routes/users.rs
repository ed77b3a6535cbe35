/// Profile endpoints for the authenticated user
///
/// # Endpoints
///
/// - `GET /users/me` - read own profile
/// - `PATCH /users/me` - update own email and/or password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::{middleware::CurrentUser, password};
use taskboard_shared::models::user::{UpdateUser, User};
use validator::Validate;

/// Public view of a user account
///
/// The password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User id
    pub id: i64,

    /// Email address
    pub email: String,

    /// Active flag
    pub is_active: bool,

    /// Superuser flag
    pub is_superuser: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
        }
    }
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
        }
    }
}

/// Profile update request
///
/// Both fields optional; a new password is re-validated against the policy
/// and re-hashed before storage.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password (plaintext, hashed server-side)
    pub password: Option<String>,
}

/// Read the authenticated user's profile
pub async fn read_me(Extension(user): Extension<CurrentUser>) -> ApiResult<Json<UserResponse>> {
    Ok(Json(user.into()))
}

/// Update the authenticated user's profile
///
/// # Errors
///
/// - `422 Unprocessable Entity`: invalid email or rejected password
/// - `400 Bad Request`: the new email already belongs to another account
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdateMeRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let password_hash = match req.password {
        Some(ref password) => {
            let email = req.email.as_deref().unwrap_or(&user.email);
            password::validate_password(password, email).map_err(|reason| {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "password".to_string(),
                    message: reason,
                }])
            })?;

            Some(password::hash_password(password)?)
        }
        None => None,
    };

    let updated = User::update(
        &state.db,
        user.id,
        UpdateUser {
            email: req.email,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user with id {} not found", user.id)))?;

    tracing::debug!(user_id = updated.id, "Profile updated");

    Ok(Json(updated.into()))
}
