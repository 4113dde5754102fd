//! Authentication routes for registration, login, and token management.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::auth::{AuthError, AuthResult, AuthService};
use domain::models::profile::ProfileResponse;
use persistence::repositories::ProfileRepository;

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password policy (length, upper, lower, digit) is enforced by the
    /// auth service.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for logout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LogoutRequest {
    pub refresh_token: String,
    #[serde(default)]
    pub all_devices: bool,
}

/// User information in auth responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthUserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
}

/// Token information in auth responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response body for successful registration or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthResponse {
    pub user: AuthUserResponse,
    pub tokens: TokensResponse,
}

/// Response body for the identity endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MeResponse {
    pub id: String,
    pub profile: ProfileResponse,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            user: AuthUserResponse {
                id: result.user_id.to_string(),
                email: result.email,
                username: result.username,
            },
            tokens: TokensResponse {
                access_token: result.access_token,
                refresh_token: result.refresh_token,
                token_type: "Bearer".to_string(),
                expires_in: result.expires_in,
            },
        }
    }
}

fn map_auth_error(e: AuthError) -> ApiError {
    match e {
        AuthError::EmailTaken => ApiError::Conflict("Email already registered".to_string()),
        AuthError::UsernameTaken => ApiError::Conflict("Username already taken".to_string()),
        AuthError::WeakPassword(msg) => ApiError::Validation(msg),
        AuthError::InvalidUsername => ApiError::Validation(
            "Username must be 3-30 characters of letters, digits or underscore".to_string(),
        ),
        AuthError::InvalidCredentials => {
            ApiError::Unauthorized("Invalid email or password".to_string())
        }
        AuthError::UserDisabled => ApiError::Forbidden("Account is disabled".to_string()),
        AuthError::InvalidRefreshToken | AuthError::SessionNotFound => {
            ApiError::Unauthorized("Invalid or expired refresh token".to_string())
        }
        AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
        AuthError::Database(db_err) => ApiError::from(db_err),
        AuthError::Token(e) => ApiError::Internal(format!("Token error: {}", e)),
        AuthError::Password(e) => ApiError::Internal(format!("Password error: {}", e)),
    }
}

/// POST /api/v1/auth/register
///
/// Register a new user; also creates the profile row.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = service
        .register(&request.email, &request.password, &request.username)
        .await
        .map_err(map_auth_error)?;

    tracing::info!(user_id = %result.user_id, "User registered");

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = service
        .login(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    tracing::info!(user_id = %result.user_id, "User logged in");

    Ok(Json(result.into()))
}

/// POST /api/v1/auth/refresh
///
/// Rotate the token pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokensResponse>, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = service
        .refresh(&request.refresh_token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(TokensResponse {
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: result.expires_in,
    }))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    service
        .logout(&request.refresh_token, request.all_devices)
        .await
        .map_err(map_auth_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// Identity and profile of the bearer.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<MeResponse>, ApiError> {
    let profiles = ProfileRepository::new(state.pool.clone());
    let profile = profiles
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(MeResponse {
        id: auth.user_id.to_string(),
        profile: domain::models::profile::Profile::from(profile).into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_validation() {
        let valid = RegisterRequest {
            email: "kujo@example.com".to_string(),
            password: "Yare1yare".to_string(),
            username: "jotaro".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "Yare1yare".to_string(),
            username: "jotaro".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_password = RegisterRequest {
            email: "kujo@example.com".to_string(),
            password: String::new(),
            username: "jotaro".to_string(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn login_request_validation() {
        let valid = LoginRequest {
            email: "kujo@example.com".to_string(),
            password: "pw".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad = LoginRequest {
            email: "nope".to_string(),
            password: "pw".to_string(),
        };
        assert!(bad.validate().is_err());
    }
}
