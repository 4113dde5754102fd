//! Profile routes.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use domain::models::profile::{
    AddStudyHoursRequest, Profile, ProfileResponse, UpdateProfileRequest,
};
use persistence::repositories::ProfileRepository;

/// GET /api/v1/profiles/me
pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profiles = ProfileRepository::new(state.pool.clone());
    let entity = profiles
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(Profile::from(entity).into()))
}

/// PUT /api/v1/profiles/me
///
/// Partial update of the caller's profile; only the owner can mutate it.
pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    request.validate()?;

    let profiles = ProfileRepository::new(state.pool.clone());

    // Surface a username collision as a conflict rather than a bare 409.
    if let Some(ref username) = request.username {
        if let Some(existing) = profiles.find_by_username(username).await? {
            if existing.id != auth.user_id {
                return Err(ApiError::Conflict("Username already taken".to_string()));
            }
        }
    }

    let entity = profiles.update(auth.user_id, &request).await?;

    tracing::info!(user_id = %auth.user_id, "Profile updated");

    Ok(Json(Profile::from(entity).into()))
}

/// POST /api/v1/profiles/me/study-hours
///
/// Add studied hours to the aggregate counter.
pub async fn add_study_hours(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<AddStudyHoursRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    request.validate()?;

    let profiles = ProfileRepository::new(state.pool.clone());
    let entity = profiles.add_study_hours(auth.user_id, request.hours).await?;

    Ok(Json(Profile::from(entity).into()))
}

/// GET /api/v1/profiles/:profile_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profiles = ProfileRepository::new(state.pool.clone());
    let entity = profiles
        .find_by_id(profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(Profile::from(entity).into()))
}
