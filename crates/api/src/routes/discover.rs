//! Discovery feed route.

use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use domain::models::profile::{Profile, ProfileResponse};
use persistence::repositories::ProfileRepository;

/// Response for the discovery feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DiscoverResponse {
    pub profiles: Vec<ProfileResponse>,
}

/// GET /api/v1/discover
///
/// Candidate profiles for the caller: onboarded, not the caller, and not
/// already liked. Passed profiles stay eligible so a user can reconsider.
pub async fn discover(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<DiscoverResponse>, ApiError> {
    let profiles = ProfileRepository::new(state.pool.clone());
    let candidates = profiles
        .discover_candidates(auth.user_id, state.config.limits.discover_page_size)
        .await?;

    Ok(Json(DiscoverResponse {
        profiles: candidates
            .into_iter()
            .map(|entity| Profile::from(entity).into())
            .collect(),
    }))
}
