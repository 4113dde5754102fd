//! Swipe/match engine route.

use axum::{
    extract::{Extension, State},
    Json,
};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_match_created, record_swipe};
use crate::middleware::UserAuth;
use domain::models::swipe::{RecordSwipeRequest, RecordSwipeResponse, SwipeDirection};
use persistence::repositories::{MatchRepository, ProfileRepository, SwipeRepository};

/// POST /api/v1/swipes
///
/// Record a directional decision about a target profile. The decision is
/// upserted, so a later swipe on the same target supersedes the earlier
/// one. A like checks for the reciprocal like and, when found, creates
/// the match exactly once for the canonical pair.
///
/// The swipe upsert and the match upsert are independent statements; a
/// failure after the swipe is recorded surfaces to the caller and is not
/// compensated.
pub async fn record(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<RecordSwipeRequest>,
) -> Result<Json<RecordSwipeResponse>, ApiError> {
    request.validate()?;

    if request.target_id == auth.user_id {
        return Err(ApiError::Validation("Cannot swipe on yourself".to_string()));
    }

    let profiles = ProfileRepository::new(state.pool.clone());
    profiles
        .find_by_id(request.target_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let swipes = SwipeRepository::new(state.pool.clone());
    swipes
        .upsert(auth.user_id, request.target_id, request.direction.into())
        .await?;
    record_swipe(request.direction.as_str());

    if request.direction == SwipeDirection::Like
        && swipes
            .reciprocal_like_exists(request.target_id, auth.user_id)
            .await?
    {
        let matches = MatchRepository::new(state.pool.clone());
        let entity = matches.upsert_pair(auth.user_id, request.target_id).await?;
        record_match_created();

        info!(
            match_id = %entity.id,
            user_id = %auth.user_id,
            target_id = %request.target_id,
            "Mutual like, match created"
        );

        return Ok(Json(RecordSwipeResponse {
            is_match: true,
            match_id: Some(entity.id),
        }));
    }

    Ok(Json(RecordSwipeResponse {
        is_match: false,
        match_id: None,
    }))
}
