//! Matches list routes.

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use domain::models::matching::{MatchedPartnersResponse, MatchesResponse};
use domain::models::profile::Profile;
use persistence::repositories::MatchRepository;

/// GET /api/v1/matches
///
/// The caller's matches, newest first, with partner profile and latest
/// message for the summary view.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let matches = MatchRepository::new(state.pool.clone());
    let entities = matches.list_with_partners(auth.user_id).await?;

    Ok(Json(MatchesResponse {
        matches: entities.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/v1/matches/partners
///
/// Full profiles of everyone the caller has matched with; the invite
/// candidate pool for study sessions.
pub async fn partners(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<MatchedPartnersResponse>, ApiError> {
    let matches = MatchRepository::new(state.pool.clone());
    let profiles = matches.partner_profiles(auth.user_id).await?;

    Ok(Json(MatchedPartnersResponse {
        partners: profiles
            .into_iter()
            .map(|entity| Profile::from(entity).into())
            .collect(),
    }))
}
