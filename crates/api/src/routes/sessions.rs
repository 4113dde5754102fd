//! Study session routes: CRUD, listing, and the participation state
//! machine (join / invite / decline).

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use domain::models::participant::InviteRequest;
use domain::models::session::{
    CreateSessionRequest, SessionDetailResponse, SessionResponse, SessionsOverviewResponse,
    UpdateSessionRequest,
};
use persistence::entities::{ParticipantStatusDb, StudySessionEntity};
use persistence::repositories::{
    MatchRepository, ParticipantRepository, ProfileRepository, SessionRepository,
};

async fn require_host(
    state: &AppState,
    session_id: Uuid,
    user_id: Uuid,
    action: &str,
) -> Result<StudySessionEntity, ApiError> {
    let sessions = SessionRepository::new(state.pool.clone());
    let session = sessions
        .find_by_id(session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    if session.host_id != user_id {
        return Err(ApiError::Forbidden(format!(
            "Only the host can {} this session",
            action
        )));
    }
    Ok(session)
}

/// POST /api/v1/sessions
///
/// Create a session; the host participant row is written in the same
/// transaction.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    request.validate()?;
    if !request.time_window_is_valid() {
        return Err(ApiError::Validation(
            "Session must end after it starts".to_string(),
        ));
    }

    let sessions = SessionRepository::new(state.pool.clone());
    let entity = sessions.create_with_host(auth.user_id, &request).await?;

    info!(session_id = %entity.id, host_id = %auth.user_id, "Session created");

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// GET /api/v1/sessions
///
/// The caller's three session views: hosting, invited-to (private), and
/// public, each with host summary and seat count.
pub async fn overview(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<SessionsOverviewResponse>, ApiError> {
    let sessions = SessionRepository::new(state.pool.clone());

    let hosting = sessions.list_hosted_by(auth.user_id).await?;
    let invited = sessions.list_invited_to(auth.user_id).await?;
    let public = sessions.list_public().await?;

    Ok(Json(SessionsOverviewResponse {
        hosting: hosting.into_iter().map(Into::into).collect(),
        invited: invited.into_iter().map(Into::into).collect(),
        public: public.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/v1/sessions/:session_id
///
/// Session detail: host summary plus the full participant roster.
pub async fn detail(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDetailResponse>, ApiError> {
    let sessions = SessionRepository::new(state.pool.clone());
    let session = sessions
        .find_with_host(session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    let participants = ParticipantRepository::new(state.pool.clone());
    let roster = participants.roster(session_id).await?;

    let summary: domain::models::session::SessionSummary = session.into();
    Ok(Json(SessionDetailResponse {
        session: summary.session,
        host: summary.host,
        participant_count: summary.participant_count,
        participants: roster.into_iter().map(Into::into).collect(),
    }))
}

/// PUT /api/v1/sessions/:session_id
///
/// Host-only partial update.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;
    if !request.time_window_is_valid() {
        return Err(ApiError::Validation(
            "Session must end after it starts".to_string(),
        ));
    }
    require_host(&state, session_id, auth.user_id, "edit").await?;

    let sessions = SessionRepository::new(state.pool.clone());
    let entity = sessions.update(session_id, &request).await?;

    info!(session_id = %session_id, host_id = %auth.user_id, "Session updated");

    Ok(Json(entity.into()))
}

/// DELETE /api/v1/sessions/:session_id
///
/// Host-only; participants and chat cascade away.
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_host(&state, session_id, auth.user_id, "delete").await?;

    let sessions = SessionRepository::new(state.pool.clone());
    sessions.delete(session_id).await?;

    info!(session_id = %session_id, host_id = %auth.user_id, "Session deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:session_id/join
///
/// Join a session, or accept a pending invitation. Capacity is enforced
/// atomically inside the write: when no seat is free the request fails
/// with a conflict. Joining a session already joined is a no-op.
pub async fn join(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let sessions = SessionRepository::new(state.pool.clone());
    sessions
        .find_by_id(session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    let participants = ParticipantRepository::new(state.pool.clone());

    let written = match participants.find_row(session_id, auth.user_id).await? {
        Some(row) if row.status == ParticipantStatusDb::Invited => {
            participants
                .accept_invite_if_seat(session_id, auth.user_id)
                .await?
        }
        Some(_) => {
            // Already joined (or previously declined); nothing to do.
            return Ok(StatusCode::NO_CONTENT);
        }
        None => {
            participants
                .insert_joiner_if_seat(session_id, auth.user_id)
                .await?
        }
    };

    if written == 0 {
        return Err(ApiError::Conflict("Session is full".to_string()));
    }

    info!(session_id = %session_id, user_id = %auth.user_id, "Joined session");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:session_id/invitations
///
/// Host-only. Inviting a user who already has a row (invited, joined, or
/// declined) is a no-op rather than a duplicate.
pub async fn invite(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<InviteRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    require_host(&state, session_id, auth.user_id, "invite users to").await?;

    let profiles = ProfileRepository::new(state.pool.clone());
    profiles
        .find_by_id(request.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let participants = ParticipantRepository::new(state.pool.clone());

    if participants
        .find_row(session_id, request.user_id)
        .await?
        .is_some()
    {
        return Ok(StatusCode::NO_CONTENT);
    }

    let written = participants
        .insert_invite_if_seat(session_id, request.user_id)
        .await?;

    if written == 0 {
        return Err(ApiError::Conflict("Session is full".to_string()));
    }

    info!(
        session_id = %session_id,
        host_id = %auth.user_id,
        invitee_id = %request.user_id,
        "Invitation sent"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:session_id/decline
///
/// Decline a pending invitation; the seat it held is released.
pub async fn decline(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let participants = ParticipantRepository::new(state.pool.clone());
    let updated = participants
        .decline_invite(session_id, auth.user_id)
        .await?;

    if updated == 0 {
        return Err(ApiError::Conflict(
            "No pending invitation to decline".to_string(),
        ));
    }

    info!(session_id = %session_id, user_id = %auth.user_id, "Invitation declined");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:session_id/invite-candidates
///
/// The host's matched partners, for building an invite list.
pub async fn invite_candidates(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<domain::models::matching::MatchedPartnersResponse>, ApiError> {
    require_host(&state, session_id, auth.user_id, "invite users to").await?;

    let matches = MatchRepository::new(state.pool.clone());
    let partners = matches.partner_profiles(auth.user_id).await?;

    Ok(Json(domain::models::matching::MatchedPartnersResponse {
        partners: partners
            .into_iter()
            .map(|entity| domain::models::profile::Profile::from(entity).into())
            .collect(),
    }))
}
