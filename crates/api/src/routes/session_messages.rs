//! Session chat routes.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::realtime::{ChannelKey, FeedEvent};
use domain::models::message::SendMessageRequest;
use domain::models::session_message::{SessionMessageResponse, SessionMessagesResponse};
use persistence::repositories::{ParticipantRepository, SessionMessageRepository};

async fn require_accepted_member(
    state: &AppState,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let participants = ParticipantRepository::new(state.pool.clone());
    if participants.is_accepted_member(session_id, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only accepted participants can access the session chat".to_string(),
        ))
    }
}

/// GET /api/v1/sessions/:session_id/messages
///
/// Full chat history, oldest first, with sender profile summaries.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionMessagesResponse>, ApiError> {
    require_accepted_member(&state, session_id, auth.user_id).await?;

    let messages = SessionMessageRepository::new(state.pool.clone());
    let entities = messages.list_with_senders(session_id).await?;

    Ok(Json(SessionMessagesResponse {
        messages: entities.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/v1/sessions/:session_id/messages
///
/// Append a chat message and publish it, sender attached, to the
/// session's realtime channel.
pub async fn send(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SessionMessageResponse>), ApiError> {
    request.validate()?;
    let content = request.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Message cannot be blank".to_string()));
    }
    require_accepted_member(&state, session_id, auth.user_id).await?;

    let messages = SessionMessageRepository::new(state.pool.clone());
    let inserted = messages.insert(session_id, auth.user_id, content).await?;

    // Re-read with the sender summary so both the response and the feed
    // event carry it.
    let response: SessionMessageResponse = match messages.find_with_sender(inserted.id).await? {
        Some(entity) => entity.into(),
        None => inserted.into(),
    };

    state.hub.publish(
        ChannelKey::Session(session_id),
        FeedEvent::SessionMessageCreated {
            message: response.clone(),
        },
    );

    Ok((StatusCode::CREATED, Json(response)))
}
