//! Direct messaging routes.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::realtime::{ChannelKey, FeedEvent};
use domain::models::message::{MessageHistoryResponse, MessageResponse, SendMessageRequest};
use persistence::entities::MatchEntity;
use persistence::repositories::{MatchRepository, MessageRepository};
use shared::pagination::{decode_cursor, encode_cursor};

/// Query parameters for message history.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

async fn require_member(
    state: &AppState,
    match_id: Uuid,
    user_id: Uuid,
) -> Result<MatchEntity, ApiError> {
    let matches = MatchRepository::new(state.pool.clone());
    let entity = matches
        .find_by_id(match_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    if !entity.involves(user_id) {
        return Err(ApiError::Forbidden(
            "Only matched users can access this conversation".to_string(),
        ));
    }
    Ok(entity)
}

/// GET /api/v1/matches/:match_id/messages
///
/// One page of history in chronological order. `cursor` pages backwards
/// through older messages.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(match_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<MessageHistoryResponse>, ApiError> {
    require_member(&state, match_id, auth.user_id).await?;

    let before = match query.cursor.as_deref() {
        Some(cursor) => Some(
            decode_cursor(cursor)
                .map_err(|e| ApiError::Validation(format!("Invalid cursor: {}", e)))?,
        ),
        None => None,
    };

    let page_size = query
        .limit
        .unwrap_or(state.config.limits.message_page_size)
        .clamp(1, state.config.limits.message_page_size);

    let messages = MessageRepository::new(state.pool.clone());
    let mut page = messages.list_page(match_id, before, page_size).await?;

    // The repository returns newest-first; older pages continue past the
    // oldest message of this one.
    let next_cursor = if page.len() == page_size as usize {
        page.last().map(|m| encode_cursor(m.created_at, m.id))
    } else {
        None
    };
    page.reverse();

    Ok(Json(MessageHistoryResponse {
        messages: page.into_iter().map(Into::into).collect(),
        next_cursor,
    }))
}

/// POST /api/v1/matches/:match_id/messages
///
/// Append a message and publish it to the match's realtime channel.
pub async fn send(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(match_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    request.validate()?;
    let content = request.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Message cannot be blank".to_string()));
    }
    require_member(&state, match_id, auth.user_id).await?;

    let messages = MessageRepository::new(state.pool.clone());
    let entity = messages.insert(match_id, auth.user_id, content).await?;

    let response: MessageResponse = entity.into();
    state.hub.publish(
        ChannelKey::Match(match_id),
        FeedEvent::MessageCreated {
            message: response.clone(),
        },
    );

    Ok((StatusCode::CREATED, Json(response)))
}
