//! WebSocket endpoints bridging feed channels to clients.
//!
//! A socket subscribes to exactly one channel (a match or a session) for
//! its lifetime; closing the socket is the unsubscription. Events are
//! JSON text frames. Delivery is at-least-once in channel order; clients
//! de-duplicate by message id.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Extension, Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::realtime::{ChannelKey, FeedEvent};
use persistence::repositories::{MatchRepository, ParticipantRepository};

/// GET /api/v1/matches/:match_id/ws
///
/// Live feed of new direct messages in a match. Caller must be one of
/// the matched pair.
pub async fn match_feed_ws(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(match_id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let match_repo = MatchRepository::new(state.pool.clone());
    let entity = match_repo
        .find_by_id(match_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    if !entity.involves(auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only matched users can subscribe to this conversation".to_string(),
        ));
    }

    let rx = state.hub.subscribe(ChannelKey::Match(match_id));
    tracing::debug!(user_id = %auth.user_id, match_id = %match_id, "Match feed subscribed");

    Ok(ws.on_upgrade(move |socket| stream_channel(socket, rx)))
}

/// GET /api/v1/sessions/:session_id/ws
///
/// Live feed of new chat messages in a study session. Caller must hold
/// an accepted seat.
pub async fn session_feed_ws(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(session_id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let participants = ParticipantRepository::new(state.pool.clone());
    if !participants
        .is_accepted_member(session_id, auth.user_id)
        .await?
    {
        return Err(ApiError::Forbidden(
            "Only accepted participants can subscribe to this session".to_string(),
        ));
    }

    let rx = state.hub.subscribe(ChannelKey::Session(session_id));
    tracing::debug!(user_id = %auth.user_id, session_id = %session_id, "Session feed subscribed");

    Ok(ws.on_upgrade(move |socket| stream_channel(socket, rx)))
}

/// Forwards channel events to the socket until either side goes away.
async fn stream_channel(socket: WebSocket, mut rx: broadcast::Receiver<FeedEvent>) {
    let (mut sink, mut stream) = socket.split();

    let mut forward = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let Ok(text) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sink.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Feed subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Drain client frames so we notice the close handshake.
    let mut drain = tokio::spawn(async move {
        while let Some(Ok(frame)) = stream.next().await {
            if let Message::Close(_) = frame {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut forward => drain.abort(),
        _ = &mut drain => forward.abort(),
    }
}
